//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, events)
//! - `session` - Game sessions, attendance and waitlist rules

pub mod foundation;
pub mod session;
