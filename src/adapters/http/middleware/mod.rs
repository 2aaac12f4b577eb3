//! HTTP middleware for axum.
//!
//! - `auth` - Authentication middleware and extractors
//! - `request_context` - Correlation id taken from `x-request-id`

pub mod auth;
mod request_context;

pub use auth::{auth_middleware, AuthRejection, AuthState, OptionalAuth, RequireAuth};
pub use request_context::{RequestContext, REQUEST_ID_HEADER};
