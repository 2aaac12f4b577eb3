//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Token verification (HS256 JWT, mock)
//! - `events` - In-process event bus and its handlers
//! - `http` - axum routes, middleware and health checks
//! - `memory` - In-process session store
//! - `postgres` - PostgreSQL session store and reader

pub mod auth;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use auth::{JwtIdentity, MockIdentity};
pub use events::{InMemoryEventBus, PromotionNotifier};
pub use memory::InMemorySessionStore;
pub use postgres::{PostgresSessionReader, PostgresSessionStore};
