//! HTTP adapters - REST API over axum.

pub mod health;
pub mod middleware;
pub mod router;
pub mod session;

pub use health::{health_routes, HealthState};
pub use router::{build_router, RouterSettings};
pub use session::{session_routes, SessionHandlers};
