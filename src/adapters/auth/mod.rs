//! Identity adapters.
//!
//! - `JwtIdentity` - HS256 shared-secret tokens
//! - `MockIdentity` - Fixed token table for tests

mod jwt;
mod mock;

pub use jwt::{Claims, JwtIdentity};
pub use mock::MockIdentity;
