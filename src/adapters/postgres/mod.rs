//! PostgreSQL adapters.
//!
//! - `PostgresSessionStore` - Session writes and locked roster transactions
//! - `PostgresSessionReader` - Unlocked roster queries for listings

mod session_reader;
mod session_store;

pub use session_reader::PostgresSessionReader;
pub use session_store::PostgresSessionStore;
