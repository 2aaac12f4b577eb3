//! In-process adapters for tests and database-less local runs.

mod session_store;

pub use session_store::InMemorySessionStore;
