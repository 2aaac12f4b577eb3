//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Session Ports
//!
//! - `SessionStore` - Session persistence and locked roster transactions
//! - `SessionReader` - Unlocked roster queries for listings
//!
//! ## Identity Ports
//!
//! - `Identity` - Resolves a presented token to a user
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events

mod event_publisher;
mod event_subscriber;
mod identity;
mod session_reader;
mod session_store;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use identity::Identity;
pub use session_reader::SessionReader;
pub use session_store::{LockedRoster, RosterTransaction, SessionStore};
