//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) lock a roster and commit; query handlers (read)
//! project unlocked snapshots.

pub mod handlers;

pub use handlers::{
    CreateSessionCommand, CreateSessionHandler, GetSessionHandler, GetSessionQuery,
    JoinSessionCommand, JoinSessionHandler, JoinSessionResult, LeaveSessionCommand,
    LeaveSessionHandler, ListSessionsHandler, ListSessionsQuery, RemoveAttendeeCommand,
    RemoveAttendeeHandler,
};
