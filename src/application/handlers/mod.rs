//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod attendance;
mod outcome;
pub mod session;

pub use attendance::{
    JoinSessionCommand, JoinSessionHandler, JoinSessionResult, LeaveSessionCommand,
    LeaveSessionHandler, RemoveAttendeeCommand, RemoveAttendeeHandler,
};
pub use session::{
    CreateSessionCommand, CreateSessionHandler, GetSessionHandler, GetSessionQuery,
    ListSessionsHandler, ListSessionsQuery,
};
