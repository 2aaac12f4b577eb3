//! HTTP adapter for session and attendance endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AttendanceResponse, CreateSessionRequest, ErrorResponse, JoinResponse, MessageResponse,
    RosterEntryResponse, SessionDirectoryResponse, SessionListingResponse, SessionResponse,
};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
