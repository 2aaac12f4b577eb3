//! HTTP routes for session endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    create_session, get_session, join_session, leave_session, list_sessions, remove_attendee,
    SessionHandlers,
};

/// Creates the session router, to be nested under `/sessions`.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", post(create_session).get(list_sessions))
        .route("/:id", get(get_session))
        .route("/:id/join", post(join_session))
        .route("/:id/leave", post(leave_session))
        .route("/:id/attendees/:attendee_id", delete(remove_attendee))
        .with_state(handlers)
}
