//! HTTP handlers for session and attendance endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::adapters::http::middleware::{OptionalAuth, RequestContext, RequireAuth};
use crate::application::handlers::attendance::{
    JoinSessionCommand, JoinSessionHandler, LeaveSessionCommand, LeaveSessionHandler,
    RemoveAttendeeCommand, RemoveAttendeeHandler,
};
use crate::application::handlers::session::{
    CreateSessionCommand, CreateSessionHandler, GetSessionHandler, GetSessionQuery,
    ListSessionsHandler, ListSessionsQuery,
};
use crate::domain::foundation::{AttendanceId, SessionId, Timestamp};
use crate::domain::session::AttendanceError;
use crate::ports::{EventPublisher, SessionReader, SessionStore};

use super::dto::{
    AttendanceResponse, CreateSessionRequest, ErrorResponse, JoinResponse, MessageResponse,
    SessionDirectoryResponse, SessionListingResponse, SessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    create_handler: Arc<CreateSessionHandler>,
    list_handler: Arc<ListSessionsHandler>,
    get_handler: Arc<GetSessionHandler>,
    join_handler: Arc<JoinSessionHandler>,
    leave_handler: Arc<LeaveSessionHandler>,
    remove_handler: Arc<RemoveAttendeeHandler>,
}

impl SessionHandlers {
    pub fn new(
        create_handler: Arc<CreateSessionHandler>,
        list_handler: Arc<ListSessionsHandler>,
        get_handler: Arc<GetSessionHandler>,
        join_handler: Arc<JoinSessionHandler>,
        leave_handler: Arc<LeaveSessionHandler>,
        remove_handler: Arc<RemoveAttendeeHandler>,
    ) -> Self {
        Self {
            create_handler,
            list_handler,
            get_handler,
            join_handler,
            leave_handler,
            remove_handler,
        }
    }

    /// Builds every handler over the same store, reader and publisher.
    pub fn from_ports(
        store: Arc<dyn SessionStore>,
        reader: Arc<dyn SessionReader>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self::new(
            Arc::new(CreateSessionHandler::new(store.clone(), publisher.clone())),
            Arc::new(ListSessionsHandler::new(reader.clone())),
            Arc::new(GetSessionHandler::new(reader)),
            Arc::new(JoinSessionHandler::new(store.clone(), publisher.clone())),
            Arc::new(LeaveSessionHandler::new(store.clone(), publisher.clone())),
            Arc::new(RemoveAttendeeHandler::new(store, publisher)),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /sessions - Schedule a session
pub async fn create_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    ctx: RequestContext,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return invalid_body(rejection),
    };

    let cmd = CreateSessionCommand {
        host_id: user.id.clone(),
        start_time: Timestamp::from_datetime(req.start_time),
        address: req.address,
        capacity: req.capacity,
        now: Timestamp::now(),
    };

    match handlers.create_handler.handle(cmd, ctx.metadata(user.id)).await {
        Ok(session) => (StatusCode::CREATED, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handle_attendance_error(e),
    }
}

/// GET /sessions - Upcoming and past sessions
pub async fn list_sessions(
    State(handlers): State<SessionHandlers>,
    OptionalAuth(user): OptionalAuth,
) -> Response {
    let query = ListSessionsQuery {
        viewer: user.map(|u| u.id),
        now: Timestamp::now(),
    };

    match handlers.list_handler.handle(query).await {
        Ok(directory) => {
            (StatusCode::OK, Json(SessionDirectoryResponse::from(&directory))).into_response()
        }
        Err(e) => handle_attendance_error(e),
    }
}

/// GET /sessions/:id - One session with its roster
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    OptionalAuth(user): OptionalAuth,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return invalid_id("session"),
    };

    let query = GetSessionQuery {
        session_id,
        viewer: user.map(|u| u.id),
    };

    match handlers.get_handler.handle(query).await {
        Ok(listing) => {
            (StatusCode::OK, Json(SessionListingResponse::from(&listing))).into_response()
        }
        Err(e) => handle_attendance_error(e),
    }
}

/// POST /sessions/:id/join - Join, or land on the waitlist
pub async fn join_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    ctx: RequestContext,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return invalid_id("session"),
    };

    let cmd = JoinSessionCommand {
        session_id,
        user_id: user.id.clone(),
    };

    match handlers.join_handler.handle(cmd, ctx.metadata(user.id)).await {
        Ok(result) => {
            let response = JoinResponse {
                message: result.admission.message().to_string(),
                attendance: AttendanceResponse::from(&result.attendance),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_attendance_error(e),
    }
}

/// POST /sessions/:id/leave - Give up a seat or waitlist place
pub async fn leave_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    ctx: RequestContext,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return invalid_id("session"),
    };

    let cmd = LeaveSessionCommand {
        session_id,
        user_id: user.id.clone(),
        now: Timestamp::now(),
    };

    match handlers.leave_handler.handle(cmd, ctx.metadata(user.id)).await {
        Ok(_) => (StatusCode::OK, Json(MessageResponse::new("Successfully left game"))).into_response(),
        Err(e) => handle_attendance_error(e),
    }
}

/// DELETE /sessions/:id/attendees/:attendee_id - Host removes an attendee
pub async fn remove_attendee(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    ctx: RequestContext,
    Path((session_id, attendee_id)): Path<(String, String)>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return invalid_id("session"),
    };
    let attendance_id = match attendee_id.parse::<AttendanceId>() {
        Ok(id) => id,
        Err(_) => return invalid_id("attendee"),
    };

    let cmd = RemoveAttendeeCommand {
        session_id,
        attendance_id,
        caller_id: user.id.clone(),
        now: Timestamp::now(),
    };

    match handlers.remove_handler.handle(cmd, ctx.metadata(user.id)).await {
        Ok(_) => (
            StatusCode::OK,
            Json(MessageResponse::new("Attendee removed successfully")),
        )
            .into_response(),
        Err(e) => handle_attendance_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn invalid_id(kind: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(format!("Invalid {} ID", kind))),
    )
        .into_response()
}

/// Serde detail is logged, never returned.
fn invalid_body(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
        JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
        _ => "Request body is missing fields or has invalid values",
    };
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("VALIDATION_FAILED", message)),
    )
        .into_response()
}

/// Internal errors were already logged with context by the application
/// handler; here they only become a generic 500.
fn handle_attendance_error(error: AttendanceError) -> Response {
    let (status, body) = match &error {
        AttendanceError::SessionNotFound(id) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::not_found("Session", &id.to_string()),
        ),
        AttendanceError::AttendeeNotFound(id) => (
            StatusCode::NOT_FOUND,
            ErrorResponse::not_found("Attendee", &id.to_string()),
        ),
        AttendanceError::Forbidden => (
            StatusCode::FORBIDDEN,
            ErrorResponse::forbidden(error.to_string()),
        ),
        AttendanceError::JoinWindowClosed => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("JOIN_WINDOW_CLOSED", error.to_string()),
        ),
        AttendanceError::AlreadyRegistered => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("ALREADY_REGISTERED", error.to_string()),
        ),
        AttendanceError::NotRegistered => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("NOT_REGISTERED", error.to_string()),
        ),
        AttendanceError::Conflict => (
            StatusCode::CONFLICT,
            ErrorResponse::conflict(error.to_string()),
        ),
        AttendanceError::ValidationFailed { field, message } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("VALIDATION_FAILED", message.clone())
                .with_details(json!({ "field": field })),
        ),
        AttendanceError::Internal(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal())
        }
    };

    (status, Json(body)).into_response()
}
