//! Errors raised by scheduling and attendance operations.

use thiserror::Error;

use crate::domain::foundation::{AttendanceId, DomainError, ErrorCode, SessionId};

/// Attendance and scheduling errors.
///
/// Every variant except `Conflict` and `Internal` is detected before any
/// write happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttendanceError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Attendee not found: {0}")]
    AttendeeNotFound(AttendanceId),

    #[error("Only the host can remove attendees")]
    Forbidden,

    #[error("Cannot join game less than 5 minutes before start")]
    JoinWindowClosed,

    #[error("Already registered for this game")]
    AlreadyRegistered,

    #[error("Not registered for this game")]
    NotRegistered,

    #[error("The session changed concurrently, please retry")]
    Conflict,

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AttendanceError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AttendanceError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AttendanceError::Internal(message.into())
    }

    /// True for failures the caller did not cause.
    pub fn is_internal(&self) -> bool {
        matches!(self, AttendanceError::Internal(_))
    }
}

impl From<DomainError> for AttendanceError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ConcurrencyConflict => AttendanceError::Conflict,
            ErrorCode::ValidationFailed => AttendanceError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => AttendanceError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_conflict_becomes_conflict() {
        let err: AttendanceError = DomainError::conflict("duplicate key").into();
        assert_eq!(err, AttendanceError::Conflict);
    }

    #[test]
    fn validation_keeps_field_name() {
        let err: AttendanceError = DomainError::validation("capacity", "too big").into();
        assert_eq!(err, AttendanceError::validation("capacity", "too big"));
    }

    #[test]
    fn other_store_failures_are_internal() {
        let err: AttendanceError = DomainError::database("connection reset").into();
        assert!(err.is_internal());
    }

    #[test]
    fn join_window_message_mentions_cutoff() {
        assert_eq!(
            AttendanceError::JoinWindowClosed.to_string(),
            "Cannot join game less than 5 minutes before start"
        );
    }
}
