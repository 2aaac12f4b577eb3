//! Helpers shared by the command handlers: post-commit publishing and
//! failure logging.

use serde::Serialize;

use crate::domain::foundation::{
    CommandMetadata, DomainEvent, EventEnvelope, SessionId, UserId,
};
use crate::domain::session::AttendanceError;
use crate::ports::EventPublisher;

/// Wraps events for publishing, tagging them with the request context.
///
/// An event that fails to serialize is logged and skipped.
pub(crate) fn envelopes<E>(
    events: &[E],
    metadata: &CommandMetadata,
    correlation_id: &str,
) -> Vec<EventEnvelope>
where
    E: DomainEvent + Serialize,
{
    events
        .iter()
        .filter_map(|event| match EventEnvelope::from_event(event) {
            Ok(envelope) => Some(
                envelope
                    .with_correlation_id(correlation_id)
                    .with_user_id(metadata.user_id.to_string()),
            ),
            Err(e) => {
                tracing::error!(
                    event_type = event.event_type(),
                    error = %e,
                    "failed to build event envelope"
                );
                None
            }
        })
        .collect()
}

/// Publishes events for a change that is already committed.
///
/// The committed state stands whatever happens here, so failures are only
/// logged.
pub(crate) async fn publish_committed(
    publisher: &dyn EventPublisher,
    envelopes: Vec<EventEnvelope>,
    operation: &'static str,
) {
    if envelopes.is_empty() {
        return;
    }
    if let Err(e) = publisher.publish_all(envelopes).await {
        tracing::warn!(operation, error = %e, "event publish failed after commit");
    }
}

/// Logs a failed operation with its context and passes the error on.
///
/// Internal errors are logged at `error` since the response will not
/// carry their detail.
pub(crate) fn log_failure<'a>(
    operation: &'static str,
    session_id: &'a SessionId,
    user_id: &'a UserId,
) -> impl FnOnce(AttendanceError) -> AttendanceError + 'a {
    move |err| {
        match &err {
            AttendanceError::Internal(detail) => tracing::error!(
                operation,
                session_id = %session_id,
                user_id = %user_id,
                error = %detail,
                "operation failed"
            ),
            AttendanceError::Conflict => tracing::warn!(
                operation,
                session_id = %session_id,
                user_id = %user_id,
                "operation lost a race on a uniqueness constraint"
            ),
            other => tracing::debug!(
                operation,
                session_id = %session_id,
                user_id = %user_id,
                reason = %other,
                "operation rejected"
            ),
        }
        err
    }
}
