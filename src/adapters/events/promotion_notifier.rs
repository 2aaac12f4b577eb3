//! Promotion notifier.
//!
//! Records the intent to tell a waitlisted user they now have a seat.
//! Delivery (email, push) is not wired up; the intent is logged so it can be
//! picked up from the log stream.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::domain::session::AttendeePromoted;
use crate::ports::EventHandler;

/// Logs a notification intent for every `AttendeePromoted` event.
#[derive(Debug, Default)]
pub struct PromotionNotifier;

impl PromotionNotifier {
    pub const EVENT_TYPE: &'static str = "attendee.promoted.v1";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventHandler for PromotionNotifier {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let promoted: AttendeePromoted = event.payload_as().map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Malformed {} payload: {}", event.event_type, e),
            )
        })?;

        tracing::info!(
            session_id = %promoted.session_id,
            user_id = %promoted.user_id,
            attendance_id = %promoted.attendance_id,
            correlation_id = event.metadata.correlation_id.as_deref().unwrap_or("-"),
            "notify user: promoted from waitlist"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "PromotionNotifier"
    }
}
