//! JoinSessionHandler - registers a user on a session.

use std::sync::Arc;

use crate::application::handlers::outcome::{envelopes, log_failure, publish_committed};
use crate::domain::foundation::{CommandMetadata, EventId, SessionId, Timestamp, UserId};
use crate::domain::session::{Admission, Attendance, AttendanceError, AttendeeRegistered};
use crate::ports::{EventPublisher, LockedRoster, SessionStore};

/// Command to join a session.
///
/// Carries no timestamp: the registration time is read once the roster lock
/// is held, so `registered_at` order matches commit order.
#[derive(Debug, Clone)]
pub struct JoinSessionCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
}

/// Result of a successful join.
#[derive(Debug, Clone)]
pub struct JoinSessionResult {
    pub attendance: Attendance,
    pub admission: Admission,
}

/// Handler for joining sessions.
pub struct JoinSessionHandler {
    store: Arc<dyn SessionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl JoinSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: JoinSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<JoinSessionResult, AttendanceError> {
        let result = self
            .register(&cmd)
            .await
            .map_err(log_failure("join", &cmd.session_id, &cmd.user_id))?;

        tracing::info!(
            session_id = %cmd.session_id,
            user_id = %cmd.user_id,
            waitlisted = result.admission.is_waitlisted(),
            "attendee registered"
        );

        let event = AttendeeRegistered {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            attendance_id: *result.attendance.id(),
            user_id: cmd.user_id,
            waitlisted: result.admission.is_waitlisted(),
            registered_at: *result.attendance.registered_at(),
        };
        let correlation_id = metadata.correlation_id();
        publish_committed(
            self.event_publisher.as_ref(),
            envelopes(&[event], &metadata, &correlation_id),
            "join",
        )
        .await;

        Ok(result)
    }

    async fn register(&self, cmd: &JoinSessionCommand) -> Result<JoinSessionResult, AttendanceError> {
        let LockedRoster { mut roster, tx } = self
            .store
            .lock_roster(&cmd.session_id)
            .await?
            .ok_or(AttendanceError::SessionNotFound(cmd.session_id))?;

        let now = Timestamp::now();
        // Rejections drop `tx`, which rolls back with nothing written.
        let registration = roster.join(cmd.user_id.clone(), now)?;
        tx.commit(roster.take_changes()).await?;

        Ok(JoinSessionResult {
            attendance: registration.attendance,
            admission: registration.admission,
        })
    }
}
