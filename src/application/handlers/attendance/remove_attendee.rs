//! RemoveAttendeeHandler - host removes someone from their session.

use std::sync::Arc;

use crate::application::handlers::outcome::{envelopes, log_failure, publish_committed};
use crate::domain::foundation::{AttendanceId, CommandMetadata, SessionId, Timestamp, UserId};
use crate::domain::session::{AttendanceError, Departure, DepartureReason};
use crate::ports::{EventPublisher, LockedRoster, SessionStore};

use super::departure_events;

/// Command to remove an attendee.
#[derive(Debug, Clone)]
pub struct RemoveAttendeeCommand {
    pub session_id: SessionId,
    pub attendance_id: AttendanceId,
    pub caller_id: UserId,
    pub now: Timestamp,
}

/// Handler for host removals.
pub struct RemoveAttendeeHandler {
    store: Arc<dyn SessionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RemoveAttendeeHandler {
    pub fn new(store: Arc<dyn SessionStore>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: RemoveAttendeeCommand,
        metadata: CommandMetadata,
    ) -> Result<Departure, AttendanceError> {
        let departure = self
            .remove(&cmd)
            .await
            .map_err(log_failure("remove_attendee", &cmd.session_id, &cmd.caller_id))?;

        tracing::info!(
            session_id = %cmd.session_id,
            user_id = %cmd.caller_id,
            removed = %departure.removed.user_id(),
            "attendee removed by host"
        );

        let (departed, promoted) =
            departure_events(&departure, DepartureReason::RemovedByHost, cmd.now);
        let correlation_id = metadata.correlation_id();
        let mut outgoing = envelopes(&[departed], &metadata, &correlation_id);
        outgoing.extend(envelopes(promoted.as_slice(), &metadata, &correlation_id));
        publish_committed(self.event_publisher.as_ref(), outgoing, "remove_attendee").await;

        Ok(departure)
    }

    async fn remove(&self, cmd: &RemoveAttendeeCommand) -> Result<Departure, AttendanceError> {
        let LockedRoster { mut roster, tx } = self
            .store
            .lock_roster(&cmd.session_id)
            .await?
            .ok_or(AttendanceError::SessionNotFound(cmd.session_id))?;

        let departure = roster.remove_attendee(&cmd.attendance_id, &cmd.caller_id)?;
        tx.commit(roster.take_changes()).await?;
        Ok(departure)
    }
}
