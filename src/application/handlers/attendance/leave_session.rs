//! LeaveSessionHandler - withdraws the caller's own attendance.

use std::sync::Arc;

use crate::application::handlers::outcome::{envelopes, log_failure, publish_committed};
use crate::domain::foundation::{CommandMetadata, SessionId, Timestamp, UserId};
use crate::domain::session::{AttendanceError, Departure, DepartureReason};
use crate::ports::{EventPublisher, LockedRoster, SessionStore};

use super::departure_events;

/// Command to leave a session.
#[derive(Debug, Clone)]
pub struct LeaveSessionCommand {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub now: Timestamp,
}

/// Handler for leaving sessions.
pub struct LeaveSessionHandler {
    store: Arc<dyn SessionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl LeaveSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    /// Returns the removed attendance and whoever was promoted into the
    /// freed seat.
    pub async fn handle(
        &self,
        cmd: LeaveSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<Departure, AttendanceError> {
        let departure = self
            .withdraw(&cmd)
            .await
            .map_err(log_failure("leave", &cmd.session_id, &cmd.user_id))?;

        tracing::info!(
            session_id = %cmd.session_id,
            user_id = %cmd.user_id,
            promoted = departure.promoted.as_ref().map(|a| a.user_id().as_str()),
            "attendee left"
        );

        let (departed, promoted) = departure_events(&departure, DepartureReason::Left, cmd.now);
        let correlation_id = metadata.correlation_id();
        let mut outgoing = envelopes(&[departed], &metadata, &correlation_id);
        outgoing.extend(envelopes(promoted.as_slice(), &metadata, &correlation_id));
        publish_committed(self.event_publisher.as_ref(), outgoing, "leave").await;

        Ok(departure)
    }

    async fn withdraw(&self, cmd: &LeaveSessionCommand) -> Result<Departure, AttendanceError> {
        let LockedRoster { mut roster, tx } = self
            .store
            .lock_roster(&cmd.session_id)
            .await?
            .ok_or(AttendanceError::SessionNotFound(cmd.session_id))?;

        let departure = roster.leave(&cmd.user_id)?;
        tx.commit(roster.take_changes()).await?;
        Ok(departure)
    }
}
