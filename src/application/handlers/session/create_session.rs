//! CreateSessionHandler - schedules a new game night.

use std::sync::Arc;

use crate::application::handlers::outcome::{envelopes, publish_committed};
use crate::domain::foundation::{CommandMetadata, EventId, SessionId, Timestamp, UserId};
use crate::domain::session::{AttendanceError, Session, SessionScheduled};
use crate::ports::{EventPublisher, SessionStore};

/// Command to schedule a session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub host_id: UserId,
    pub start_time: Timestamp,
    pub address: String,
    pub capacity: u32,
    pub now: Timestamp,
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    store: Arc<dyn SessionStore>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<Session, AttendanceError> {
        // 1. Validate and build
        let session = Session::schedule(
            SessionId::new(),
            cmd.host_id.clone(),
            cmd.start_time,
            cmd.address,
            cmd.capacity,
            cmd.now,
        )?;

        // 2. Persist
        self.store.create_session(&session).await.map_err(|e| {
            tracing::error!(
                operation = "create_session",
                session_id = %session.id(),
                user_id = %cmd.host_id,
                error = %e,
                "failed to persist session"
            );
            AttendanceError::from(e)
        })?;

        tracing::info!(
            session_id = %session.id(),
            user_id = %cmd.host_id,
            capacity = session.capacity(),
            "session scheduled"
        );

        // 3. Publish
        let event = SessionScheduled {
            event_id: EventId::new(),
            session_id: *session.id(),
            host_id: cmd.host_id,
            start_time: *session.start_time(),
            capacity: session.capacity(),
            scheduled_at: *session.created_at(),
        };
        let correlation_id = metadata.correlation_id();
        publish_committed(
            self.event_publisher.as_ref(),
            envelopes(&[event], &metadata, &correlation_id),
            "create_session",
        )
        .await;

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::ports::SessionReader;

    fn command(address: &str, capacity: u32, starts_in_minutes: i64) -> CreateSessionCommand {
        let now = Timestamp::now();
        CreateSessionCommand {
            host_id: UserId::new("host-1").unwrap(),
            start_time: now.plus_minutes(starts_in_minutes),
            address: address.to_string(),
            capacity,
            now,
        }
    }

    fn handler() -> (CreateSessionHandler, Arc<InMemorySessionStore>, Arc<InMemoryEventBus>) {
        let store = Arc::new(InMemorySessionStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        (
            CreateSessionHandler::new(store.clone(), bus.clone()),
            store,
            bus,
        )
    }

    #[tokio::test]
    async fn creates_and_persists_session() {
        let (handler, store, bus) = handler();

        let session = handler
            .handle(command("42 Dice Street", 6, 90), CommandMetadata::test_fixture())
            .await
            .unwrap();

        let stored = store.find_roster(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.session(), &session);
        assert!(bus.has_event("session.scheduled.v1"));
    }

    #[tokio::test]
    async fn invalid_capacity_is_rejected_before_persisting() {
        let (handler, store, bus) = handler();

        let err = handler
            .handle(command("42 Dice Street", 0, 90), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert!(matches!(err, AttendanceError::ValidationFailed { ref field, .. } if field == "capacity"));
        assert!(store.list_rosters().await.unwrap().is_empty());
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn past_start_is_rejected() {
        let (handler, _, _) = handler();

        let err = handler
            .handle(command("Hall", 4, -30), CommandMetadata::test_fixture())
            .await
            .unwrap_err();

        assert!(matches!(err, AttendanceError::ValidationFailed { ref field, .. } if field == "start_time"));
    }
}
