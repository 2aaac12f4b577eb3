//! ListSessionsHandler - upcoming and past sessions for a viewer.

use std::sync::Arc;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::session::{AttendanceError, SessionDirectory};
use crate::ports::SessionReader;

/// Query for the session directory.
#[derive(Debug, Clone)]
pub struct ListSessionsQuery {
    /// `None` for anonymous callers.
    pub viewer: Option<UserId>,
    pub now: Timestamp,
}

/// Handler for listing sessions.
pub struct ListSessionsHandler {
    reader: Arc<dyn SessionReader>,
}

impl ListSessionsHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListSessionsQuery) -> Result<SessionDirectory, AttendanceError> {
        let rosters = self.reader.list_rosters().await.map_err(|e| {
            tracing::error!(operation = "list_sessions", error = %e, "failed to load sessions");
            AttendanceError::from(e)
        })?;

        Ok(SessionDirectory::build(&rosters, query.viewer.as_ref(), query.now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DomainError, SessionId};
    use crate::domain::session::{Session, SessionRoster};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockSessionReader {
        rosters: Mutex<Vec<SessionRoster>>,
        fail: bool,
    }

    impl MockSessionReader {
        fn with(rosters: Vec<SessionRoster>) -> Self {
            Self {
                rosters: Mutex::new(rosters),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                rosters: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl SessionReader for MockSessionReader {
        async fn list_rosters(&self) -> Result<Vec<SessionRoster>, DomainError> {
            if self.fail {
                return Err(DomainError::database("Simulated read failure"));
            }
            Ok(self.rosters.lock().unwrap().clone())
        }

        async fn find_roster(&self, _id: &SessionId) -> Result<Option<SessionRoster>, DomainError> {
            Ok(None)
        }
    }

    fn roster(host: &str, start: Timestamp) -> SessionRoster {
        SessionRoster::new(
            Session::reconstitute(
                SessionId::new(),
                UserId::new(host).unwrap(),
                start,
                "Club House".to_string(),
                4,
                start.minus_minutes(1000),
            ),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn splits_and_annotates_for_viewer() {
        let now = Timestamp::now();
        let reader = MockSessionReader::with(vec![
            roster("alice", now.plus_minutes(60)),
            roster("bob", now.minus_minutes(60)),
        ]);
        let handler = ListSessionsHandler::new(Arc::new(reader));

        let directory = handler
            .handle(ListSessionsQuery {
                viewer: Some(UserId::new("alice").unwrap()),
                now,
            })
            .await
            .unwrap();

        assert_eq!(directory.upcoming.len(), 1);
        assert!(directory.upcoming[0].is_host);
        assert_eq!(directory.past.len(), 1);
        assert!(!directory.past[0].is_host);
    }

    #[tokio::test]
    async fn read_failure_is_internal() {
        let handler = ListSessionsHandler::new(Arc::new(MockSessionReader::failing()));

        let err = handler
            .handle(ListSessionsQuery {
                viewer: None,
                now: Timestamp::now(),
            })
            .await
            .unwrap_err();

        assert!(err.is_internal());
    }
}
