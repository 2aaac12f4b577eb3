//! GetSessionHandler - one session with its roster.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::session::{project, AttendanceError, SessionListing};
use crate::ports::SessionReader;

/// Query to get a session by ID.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
    pub viewer: Option<UserId>,
}

/// Handler for retrieving session details.
pub struct GetSessionHandler {
    reader: Arc<dyn SessionReader>,
}

impl GetSessionHandler {
    pub fn new(reader: Arc<dyn SessionReader>) -> Self {
        Self { reader }
    }

    /// The roster is included whether or not the session has started.
    pub async fn handle(&self, query: GetSessionQuery) -> Result<SessionListing, AttendanceError> {
        let roster = self
            .reader
            .find_roster(&query.session_id)
            .await
            .map_err(|e| {
                tracing::error!(
                    operation = "get_session",
                    session_id = %query.session_id,
                    error = %e,
                    "failed to load session"
                );
                AttendanceError::from(e)
            })?
            .ok_or(AttendanceError::SessionNotFound(query.session_id))?;

        Ok(project(&roster, query.viewer.as_ref(), true))
    }
}
