//! Session reader port (read side).
//!
//! Loads rosters without locking, for listings and detail views. Results
//! may be stale by the time they are rendered.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::SessionRoster;

/// Reader port for session listings.
#[async_trait]
pub trait SessionReader: Send + Sync {
    /// Every session with its attendances, in no particular order.
    async fn list_rosters(&self) -> Result<Vec<SessionRoster>, DomainError>;

    /// One session with its attendances.
    ///
    /// Returns `None` if not found.
    async fn find_roster(&self, id: &SessionId) -> Result<Option<SessionRoster>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn SessionReader) {}
    }
}
