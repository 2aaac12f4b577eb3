//! In-memory SessionStore and SessionReader.
//!
//! Each session sits behind its own async mutex. `lock_roster` holds that
//! mutex (via an owned guard) until the transaction commits or is dropped,
//! which gives the same per-session serialization as the row lock in
//! PostgreSQL. Used by tests and by local runs without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::{Attendance, RosterChange, Session, SessionRoster};
use crate::ports::{LockedRoster, RosterTransaction, SessionReader, SessionStore};

#[derive(Debug, Clone)]
struct StoredSession {
    session: Session,
    attendances: Vec<Attendance>,
}

impl StoredSession {
    fn roster(&self) -> SessionRoster {
        SessionRoster::new(self.session.clone(), self.attendances.clone())
    }

    /// Applies changes to a copy so a failure leaves stored rows untouched.
    fn apply(&self, changes: Vec<RosterChange>) -> Result<Vec<Attendance>, DomainError> {
        let mut attendances = self.attendances.clone();
        for change in changes {
            match change {
                RosterChange::Registered(attendance) => {
                    if attendances.iter().any(|a| a.user_id() == attendance.user_id()) {
                        return Err(DomainError::conflict(format!(
                            "Attendance already exists for user {} on session {}",
                            attendance.user_id(),
                            self.session.id()
                        )));
                    }
                    attendances.push(attendance);
                }
                RosterChange::Withdrawn(id) => attendances.retain(|a| a.id() != &id),
                RosterChange::Promoted(id) => {
                    if let Some(a) = attendances.iter_mut().find(|a| a.id() == &id) {
                        a.promote();
                    }
                }
            }
        }
        Ok(attendances)
    }
}

type SessionSlot = Arc<AsyncMutex<StoredSession>>;

/// In-memory session store.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, SessionSlot>>,
    fail_commits: Arc<AtomicBool>,
    unavailable: AtomicBool,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent commit fail with a database error.
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Makes `ping` fail, as an unreachable database would.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Inserts attendances directly, bypassing the roster rules.
    pub async fn seed_attendances(&self, id: &SessionId, attendances: Vec<Attendance>) {
        if let Some(slot) = self.slot(id) {
            slot.lock().await.attendances.extend(attendances);
        }
    }

    fn slot(&self, id: &SessionId) -> Option<SessionSlot> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    fn slots(&self) -> Vec<SessionSlot> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if sessions.contains_key(session.id()) {
            return Err(DomainError::conflict(format!(
                "Session {} already exists",
                session.id()
            )));
        }
        sessions.insert(
            *session.id(),
            Arc::new(AsyncMutex::new(StoredSession {
                session: session.clone(),
                attendances: Vec::new(),
            })),
        );
        Ok(())
    }

    async fn lock_roster(&self, id: &SessionId) -> Result<Option<LockedRoster>, DomainError> {
        let Some(slot) = self.slot(id) else {
            return Ok(None);
        };
        let guard = slot.lock_owned().await;
        let roster = guard.roster();

        Ok(Some(LockedRoster {
            roster,
            tx: Box::new(InMemoryRosterTransaction {
                guard,
                fail: Arc::clone(&self.fail_commits),
            }),
        }))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::database("In-memory store marked unavailable"));
        }
        Ok(())
    }

    async fn close(&self) {
        tracing::debug!("in-memory session store closed");
    }
}

#[async_trait]
impl SessionReader for InMemorySessionStore {
    async fn list_rosters(&self) -> Result<Vec<SessionRoster>, DomainError> {
        let mut rosters = Vec::new();
        for slot in self.slots() {
            rosters.push(slot.lock().await.roster());
        }
        Ok(rosters)
    }

    async fn find_roster(&self, id: &SessionId) -> Result<Option<SessionRoster>, DomainError> {
        match self.slot(id) {
            Some(slot) => Ok(Some(slot.lock().await.roster())),
            None => Ok(None),
        }
    }
}

struct InMemoryRosterTransaction {
    guard: OwnedMutexGuard<StoredSession>,
    fail: Arc<AtomicBool>,
}

#[async_trait]
impl RosterTransaction for InMemoryRosterTransaction {
    async fn commit(self: Box<Self>, changes: Vec<RosterChange>) -> Result<(), DomainError> {
        let InMemoryRosterTransaction { mut guard, fail } = *self;
        if fail.load(Ordering::SeqCst) {
            return Err(DomainError::database("connection reset by peer"));
        }
        guard.attendances = guard.apply(changes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AttendanceId, Timestamp, UserId};
    use crate::domain::session::Admission;
    use std::time::Duration;

    fn session() -> Session {
        Session::reconstitute(
            SessionId::new(),
            UserId::new("host").unwrap(),
            Timestamp::now().plus_minutes(90),
            "Back Room".to_string(),
            2,
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn committed_changes_are_visible() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.create_session(&s).await.unwrap();

        let mut locked = store.lock_roster(s.id()).await.unwrap().unwrap();
        locked
            .roster
            .join(UserId::new("u1").unwrap(), Timestamp::now())
            .unwrap();
        let changes = locked.roster.take_changes();
        locked.tx.commit(changes).await.unwrap();

        let roster = store.find_roster(s.id()).await.unwrap().unwrap();
        assert_eq!(roster.seated_count(), 1);
    }

    #[tokio::test]
    async fn dropped_transaction_leaves_nothing_behind() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.create_session(&s).await.unwrap();

        {
            let mut locked = store.lock_roster(s.id()).await.unwrap().unwrap();
            locked
                .roster
                .join(UserId::new("u1").unwrap(), Timestamp::now())
                .unwrap();
        }

        let roster = store.find_roster(s.id()).await.unwrap().unwrap();
        assert!(roster.attendances().is_empty());
    }

    #[tokio::test]
    async fn duplicate_user_is_a_conflict_and_rolls_back() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.create_session(&s).await.unwrap();
        let user = UserId::new("u1").unwrap();
        let first = Attendance::register(
            AttendanceId::new(),
            *s.id(),
            user.clone(),
            Admission::Admit,
            Timestamp::now(),
        );
        store.seed_attendances(s.id(), vec![first]).await;

        let locked = store.lock_roster(s.id()).await.unwrap().unwrap();
        let again = Attendance::register(
            AttendanceId::new(),
            *s.id(),
            user,
            Admission::Admit,
            Timestamp::now(),
        );
        let err = locked
            .tx
            .commit(vec![RosterChange::Registered(again)])
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        let roster = store.find_roster(s.id()).await.unwrap().unwrap();
        assert_eq!(roster.attendances().len(), 1);
    }

    #[tokio::test]
    async fn second_lock_waits_for_first() {
        let store = Arc::new(InMemorySessionStore::new());
        let s = session();
        store.create_session(&s).await.unwrap();

        let first = store.lock_roster(s.id()).await.unwrap().unwrap();

        let contender = {
            let store = Arc::clone(&store);
            let id = *s.id();
            tokio::spawn(async move { store.lock_roster(&id).await.map(|l| l.is_some()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        first.tx.commit(Vec::new()).await.unwrap();
        assert!(contender.await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn unknown_session_locks_to_none() {
        let store = InMemorySessionStore::new();
        assert!(store.lock_roster(&SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_session_id_is_a_conflict() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.create_session(&s).await.unwrap();
        assert!(store.create_session(&s).await.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn ping_reflects_availability() {
        let store = InMemorySessionStore::new();
        assert!(store.ping().await.is_ok());
        store.set_unavailable(true);
        assert!(store.ping().await.is_err());
    }
}
