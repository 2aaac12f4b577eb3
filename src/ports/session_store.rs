//! Session store port (write side).
//!
//! Defines the contract for persisting sessions and for the locked
//! read-modify-write cycle every attendance change goes through.
//!
//! # Design
//!
//! - **Exclusive per session**: `lock_roster` returns only once no other
//!   caller holds the same session; the lock lasts until the transaction is
//!   committed or dropped
//! - **All-or-nothing**: a dropped `RosterTransaction` leaves no trace
//! - **Tagged failures**: unique violations surface as `ConcurrencyConflict`

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::{RosterChange, Session, SessionRoster};

/// An open unit of work holding exclusive access to one session.
///
/// Dropping without `commit` rolls back.
#[async_trait]
pub trait RosterTransaction: Send {
    /// Applies `changes` in order and makes them durable.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if a change breaks a uniqueness constraint
    /// - `DatabaseError` on persistence failure
    async fn commit(self: Box<Self>, changes: Vec<RosterChange>) -> Result<(), DomainError>;
}

/// A roster snapshot plus the transaction that guards it.
pub struct LockedRoster {
    pub roster: SessionRoster,
    pub tx: Box<dyn RosterTransaction>,
}

impl std::fmt::Debug for LockedRoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockedRoster")
            .field("roster", &self.roster)
            .finish_non_exhaustive()
    }
}

/// Store port for sessions and their attendances.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Save a newly scheduled session.
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if the id is already taken
    /// - `DatabaseError` on persistence failure
    async fn create_session(&self, session: &Session) -> Result<(), DomainError>;

    /// Opens a transaction, locks the session and loads its roster.
    ///
    /// Returns `None` if the session does not exist.
    async fn lock_roster(&self, id: &SessionId) -> Result<Option<LockedRoster>, DomainError>;

    /// Cheap liveness check used by health endpoints.
    async fn ping(&self) -> Result<(), DomainError>;

    /// Releases pooled resources. Called once after the server drains.
    async fn close(&self);
}
