//! Attendance record: one user's registration on one session.

use serde::{Deserialize, Serialize};

use super::capacity::Admission;
use crate::domain::foundation::{AttendanceId, SessionId, Timestamp, UserId};

/// Whether an attendance holds a seat or waits for one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Active,
    Waitlisted,
}

/// A user's registration on a session.
///
/// The only mutation after creation is promotion from the waitlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    id: AttendanceId,
    session_id: SessionId,
    user_id: UserId,
    is_waitlisted: bool,
    registered_at: Timestamp,
}

impl Attendance {
    /// Registers a user with the outcome of the capacity decision.
    pub fn register(
        id: AttendanceId,
        session_id: SessionId,
        user_id: UserId,
        admission: Admission,
        registered_at: Timestamp,
    ) -> Self {
        Self {
            id,
            session_id,
            user_id,
            is_waitlisted: admission.is_waitlisted(),
            registered_at,
        }
    }

    /// Reconstitute an attendance from persistence.
    pub fn reconstitute(
        id: AttendanceId,
        session_id: SessionId,
        user_id: UserId,
        is_waitlisted: bool,
        registered_at: Timestamp,
    ) -> Self {
        Self {
            id,
            session_id,
            user_id,
            is_waitlisted,
            registered_at,
        }
    }

    pub fn id(&self) -> &AttendanceId {
        &self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn is_waitlisted(&self) -> bool {
        self.is_waitlisted
    }

    pub fn registered_at(&self) -> &Timestamp {
        &self.registered_at
    }

    pub fn status(&self) -> AttendanceStatus {
        if self.is_waitlisted {
            AttendanceStatus::Waitlisted
        } else {
            AttendanceStatus::Active
        }
    }

    /// Sort key for FIFO waitlist order. The id breaks registration ties.
    pub(crate) fn queue_key(&self) -> (Timestamp, AttendanceId) {
        (self.registered_at, self.id)
    }

    /// Moves a waitlisted attendance into a seat. Returns false if it
    /// already held one.
    pub(crate) fn promote(&mut self) -> bool {
        std::mem::replace(&mut self.is_waitlisted, false)
    }
}
