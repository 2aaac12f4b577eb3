//! Session roster aggregate.
//!
//! A roster is a session together with every attendance registered on it,
//! loaded while the store holds exclusive access to that session. All
//! join/leave/remove rules live here so they run against one consistent
//! snapshot; the mutations are recorded as `RosterChange`s that the store
//! applies in the same transaction.
//!
//! # Invariants
//!
//! - seated attendees never exceed capacity
//! - nobody waits while a seat is free
//! - the waitlist is promoted in registration order
//! - one attendance per user

use super::aggregate::Session;
use super::attendance::Attendance;
use super::capacity::{decide, Admission};
use super::errors::AttendanceError;
use crate::domain::foundation::{AttendanceId, Timestamp, UserId};

/// A write the store must apply when the roster is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterChange {
    Registered(Attendance),
    Withdrawn(AttendanceId),
    Promoted(AttendanceId),
}

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub attendance: Attendance,
    pub admission: Admission,
}

/// Result of a leave or a host removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub removed: Attendance,
    pub promoted: Option<Attendance>,
}

#[derive(Debug, Clone)]
pub struct SessionRoster {
    session: Session,
    /// Kept sorted by `Attendance::queue_key`.
    attendances: Vec<Attendance>,
    changes: Vec<RosterChange>,
}

impl SessionRoster {
    pub fn new(session: Session, mut attendances: Vec<Attendance>) -> Self {
        attendances.sort_by_key(Attendance::queue_key);
        Self {
            session,
            attendances,
            changes: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Attendances in registration order.
    pub fn attendances(&self) -> &[Attendance] {
        &self.attendances
    }

    pub fn seated_count(&self) -> usize {
        self.attendances.iter().filter(|a| !a.is_waitlisted()).count()
    }

    /// Waitlisted attendances, next to be promoted first.
    pub fn waitlist(&self) -> impl Iterator<Item = &Attendance> {
        self.attendances.iter().filter(|a| a.is_waitlisted())
    }

    pub fn find_by_user(&self, user_id: &UserId) -> Option<&Attendance> {
        self.attendances.iter().find(|a| a.user_id() == user_id)
    }

    pub fn is_attending(&self, user_id: &UserId) -> bool {
        self.find_by_user(user_id).is_some()
    }

    /// Registers `user_id`, seated or waitlisted depending on free seats.
    ///
    /// # Errors
    ///
    /// - `JoinWindowClosed` if `now` is past the session's join cutoff
    /// - `AlreadyRegistered` if the user already has an attendance here
    pub fn join(
        &mut self,
        user_id: UserId,
        now: Timestamp,
    ) -> Result<Registration, AttendanceError> {
        if !self.session.accepts_joins_at(&now) {
            return Err(AttendanceError::JoinWindowClosed);
        }
        if self.is_attending(&user_id) {
            return Err(AttendanceError::AlreadyRegistered);
        }

        let admission = decide(&self.session, self.seated_count());
        let attendance = Attendance::register(
            AttendanceId::new(),
            *self.session.id(),
            user_id,
            admission,
            now,
        );

        let key = attendance.queue_key();
        let at = self.attendances.partition_point(|a| a.queue_key() < key);
        self.attendances.insert(at, attendance.clone());
        self.changes.push(RosterChange::Registered(attendance.clone()));

        Ok(Registration {
            attendance,
            admission,
        })
    }

    /// Withdraws the caller's own attendance.
    ///
    /// # Errors
    ///
    /// - `NotRegistered` if the user has no attendance on this session
    pub fn leave(&mut self, user_id: &UserId) -> Result<Departure, AttendanceError> {
        let index = self
            .attendances
            .iter()
            .position(|a| a.user_id() == user_id)
            .ok_or(AttendanceError::NotRegistered)?;
        Ok(self.withdraw(index))
    }

    /// Removes someone else's attendance on behalf of the host.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if `caller` does not host the session
    /// - `AttendeeNotFound` if the attendance is not on this roster
    pub fn remove_attendee(
        &mut self,
        attendance_id: &AttendanceId,
        caller: &UserId,
    ) -> Result<Departure, AttendanceError> {
        if !self.session.is_host(caller) {
            return Err(AttendanceError::Forbidden);
        }
        let index = self
            .attendances
            .iter()
            .position(|a| a.id() == attendance_id)
            .ok_or(AttendanceError::AttendeeNotFound(*attendance_id))?;
        Ok(self.withdraw(index))
    }

    /// Drains the writes recorded since the roster was loaded.
    pub fn take_changes(&mut self) -> Vec<RosterChange> {
        std::mem::take(&mut self.changes)
    }

    fn withdraw(&mut self, index: usize) -> Departure {
        let removed = self.attendances.remove(index);
        self.changes.push(RosterChange::Withdrawn(*removed.id()));

        // A waitlisted departure frees no seat.
        let promoted = if removed.is_waitlisted() {
            None
        } else {
            self.promote_next()
        };

        Departure { removed, promoted }
    }

    fn promote_next(&mut self) -> Option<Attendance> {
        if self.seated_count() >= self.session.capacity() as usize {
            return None;
        }
        let next = self.attendances.iter_mut().find(|a| a.is_waitlisted())?;
        next.promote();
        self.changes.push(RosterChange::Promoted(*next.id()));
        Some(next.clone())
    }
}
