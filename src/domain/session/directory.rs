//! Per-viewer projection of sessions.
//!
//! Pure functions over loaded rosters: no store access, no clock reads.

use serde::Serialize;

use super::attendance::{Attendance, AttendanceStatus};
use super::roster::SessionRoster;
use crate::domain::foundation::{AttendanceId, SessionId, Timestamp, UserId};

/// One line of a session's roster as shown to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub attendance_id: AttendanceId,
    pub user_id: UserId,
    pub status: AttendanceStatus,
    pub is_waitlisted: bool,
    pub registered_at: Timestamp,
}

impl From<&Attendance> for RosterEntry {
    fn from(attendance: &Attendance) -> Self {
        Self {
            attendance_id: *attendance.id(),
            user_id: attendance.user_id().clone(),
            status: attendance.status(),
            is_waitlisted: attendance.is_waitlisted(),
            registered_at: *attendance.registered_at(),
        }
    }
}

/// A session annotated for one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionListing {
    pub id: SessionId,
    pub host_id: UserId,
    pub start_time: Timestamp,
    pub address: String,
    pub capacity: u32,
    pub seated_count: usize,
    pub waitlist_count: usize,
    pub is_host: bool,
    pub is_attending: bool,

    /// Present for upcoming sessions and detail views only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster: Option<Vec<RosterEntry>>,
}

/// Sessions split around `now`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionDirectory {
    /// Starting at or after `now`, soonest first.
    pub upcoming: Vec<SessionListing>,

    /// Already started, most recent first.
    pub past: Vec<SessionListing>,
}

/// Annotates a single roster for `viewer`.
pub fn project(
    roster: &SessionRoster,
    viewer: Option<&UserId>,
    include_roster: bool,
) -> SessionListing {
    let session = roster.session();
    let seated_count = roster.seated_count();

    SessionListing {
        id: *session.id(),
        host_id: session.host_id().clone(),
        start_time: *session.start_time(),
        address: session.address().to_string(),
        capacity: session.capacity(),
        seated_count,
        waitlist_count: roster.attendances().len() - seated_count,
        is_host: viewer.map_or(false, |v| session.is_host(v)),
        is_attending: viewer.map_or(false, |v| roster.is_attending(v)),
        roster: include_roster
            .then(|| roster.attendances().iter().map(RosterEntry::from).collect()),
    }
}

impl SessionDirectory {
    /// Partitions rosters into upcoming and past for `viewer`.
    ///
    /// Equal start times fall back to session id so the order is stable.
    pub fn build(rosters: &[SessionRoster], viewer: Option<&UserId>, now: Timestamp) -> Self {
        let (mut upcoming, mut past): (Vec<&SessionRoster>, Vec<&SessionRoster>) = rosters
            .iter()
            .partition(|r| r.session().is_upcoming(&now));

        upcoming.sort_by_key(|r| (*r.session().start_time(), *r.session().id()));
        past.sort_by_key(|r| (*r.session().start_time(), *r.session().id()));
        past.reverse();

        Self {
            upcoming: upcoming.into_iter().map(|r| project(r, viewer, true)).collect(),
            past: past.into_iter().map(|r| project(r, viewer, false)).collect(),
        }
    }
}
