//! Attendance command handlers: join, leave, and host removal.
//!
//! Every handler follows the same shape: lock the roster, apply one domain
//! operation, commit, then publish events. Nothing is published unless the
//! commit succeeded.

mod join_session;
mod leave_session;
mod remove_attendee;

pub use join_session::{JoinSessionCommand, JoinSessionHandler, JoinSessionResult};
pub use leave_session::{LeaveSessionCommand, LeaveSessionHandler};
pub use remove_attendee::{RemoveAttendeeCommand, RemoveAttendeeHandler};

use crate::domain::foundation::{EventId, Timestamp};
use crate::domain::session::{AttendeeDeparted, AttendeePromoted, Departure, DepartureReason};

fn departure_events(
    departure: &Departure,
    reason: DepartureReason,
    at: Timestamp,
) -> (AttendeeDeparted, Option<AttendeePromoted>) {
    let removed = &departure.removed;
    let departed = AttendeeDeparted {
        event_id: EventId::new(),
        session_id: *removed.session_id(),
        attendance_id: *removed.id(),
        user_id: removed.user_id().clone(),
        reason,
        was_waitlisted: removed.is_waitlisted(),
        departed_at: at,
    };
    let promoted = departure.promoted.as_ref().map(|a| AttendeePromoted {
        event_id: EventId::new(),
        session_id: *a.session_id(),
        attendance_id: *a.id(),
        user_id: a.user_id().clone(),
        promoted_at: at,
    });
    (departed, promoted)
}
