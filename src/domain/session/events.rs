//! Game session domain events.
//!
//! Published after the roster change that caused them has been committed:
//! - `SessionScheduled` - New session scheduled by a host
//! - `AttendeeRegistered` - User joined, seated or waitlisted
//! - `AttendeeDeparted` - User left, or was removed by the host
//! - `AttendeePromoted` - Waitlisted user moved into a freed seat

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, AttendanceId, EventId, SessionId, Timestamp, UserId,
};

// ════════════════════════════════════════════════════════════════════════════
// SessionScheduled
// ════════════════════════════════════════════════════════════════════════════

/// Published when a host schedules a new game night.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScheduled {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub host_id: UserId,
    pub start_time: Timestamp,
    pub capacity: u32,
    pub scheduled_at: Timestamp,
}

domain_event!(
    SessionScheduled,
    event_type = "session.scheduled.v1",
    aggregate_id = session_id,
    aggregate_type = "GameSession",
    occurred_at = scheduled_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// AttendeeRegistered
// ════════════════════════════════════════════════════════════════════════════

/// Published when a user joins a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendeeRegistered {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub attendance_id: AttendanceId,
    pub user_id: UserId,

    /// True when the user landed on the waitlist.
    pub waitlisted: bool,

    pub registered_at: Timestamp,
}

domain_event!(
    AttendeeRegistered,
    event_type = "attendee.registered.v1",
    aggregate_id = session_id,
    aggregate_type = "GameSession",
    occurred_at = registered_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// AttendeeDeparted
// ════════════════════════════════════════════════════════════════════════════

/// How an attendance came to be withdrawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartureReason {
    Left,
    RemovedByHost,
}

/// Published when an attendance is withdrawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendeeDeparted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub attendance_id: AttendanceId,
    pub user_id: UserId,
    pub reason: DepartureReason,
    pub was_waitlisted: bool,
    pub departed_at: Timestamp,
}

domain_event!(
    AttendeeDeparted,
    event_type = "attendee.departed.v1",
    aggregate_id = session_id,
    aggregate_type = "GameSession",
    occurred_at = departed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// AttendeePromoted
// ════════════════════════════════════════════════════════════════════════════

/// Published when the head of the waitlist takes a freed seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendeePromoted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub attendance_id: AttendanceId,
    pub user_id: UserId,
    pub promoted_at: Timestamp,
}

domain_event!(
    AttendeePromoted,
    event_type = "attendee.promoted.v1",
    aggregate_id = session_id,
    aggregate_type = "GameSession",
    occurred_at = promoted_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// Unit Tests
// ════════════════════════════════════════════════════════════════════════════
