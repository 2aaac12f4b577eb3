//! Game session domain module.
//!
//! Scheduling of game nights and the attendance rules around them: capacity,
//! waitlisting, the join cutoff and FIFO promotion.
//!
//! # Structure
//!
//! - `Session` - Scheduled game night, immutable once created
//! - `Attendance` - One user's registration, seated or waitlisted
//! - `capacity::decide` - Seat-or-wait policy
//! - `SessionRoster` - Aggregate enforcing the attendance rules
//! - `SessionDirectory` - Per-viewer listing projection
//!
//! # Events
//!
//! - `SessionScheduled` - Published when a host schedules a session
//! - `AttendeeRegistered` - Published when a user joins
//! - `AttendeeDeparted` - Published when an attendance is withdrawn
//! - `AttendeePromoted` - Published when the waitlist head takes a seat

mod aggregate;
mod attendance;
pub mod capacity;
mod directory;
mod errors;
mod events;
mod roster;

pub use aggregate::{Session, JOIN_CUTOFF_MINUTES, MAX_ADDRESS_LENGTH, MAX_CAPACITY};
pub use attendance::{Attendance, AttendanceStatus};
pub use capacity::{decide, Admission};
pub use directory::{project, RosterEntry, SessionDirectory, SessionListing};
pub use errors::AttendanceError;
pub use events::{
    AttendeeDeparted, AttendeePromoted, AttendeeRegistered, DepartureReason, SessionScheduled,
};
pub use roster::{Departure, Registration, RosterChange, SessionRoster};
