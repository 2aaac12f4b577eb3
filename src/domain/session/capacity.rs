//! Capacity policy: decides whether a join takes a seat or waits.
//!
//! Pure and deterministic. Callers must pass a seat count read inside the
//! same transaction as the write that acts on the decision.

use serde::{Deserialize, Serialize};

use super::aggregate::Session;

/// Outcome of applying the capacity policy to a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    Admit,
    Waitlist,
}

impl Admission {
    pub fn is_waitlisted(self) -> bool {
        matches!(self, Admission::Waitlist)
    }

    /// Message shown to the caller after a successful join.
    pub fn message(self) -> &'static str {
        match self {
            Admission::Admit => "Successfully joined game",
            Admission::Waitlist => "Added to waitlist",
        }
    }
}

/// `Admit` while seated attendees are below capacity, `Waitlist` otherwise.
pub fn decide(session: &Session, seated: usize) -> Admission {
    if seated < session.capacity() as usize {
        Admission::Admit
    } else {
        Admission::Waitlist
    }
}
