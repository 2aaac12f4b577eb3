//! HTTP DTOs for session endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::session::{
    Attendance, AttendanceStatus, RosterEntry, Session, SessionDirectory, SessionListing,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to schedule a new session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    /// RFC 3339 timestamp.
    pub start_time: DateTime<Utc>,
    pub address: String,
    pub capacity: u32,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A freshly created session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    pub host_id: String,
    pub start_time: String,
    pub address: String,
    pub capacity: u32,
    pub created_at: String,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            host_id: session.host_id().to_string(),
            start_time: session.start_time().to_rfc3339(),
            address: session.address().to_string(),
            capacity: session.capacity(),
            created_at: session.created_at().to_rfc3339(),
        }
    }
}

/// One attendance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    pub status: AttendanceStatus,
    pub is_waitlisted: bool,
    pub registered_at: String,
}

impl From<&Attendance> for AttendanceResponse {
    fn from(a: &Attendance) -> Self {
        Self {
            id: a.id().to_string(),
            session_id: a.session_id().to_string(),
            user_id: a.user_id().to_string(),
            status: a.status(),
            is_waitlisted: a.is_waitlisted(),
            registered_at: a.registered_at().to_rfc3339(),
        }
    }
}

/// Response to a successful join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResponse {
    pub message: String,
    pub attendance: AttendanceResponse,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntryResponse {
    pub attendance_id: String,
    pub user_id: String,
    pub status: AttendanceStatus,
    pub is_waitlisted: bool,
    pub registered_at: String,
}

impl From<&RosterEntry> for RosterEntryResponse {
    fn from(entry: &RosterEntry) -> Self {
        Self {
            attendance_id: entry.attendance_id.to_string(),
            user_id: entry.user_id.to_string(),
            status: entry.status,
            is_waitlisted: entry.is_waitlisted,
            registered_at: entry.registered_at.to_rfc3339(),
        }
    }
}

/// A session annotated for the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListingResponse {
    pub id: String,
    pub host_id: String,
    pub start_time: String,
    pub address: String,
    pub capacity: u32,
    pub seated_count: usize,
    pub waitlist_count: usize,
    pub is_host: bool,
    pub is_attending: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<RosterEntryResponse>>,
}

impl From<&SessionListing> for SessionListingResponse {
    fn from(listing: &SessionListing) -> Self {
        Self {
            id: listing.id.to_string(),
            host_id: listing.host_id.to_string(),
            start_time: listing.start_time.to_rfc3339(),
            address: listing.address.clone(),
            capacity: listing.capacity,
            seated_count: listing.seated_count,
            waitlist_count: listing.waitlist_count,
            is_host: listing.is_host,
            is_attending: listing.is_attending,
            attendees: listing
                .roster
                .as_ref()
                .map(|entries| entries.iter().map(Into::into).collect()),
        }
    }
}

/// Upcoming and past sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDirectoryResponse {
    pub upcoming: Vec<SessionListingResponse>,
    pub past: Vec<SessionListingResponse>,
}

impl From<&SessionDirectory> for SessionDirectoryResponse {
    fn from(directory: &SessionDirectory) -> Self {
        Self {
            upcoming: directory.upcoming.iter().map(Into::into).collect(),
            past: directory.past.iter().map(Into::into).collect(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    /// Never carries internal detail.
    pub fn internal() -> Self {
        Self::new("INTERNAL_ERROR", "Internal server error")
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
