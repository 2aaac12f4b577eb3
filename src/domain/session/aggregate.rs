//! Game session entity.
//!
//! A session is a scheduled game night with a fixed start time, a venue and a
//! capacity. It is owned by its host and never changes after scheduling.
//!
//! # Ownership
//!
//! Sessions reference their host by `UserId` only. Attendance records are
//! owned by the roster, not by the session.

use crate::domain::foundation::{DomainError, SessionId, Timestamp, UserId, ValidationError};
use serde::{Deserialize, Serialize};

/// Minutes before start after which joins are refused.
pub const JOIN_CUTOFF_MINUTES: i64 = 5;

/// Maximum length for the venue address.
pub const MAX_ADDRESS_LENGTH: usize = 500;

/// Upper bound on seats a host may offer.
pub const MAX_CAPACITY: u32 = 1000;

/// Scheduled game night.
///
/// # Invariants
///
/// - `capacity` is between 1 and `MAX_CAPACITY`
/// - `address` is non-empty and at most `MAX_ADDRESS_LENGTH` characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    host_id: UserId,
    start_time: Timestamp,
    address: String,
    capacity: u32,
    created_at: Timestamp,
}

impl Session {
    /// Schedule a new session.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the address or capacity is out of bounds, or
    ///   the start time is already in the past
    pub fn schedule(
        id: SessionId,
        host_id: UserId,
        start_time: Timestamp,
        address: String,
        capacity: u32,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        let address = Self::validate_address(address)?;
        Self::validate_capacity(capacity)?;
        if start_time.is_before(&now) {
            return Err(DomainError::validation(
                "start_time",
                "Start time must not be in the past",
            ));
        }

        Ok(Self {
            id,
            host_id,
            start_time,
            address,
            capacity,
            created_at: now,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(
        id: SessionId,
        host_id: UserId,
        start_time: Timestamp,
        address: String,
        capacity: u32,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            host_id,
            start_time,
            address,
            capacity,
            created_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn host_id(&self) -> &UserId {
        &self.host_id
    }

    pub fn start_time(&self) -> &Timestamp {
        &self.start_time
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rules
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks if the given user hosts this session.
    pub fn is_host(&self, user_id: &UserId) -> bool {
        &self.host_id == user_id
    }

    /// Last instant at which a join is still accepted.
    pub fn join_cutoff(&self) -> Timestamp {
        self.start_time.minus_minutes(JOIN_CUTOFF_MINUTES)
    }

    /// Joins are accepted up to and including the cutoff instant.
    pub fn accepts_joins_at(&self, now: &Timestamp) -> bool {
        !now.is_after(&self.join_cutoff())
    }

    /// A session starting exactly now still counts as upcoming.
    pub fn is_upcoming(&self, now: &Timestamp) -> bool {
        !self.start_time.is_before(now)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn validate_address(address: String) -> Result<String, ValidationError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("address"));
        }
        if trimmed.chars().count() > MAX_ADDRESS_LENGTH {
            return Err(ValidationError::invalid_format(
                "address",
                format!("must be {} characters or less", MAX_ADDRESS_LENGTH),
            ));
        }
        Ok(trimmed.to_string())
    }

    fn validate_capacity(capacity: u32) -> Result<(), ValidationError> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(ValidationError::out_of_range(
                "capacity",
                1,
                MAX_CAPACITY as i64,
                capacity as i64,
            ));
        }
        Ok(())
    }
}
