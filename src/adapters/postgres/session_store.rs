//! PostgreSQL implementation of SessionStore.
//!
//! Roster transactions take `SELECT ... FOR UPDATE` on the session row, so
//! concurrent joins and departures on the same session run one at a time.
//! The unique index on `attendances(session_id, user_id)` backs up the
//! duplicate check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::foundation::{
    AttendanceId, DomainError, SessionId, Timestamp, UserId,
};
use crate::domain::session::{Attendance, RosterChange, Session, SessionRoster};
use crate::ports::{LockedRoster, RosterTransaction, SessionStore};

// ════════════════════════════════════════════════════════════════════════════
// Rows
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, sqlx::FromRow)]
pub(super) struct SessionRow {
    pub id: Uuid,
    pub host_id: String,
    pub start_time: DateTime<Utc>,
    pub address: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for Session {
    type Error = DomainError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let host_id = UserId::new(row.host_id)
            .map_err(|e| DomainError::database(format!("Corrupt host_id on session {}: {}", row.id, e)))?;
        let capacity = u32::try_from(row.capacity).map_err(|_| {
            DomainError::database(format!("Corrupt capacity on session {}: {}", row.id, row.capacity))
        })?;

        Ok(Session::reconstitute(
            SessionId::from_uuid(row.id),
            host_id,
            Timestamp::from_datetime(row.start_time),
            row.address,
            capacity,
            Timestamp::from_datetime(row.created_at),
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct AttendanceRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: String,
    pub is_waitlisted: bool,
    pub registered_at: DateTime<Utc>,
}

impl TryFrom<AttendanceRow> for Attendance {
    type Error = DomainError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let user_id = UserId::new(row.user_id).map_err(|e| {
            DomainError::database(format!("Corrupt user_id on attendance {}: {}", row.id, e))
        })?;

        Ok(Attendance::reconstitute(
            AttendanceId::from_uuid(row.id),
            SessionId::from_uuid(row.session_id),
            user_id,
            row.is_waitlisted,
            Timestamp::from_datetime(row.registered_at),
        ))
    }
}

pub(super) const SESSION_COLUMNS: &str =
    "id, host_id, start_time, address, capacity, created_at";

pub(super) const ATTENDANCE_COLUMNS: &str =
    "id, session_id, user_id, is_waitlisted, registered_at";

/// Maps a sqlx error, tagging unique violations as conflicts.
pub(super) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| match e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            DomainError::conflict(format!("{}: {}", context, db_err))
        }
        other => DomainError::database(format!("{}: {}", context, other)),
    }
}

pub(super) fn into_roster(
    session: SessionRow,
    attendances: Vec<AttendanceRow>,
) -> Result<SessionRoster, DomainError> {
    let session = Session::try_from(session)?;
    let attendances = attendances
        .into_iter()
        .map(Attendance::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SessionRoster::new(session, attendances))
}

// ════════════════════════════════════════════════════════════════════════════
// Store
// ════════════════════════════════════════════════════════════════════════════

/// PostgreSQL implementation of SessionStore.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn create_session(&self, session: &Session) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO game_sessions (id, host_id, start_time, address, capacity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.id().as_uuid())
        .bind(session.host_id().as_str())
        .bind(session.start_time().as_datetime())
        .bind(session.address())
        .bind(session.capacity() as i32)
        .bind(session.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert session"))?;

        Ok(())
    }

    async fn lock_roster(&self, id: &SessionId) -> Result<Option<LockedRoster>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let session: Option<SessionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM game_sessions WHERE id = $1 FOR UPDATE",
            SESSION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock session"))?;

        let Some(session) = session else {
            return Ok(None);
        };

        let attendances: Vec<AttendanceRow> = sqlx::query_as(&format!(
            "SELECT {} FROM attendances WHERE session_id = $1 ORDER BY registered_at, id",
            ATTENDANCE_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error("Failed to load attendances"))?;

        Ok(Some(LockedRoster {
            roster: into_roster(session, attendances)?,
            tx: Box::new(PostgresRosterTransaction {
                tx,
                session_id: *id,
            }),
        }))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error("Health query failed"))?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Transaction
// ════════════════════════════════════════════════════════════════════════════

/// Open transaction holding the session row lock.
struct PostgresRosterTransaction {
    tx: Transaction<'static, Postgres>,
    session_id: SessionId,
}

#[async_trait]
impl RosterTransaction for PostgresRosterTransaction {
    async fn commit(self: Box<Self>, changes: Vec<RosterChange>) -> Result<(), DomainError> {
        let PostgresRosterTransaction { mut tx, session_id } = *self;

        for change in changes {
            match change {
                RosterChange::Registered(attendance) => {
                    sqlx::query(
                        r#"
                        INSERT INTO attendances (id, session_id, user_id, is_waitlisted, registered_at)
                        VALUES ($1, $2, $3, $4, $5)
                        "#,
                    )
                    .bind(attendance.id().as_uuid())
                    .bind(session_id.as_uuid())
                    .bind(attendance.user_id().as_str())
                    .bind(attendance.is_waitlisted())
                    .bind(attendance.registered_at().as_datetime())
                    .execute(&mut *tx)
                    .await
                    .map_err(db_error("Failed to insert attendance"))?;
                }
                RosterChange::Withdrawn(id) => {
                    sqlx::query("DELETE FROM attendances WHERE id = $1 AND session_id = $2")
                        .bind(id.as_uuid())
                        .bind(session_id.as_uuid())
                        .execute(&mut *tx)
                        .await
                        .map_err(db_error("Failed to delete attendance"))?;
                }
                RosterChange::Promoted(id) => {
                    sqlx::query(
                        "UPDATE attendances SET is_waitlisted = FALSE WHERE id = $1 AND session_id = $2",
                    )
                    .bind(id.as_uuid())
                    .bind(session_id.as_uuid())
                    .execute(&mut *tx)
                    .await
                    .map_err(db_error("Failed to promote attendance"))?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;
        Ok(())
    }
}
