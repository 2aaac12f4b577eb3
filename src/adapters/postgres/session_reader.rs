//! PostgreSQL implementation of SessionReader.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::session_store::{
    db_error, into_roster, AttendanceRow, SessionRow, ATTENDANCE_COLUMNS, SESSION_COLUMNS,
};
use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::SessionRoster;
use crate::ports::SessionReader;

#[derive(Clone)]
pub struct PostgresSessionReader {
    pool: PgPool,
}

impl PostgresSessionReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionReader for PostgresSessionReader {
    async fn list_rosters(&self) -> Result<Vec<SessionRoster>, DomainError> {
        let sessions: Vec<SessionRow> =
            sqlx::query_as(&format!("SELECT {} FROM game_sessions", SESSION_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("Failed to list sessions"))?;

        let attendances: Vec<AttendanceRow> = sqlx::query_as(&format!(
            "SELECT {} FROM attendances ORDER BY registered_at, id",
            ATTENDANCE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list attendances"))?;

        let mut by_session: HashMap<Uuid, Vec<AttendanceRow>> = HashMap::new();
        for row in attendances {
            by_session.entry(row.session_id).or_default().push(row);
        }

        sessions
            .into_iter()
            .map(|session| {
                let rows = by_session.remove(&session.id).unwrap_or_default();
                into_roster(session, rows)
            })
            .collect()
    }

    async fn find_roster(&self, id: &SessionId) -> Result<Option<SessionRoster>, DomainError> {
        let session: Option<SessionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM game_sessions WHERE id = $1",
            SESSION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch session"))?;

        let Some(session) = session else {
            return Ok(None);
        };

        let attendances: Vec<AttendanceRow> = sqlx::query_as(&format!(
            "SELECT {} FROM attendances WHERE session_id = $1 ORDER BY registered_at, id",
            ATTENDANCE_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to fetch attendances"))?;

        into_roster(session, attendances).map(Some)
    }
}
