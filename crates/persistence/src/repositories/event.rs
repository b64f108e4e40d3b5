//! Narrow repository over the telemetry `events` table, owned by the event
//! ingestion subsystem. Only the old-event maintenance queries used by the
//! admin tool live here.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::metrics::QueryTimer;

/// Repository for event maintenance operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Creates a new EventRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count events for an account older than the cutoff.
    pub async fn count_events_before(
        &self,
        account_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_events_before");
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) AS count FROM events WHERE account_id = $1 AND event_time < $2",
        )
        .bind(account_id)
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0)
    }

    /// Delete events for an account older than the cutoff; returns the
    /// number of rows removed.
    pub async fn delete_events_before(
        &self,
        account_id: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_events_before");
        let result =
            sqlx::query("DELETE FROM events WHERE account_id = $1 AND event_time < $2")
                .bind(account_id)
                .bind(cutoff)
                .execute(&self.pool)
                .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
