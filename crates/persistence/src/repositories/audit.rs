//! Audit repository: login outcome records consumed by the failed-login
//! suspension policy.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::metrics::QueryTimer;

const EVENT_LOGIN_OK: &str = "login_ok";
const EVENT_LOGIN_FAILED: &str = "login_failed";

/// Repository for audit events.
#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    /// Creates a new AuditRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a successful login.
    pub async fn record_login_ok(
        &self,
        account_id: &str,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        self.record(account_id, user_id, EVENT_LOGIN_OK, at).await
    }

    /// Record a failed login attempt.
    pub async fn record_login_failed(
        &self,
        account_id: &str,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        self.record(account_id, user_id, EVENT_LOGIN_FAILED, at).await
    }

    /// Count failed login attempts for a user since the window start.
    pub async fn count_failed_logins_since(
        &self,
        account_id: &str,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, sqlx::Error> {
        let timer = QueryTimer::new("count_failed_logins");
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) AS count FROM audit_events
            WHERE account_id = $1 AND user_id = $2 AND event_type = $3 AND created_at >= $4
            "#,
        )
        .bind(account_id)
        .bind(user_id)
        .bind(EVENT_LOGIN_FAILED)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(count.0.max(0) as u32)
    }

    async fn record(
        &self,
        account_id: &str,
        user_id: &str,
        event_type: &str,
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("record_audit_event");
        sqlx::query(
            r#"
            INSERT INTO audit_events (account_id, user_id, event_type, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(account_id)
        .bind(user_id)
        .bind(event_type)
        .bind(at)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Note: AuditRepository tests require a database connection and are
    // covered by integration tests
}
