//! Narrow repository over the `devices` table, owned by the device
//! provisioning subsystem. Only the count/list queries used for quota
//! checks and account reports live here.

use sqlx::PgPool;

use crate::metrics::QueryTimer;

/// Repository for device lookups.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count devices belonging to an account.
    pub async fn count_for_account(&self, account_id: &str) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_devices_for_account");
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) AS count FROM devices WHERE account_id = $1")
                .bind(account_id)
                .fetch_one(&self.pool)
                .await?;
        timer.record();
        Ok(count.0)
    }

    /// List device IDs belonging to an account, ordered.
    pub async fn list_ids_for_account(
        &self,
        account_id: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("list_device_ids_for_account");
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT device_id FROM devices WHERE account_id = $1 ORDER BY device_id",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
