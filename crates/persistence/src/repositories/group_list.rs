//! Device-group assignment repository.
//!
//! `user_device_groups` joins users to the device groups they are
//! authorized for; `device_group_devices` (owned by the device subsystem)
//! is consulted read-only for membership tests.

use sqlx::PgPool;
use std::collections::HashSet;

use crate::metrics::QueryTimer;

/// Repository for user device-group assignments.
#[derive(Clone)]
pub struct GroupListRepository {
    pool: PgPool,
}

impl GroupListRepository {
    /// Creates a new GroupListRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the device groups assigned to a user, ordered.
    pub async fn assigned_groups(
        &self,
        account_id: &str,
        user_id: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("list_user_device_groups");
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT group_id FROM user_device_groups
            WHERE account_id = $1 AND user_id = $2
            ORDER BY group_id
            "#,
        )
        .bind(account_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Replace a user's device-group assignments with the given list.
    pub async fn replace_assignments(
        &self,
        account_id: &str,
        user_id: &str,
        group_ids: &[String],
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("replace_user_device_groups");
        sqlx::query("DELETE FROM user_device_groups WHERE account_id = $1 AND user_id = $2")
            .bind(account_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        for group_id in group_ids {
            sqlx::query(
                r#"
                INSERT INTO user_device_groups (account_id, user_id, group_id)
                VALUES ($1, $2, $3)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(account_id)
            .bind(user_id)
            .bind(group_id)
            .execute(&self.pool)
            .await?;
        }
        timer.record();
        Ok(())
    }

    /// Of the given groups, which ones contain the device.
    pub async fn groups_containing_device(
        &self,
        account_id: &str,
        group_ids: &[String],
        device_id: &str,
    ) -> Result<HashSet<String>, sqlx::Error> {
        if group_ids.is_empty() {
            return Ok(HashSet::new());
        }
        let timer = QueryTimer::new("groups_containing_device");
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT group_id FROM device_group_devices
            WHERE account_id = $1 AND device_id = $2 AND group_id = ANY($3)
            "#,
        )
        .bind(account_id)
        .bind(device_id)
        .bind(group_ids)
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

#[cfg(test)]
mod tests {
    // Note: GroupListRepository tests require a database connection and are
    // covered by integration tests
}
