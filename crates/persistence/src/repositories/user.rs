//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use domain::models::{CredentialState, User};

use crate::entities::{join_password_history, UserEntity};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str = "account_id, user_id, description, display_name, notes, contact_name, \
     contact_phone, contact_email, timezone, role_id, max_access_level, preferred_device_id, \
     is_active, expiration_at, suspend_until, last_login_at, encoded_password, \
     previous_passwords, temp_password, password_changed_at, speed_units, distance_units, \
     volume_units, pressure_units, economy_units, temperature_units, altitude_units, \
     created_at, updated_at";

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by account and user ID.
    pub async fn find_by_id(
        &self,
        account_id: &str,
        user_id: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let sql = format!(
            "SELECT {} FROM users WHERE account_id = $1 AND user_id = $2",
            USER_COLUMNS
        );
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(account_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Check whether a user exists.
    pub async fn exists(&self, account_id: &str, user_id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("user_exists");
        let row: Option<(String,)> =
            sqlx::query_as("SELECT user_id FROM users WHERE account_id = $1 AND user_id = $2")
                .bind(account_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        timer.record();
        Ok(row.is_some())
    }

    /// List users belonging to an account.
    pub async fn list_for_account(&self, account_id: &str) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_users_for_account");
        let sql = format!(
            "SELECT {} FROM users WHERE account_id = $1 ORDER BY user_id",
            USER_COLUMNS
        );
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find users by contact email across all accounts.
    pub async fn find_by_contact_email(&self, email: &str) -> Result<Vec<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_users_by_contact_email");
        let sql = format!(
            "SELECT {} FROM users WHERE contact_email = $1 ORDER BY account_id, user_id",
            USER_COLUMNS
        );
        let result = sqlx::query_as::<_, UserEntity>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Insert a new user record.
    pub async fn insert(&self, user: &User) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("insert_user");
        sqlx::query(
            r#"
            INSERT INTO users (
                account_id, user_id, description, display_name, notes, contact_name,
                contact_phone, contact_email, timezone, role_id, max_access_level,
                preferred_device_id, is_active, expiration_at, suspend_until, last_login_at,
                encoded_password, previous_passwords, temp_password, password_changed_at,
                speed_units, distance_units, volume_units, pressure_units, economy_units,
                temperature_units, altitude_units, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29
            )
            "#,
        )
        .bind(&user.account_id)
        .bind(&user.user_id)
        .bind(&user.description)
        .bind(&user.display_name)
        .bind(&user.notes)
        .bind(&user.contact_name)
        .bind(&user.contact_phone)
        .bind(&user.contact_email)
        .bind(&user.timezone)
        .bind(&user.role_id)
        .bind(user.max_access_level.code())
        .bind(&user.preferred_device_id)
        .bind(user.is_active)
        .bind(user.expiration_at)
        .bind(user.suspend_until)
        .bind(user.last_login_at)
        .bind(&user.credentials.encoded_password)
        .bind(join_password_history(&user.credentials.previous_passwords))
        .bind(&user.credentials.temp_password)
        .bind(user.credentials.password_changed_at)
        .bind(user.speed_units.map(|u| u.code()))
        .bind(user.distance_units.map(|u| u.code()))
        .bind(user.volume_units.map(|u| u.code()))
        .bind(user.pressure_units.map(|u| u.code()))
        .bind(user.economy_units.map(|u| u.code()))
        .bind(user.temperature_units.map(|u| u.code()))
        .bind(user.altitude_units.map(|u| u.code()))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Save an existing user record. Returns false when the user does not
    /// exist.
    pub async fn save(&self, user: &User) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("save_user");
        let result = sqlx::query(
            r#"
            UPDATE users SET
                description = $3, display_name = $4, notes = $5, contact_name = $6,
                contact_phone = $7, contact_email = $8, timezone = $9, role_id = $10,
                max_access_level = $11, preferred_device_id = $12, is_active = $13,
                expiration_at = $14, suspend_until = $15, speed_units = $16,
                distance_units = $17, volume_units = $18, pressure_units = $19,
                economy_units = $20, temperature_units = $21, altitude_units = $22,
                updated_at = NOW()
            WHERE account_id = $1 AND user_id = $2
            "#,
        )
        .bind(&user.account_id)
        .bind(&user.user_id)
        .bind(&user.description)
        .bind(&user.display_name)
        .bind(&user.notes)
        .bind(&user.contact_name)
        .bind(&user.contact_phone)
        .bind(&user.contact_email)
        .bind(&user.timezone)
        .bind(&user.role_id)
        .bind(user.max_access_level.code())
        .bind(&user.preferred_device_id)
        .bind(user.is_active)
        .bind(user.expiration_at)
        .bind(user.suspend_until)
        .bind(user.speed_units.map(|u| u.code()))
        .bind(user.distance_units.map(|u| u.code()))
        .bind(user.volume_units.map(|u| u.code()))
        .bind(user.pressure_units.map(|u| u.code()))
        .bind(user.economy_units.map(|u| u.code()))
        .bind(user.temperature_units.map(|u| u.code()))
        .bind(user.altitude_units.map(|u| u.code()))
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user. Device-group assignments cascade via foreign keys.
    pub async fn delete(&self, account_id: &str, user_id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_user");
        let result = sqlx::query("DELETE FROM users WHERE account_id = $1 AND user_id = $2")
            .bind(account_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Update the credential columns for a user.
    pub async fn update_credentials(
        &self,
        account_id: &str,
        user_id: &str,
        credentials: &CredentialState,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_user_credentials");
        let result = sqlx::query(
            r#"
            UPDATE users
            SET encoded_password = $3, previous_passwords = $4, temp_password = $5,
                password_changed_at = $6, updated_at = NOW()
            WHERE account_id = $1 AND user_id = $2
            "#,
        )
        .bind(account_id)
        .bind(user_id)
        .bind(&credentials.encoded_password)
        .bind(join_password_history(&credentials.previous_passwords))
        .bind(&credentials.temp_password)
        .bind(credentials.password_changed_at)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Persist a suspend-until timestamp (or clear it).
    pub async fn update_suspend_until(
        &self,
        account_id: &str,
        user_id: &str,
        suspend_until: Option<DateTime<Utc>>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_user_suspend_until");
        let result = sqlx::query(
            r#"
            UPDATE users SET suspend_until = $3, updated_at = NOW()
            WHERE account_id = $1 AND user_id = $2
            "#,
        )
        .bind(account_id)
        .bind(user_id)
        .bind(suspend_until)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Record a successful login.
    pub async fn record_login(
        &self,
        account_id: &str,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("record_user_login");
        sqlx::query(
            r#"
            UPDATE users SET last_login_at = $3, updated_at = NOW()
            WHERE account_id = $1 AND user_id = $2
            "#,
        )
        .bind(account_id)
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Note: UserRepository tests require a database connection and are
    // covered by integration tests
}
