//! Account repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::Mutex;

use domain::models::{Account, CredentialState};
use domain::services::provisioning::{build_temp_account, TempAccountProfile};

use crate::entities::{join_password_history, AccountEntity};
use crate::metrics::QueryTimer;

const ACCOUNT_COLUMNS: &str = "account_id, account_type, description, display_name, notes, \
     contact_name, contact_phone, contact_email, timezone, private_label_name, is_active, \
     manager_id, is_account_manager, max_devices, expiration_at, suspend_until, last_login_at, \
     total_ping_count, max_ping_count, encoded_password, previous_passwords, temp_password, \
     password_changed_at, speed_units, distance_units, volume_units, pressure_units, \
     economy_units, temperature_units, altitude_units, currency, latlon_format, geocoder_mode, \
     smtp_properties, sms_properties, created_at, updated_at";

/// Repository for account-related database operations.
///
/// Temporary-account allocation holds `temp_lock` across the
/// find-free-id + insert sequence so two tasks cannot claim the same
/// generated ID.
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
    temp_lock: Arc<Mutex<()>>,
}

/// Error from temporary-account allocation.
#[derive(Debug, thiserror::Error)]
pub enum TempAccountError {
    #[error("No free temporary account ID after {0} attempts")]
    Exhausted(usize),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl AccountRepository {
    /// Creates a new AccountRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            temp_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find an account by ID.
    pub async fn find_by_id(&self, account_id: &str) -> Result<Option<AccountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_account_by_id");
        let sql = format!(
            "SELECT {} FROM accounts WHERE account_id = $1",
            ACCOUNT_COLUMNS
        );
        let result = sqlx::query_as::<_, AccountEntity>(&sql)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Check whether an account exists.
    pub async fn exists(&self, account_id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("account_exists");
        let row: Option<(String,)> =
            sqlx::query_as("SELECT account_id FROM accounts WHERE account_id = $1")
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?;
        timer.record();
        Ok(row.is_some())
    }

    /// List all account IDs, ordered.
    pub async fn list_ids(&self) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("list_account_ids");
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT account_id FROM accounts ORDER BY account_id")
                .fetch_all(&self.pool)
                .await?;
        timer.record();
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Find accounts by contact email address.
    pub async fn find_by_contact_email(
        &self,
        email: &str,
    ) -> Result<Vec<AccountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_accounts_by_contact_email");
        let sql = format!(
            "SELECT {} FROM accounts WHERE contact_email = $1 ORDER BY account_id",
            ACCOUNT_COLUMNS
        );
        let result = sqlx::query_as::<_, AccountEntity>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Insert a new account record.
    pub async fn insert(&self, account: &Account) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("insert_account");
        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id, account_type, description, display_name, notes,
                contact_name, contact_phone, contact_email, timezone, private_label_name,
                is_active, manager_id, is_account_manager, max_devices, expiration_at,
                suspend_until, last_login_at, total_ping_count, max_ping_count,
                encoded_password, previous_passwords, temp_password, password_changed_at,
                speed_units, distance_units, volume_units, pressure_units, economy_units,
                temperature_units, altitude_units, currency, latlon_format, geocoder_mode,
                smtp_properties, sms_properties, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32,
                $33, $34, $35, $36, $37
            )
            "#,
        )
        .bind(&account.account_id)
        .bind(account.account_type.code())
        .bind(&account.description)
        .bind(&account.display_name)
        .bind(&account.notes)
        .bind(&account.contact_name)
        .bind(&account.contact_phone)
        .bind(&account.contact_email)
        .bind(&account.timezone)
        .bind(&account.private_label_name)
        .bind(account.is_active)
        .bind(&account.manager_id)
        .bind(account.is_account_manager)
        .bind(account.max_devices.map(|v| v as i32))
        .bind(account.expiration_at)
        .bind(account.suspend_until)
        .bind(account.last_login_at)
        .bind(account.total_ping_count as i32)
        .bind(account.max_ping_count as i32)
        .bind(&account.credentials.encoded_password)
        .bind(join_password_history(&account.credentials.previous_passwords))
        .bind(&account.credentials.temp_password)
        .bind(account.credentials.password_changed_at)
        .bind(account.speed_units.map(|u| u.code()))
        .bind(account.distance_units.map(|u| u.code()))
        .bind(account.volume_units.map(|u| u.code()))
        .bind(account.pressure_units.map(|u| u.code()))
        .bind(account.economy_units.map(|u| u.code()))
        .bind(account.temperature_units.map(|u| u.code()))
        .bind(account.altitude_units.map(|u| u.code()))
        .bind(account.currency.map(|c| c.iso_code()))
        .bind(account.latlon_format.map(|f| f.code()))
        .bind(account.geocoder_mode.map(|m| m.code()))
        .bind(&account.smtp_properties)
        .bind(&account.sms_properties)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// Save an existing account record. Returns false when the account does
    /// not exist.
    pub async fn save(&self, account: &Account) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("save_account");
        let result = sqlx::query(
            r#"
            UPDATE accounts SET
                account_type = $2, description = $3, display_name = $4, notes = $5,
                contact_name = $6, contact_phone = $7, contact_email = $8, timezone = $9,
                private_label_name = $10, is_active = $11, manager_id = $12,
                is_account_manager = $13, max_devices = $14, expiration_at = $15,
                suspend_until = $16, total_ping_count = $17, max_ping_count = $18,
                speed_units = $19, distance_units = $20, volume_units = $21,
                pressure_units = $22, economy_units = $23, temperature_units = $24,
                altitude_units = $25, currency = $26, latlon_format = $27,
                geocoder_mode = $28, smtp_properties = $29, sms_properties = $30,
                updated_at = NOW()
            WHERE account_id = $1
            "#,
        )
        .bind(&account.account_id)
        .bind(account.account_type.code())
        .bind(&account.description)
        .bind(&account.display_name)
        .bind(&account.notes)
        .bind(&account.contact_name)
        .bind(&account.contact_phone)
        .bind(&account.contact_email)
        .bind(&account.timezone)
        .bind(&account.private_label_name)
        .bind(account.is_active)
        .bind(&account.manager_id)
        .bind(account.is_account_manager)
        .bind(account.max_devices.map(|v| v as i32))
        .bind(account.expiration_at)
        .bind(account.suspend_until)
        .bind(account.total_ping_count as i32)
        .bind(account.max_ping_count as i32)
        .bind(account.speed_units.map(|u| u.code()))
        .bind(account.distance_units.map(|u| u.code()))
        .bind(account.volume_units.map(|u| u.code()))
        .bind(account.pressure_units.map(|u| u.code()))
        .bind(account.economy_units.map(|u| u.code()))
        .bind(account.temperature_units.map(|u| u.code()))
        .bind(account.altitude_units.map(|u| u.code()))
        .bind(account.currency.map(|c| c.iso_code()))
        .bind(account.latlon_format.map(|f| f.code()))
        .bind(account.geocoder_mode.map(|m| m.code()))
        .bind(&account.smtp_properties)
        .bind(&account.sms_properties)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Delete an account. Dependent rows cascade via foreign keys.
    pub async fn delete(&self, account_id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_account");
        let result = sqlx::query("DELETE FROM accounts WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Update the credential columns for an account.
    pub async fn update_credentials(
        &self,
        account_id: &str,
        credentials: &CredentialState,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_account_credentials");
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET encoded_password = $2, previous_passwords = $3, temp_password = $4,
                password_changed_at = $5, updated_at = NOW()
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
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
        suspend_until: Option<DateTime<Utc>>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_account_suspend_until");
        let result = sqlx::query(
            "UPDATE accounts SET suspend_until = $2, updated_at = NOW() WHERE account_id = $1",
        )
        .bind(account_id)
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
        at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("record_account_login");
        sqlx::query(
            "UPDATE accounts SET last_login_at = $2, updated_at = NOW() WHERE account_id = $1",
        )
        .bind(account_id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(())
    }

    /// List temporary accounts whose expiration has passed (prune candidates).
    pub async fn list_expired_temporary(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("list_expired_temporary_accounts");
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT account_id FROM accounts
            WHERE account_type = 1 AND expiration_at IS NOT NULL AND expiration_at < $1
            ORDER BY account_id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        timer.record();
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Allocate and insert a temporary account under the allocation lock,
    /// retrying with fresh generated IDs on collision.
    pub async fn create_temporary(
        &self,
        profile: &TempAccountProfile,
        now: DateTime<Utc>,
    ) -> Result<Account, TempAccountError> {
        const MAX_ATTEMPTS: usize = 10;

        let _guard = self.temp_lock.lock().await;
        for _ in 0..MAX_ATTEMPTS {
            let candidate = profile.generate_id();
            if self.exists(&candidate).await? {
                continue;
            }
            let account = build_temp_account(profile, candidate, now);
            self.insert(&account).await?;
            return Ok(account);
        }
        Err(TempAccountError::Exhausted(MAX_ATTEMPTS))
    }
}

#[cfg(test)]
mod tests {
    // Note: AccountRepository tests require a database connection and are
    // covered by integration tests
}
