//! Driver repository for database operations.
//!
//! The ELog columns are an optional column family; queries include them
//! only when the resolved `SchemaCapabilities` say they exist.

use sqlx::PgPool;

use domain::models::{Driver, DutyStatus, ElogState};

use crate::entities::DriverEntity;
use crate::metrics::QueryTimer;
use crate::schema::SchemaCapabilities;

const DRIVER_COLUMNS: &str = "account_id, driver_id, description, display_name, notes, \
     contact_phone, contact_email, license_type, license_number, license_expire_day, \
     birthdate_day, badge_id, card_id, address, device_id, duty_status, created_at, updated_at";

const DRIVER_ELOG_COLUMNS: &str = ", elog_enabled, elog_state";

/// Repository for driver-related database operations.
#[derive(Clone)]
pub struct DriverRepository {
    pool: PgPool,
    capabilities: SchemaCapabilities,
}

impl DriverRepository {
    /// Creates a new DriverRepository with the given connection pool and
    /// resolved schema capabilities.
    pub fn new(pool: PgPool, capabilities: SchemaCapabilities) -> Self {
        Self { pool, capabilities }
    }

    pub fn capabilities(&self) -> SchemaCapabilities {
        self.capabilities
    }

    fn select_columns(&self) -> String {
        if self.capabilities.driver_elog {
            format!("{}{}", DRIVER_COLUMNS, DRIVER_ELOG_COLUMNS)
        } else {
            DRIVER_COLUMNS.to_string()
        }
    }

    /// Find a driver by account and driver ID.
    pub async fn find_by_id(
        &self,
        account_id: &str,
        driver_id: &str,
    ) -> Result<Option<DriverEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_driver_by_id");
        let sql = format!(
            "SELECT {} FROM drivers WHERE account_id = $1 AND driver_id = $2",
            self.select_columns()
        );
        let result = sqlx::query_as::<_, DriverEntity>(&sql)
            .bind(account_id)
            .bind(driver_id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Check whether a driver exists.
    pub async fn exists(&self, account_id: &str, driver_id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("driver_exists");
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT driver_id FROM drivers WHERE account_id = $1 AND driver_id = $2",
        )
        .bind(account_id)
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?;
        timer.record();
        Ok(row.is_some())
    }

    /// List drivers belonging to an account.
    pub async fn list_for_account(
        &self,
        account_id: &str,
    ) -> Result<Vec<DriverEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_drivers_for_account");
        let sql = format!(
            "SELECT {} FROM drivers WHERE account_id = $1 ORDER BY driver_id",
            self.select_columns()
        );
        let result = sqlx::query_as::<_, DriverEntity>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Insert a new driver record.
    pub async fn insert(&self, driver: &Driver) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("insert_driver");
        if self.capabilities.driver_elog {
            sqlx::query(
                r#"
                INSERT INTO drivers (
                    account_id, driver_id, description, display_name, notes, contact_phone,
                    contact_email, license_type, license_number, license_expire_day,
                    birthdate_day, badge_id, card_id, address, device_id, duty_status,
                    elog_enabled, elog_state, created_at, updated_at
                ) VALUES (
                    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20
                )
                "#,
            )
            .bind(&driver.account_id)
            .bind(&driver.driver_id)
            .bind(&driver.description)
            .bind(&driver.display_name)
            .bind(&driver.notes)
            .bind(&driver.contact_phone)
            .bind(&driver.contact_email)
            .bind(&driver.license_type)
            .bind(&driver.license_number)
            .bind(driver.license_expire_day)
            .bind(driver.birthdate_day)
            .bind(&driver.badge_id)
            .bind(&driver.card_id)
            .bind(&driver.address)
            .bind(&driver.device_id)
            .bind(driver.duty_status.code())
            .bind(driver.elog_enabled)
            .bind(driver.elog_state.map(|s| s.encode()))
            .bind(driver.created_at)
            .bind(driver.updated_at)
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO drivers (
                    account_id, driver_id, description, display_name, notes, contact_phone,
                    contact_email, license_type, license_number, license_expire_day,
                    birthdate_day, badge_id, card_id, address, device_id, duty_status,
                    created_at, updated_at
                ) VALUES (
                    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18
                )
                "#,
            )
            .bind(&driver.account_id)
            .bind(&driver.driver_id)
            .bind(&driver.description)
            .bind(&driver.display_name)
            .bind(&driver.notes)
            .bind(&driver.contact_phone)
            .bind(&driver.contact_email)
            .bind(&driver.license_type)
            .bind(&driver.license_number)
            .bind(driver.license_expire_day)
            .bind(driver.birthdate_day)
            .bind(&driver.badge_id)
            .bind(&driver.card_id)
            .bind(&driver.address)
            .bind(&driver.device_id)
            .bind(driver.duty_status.code())
            .bind(driver.created_at)
            .bind(driver.updated_at)
            .execute(&self.pool)
            .await?;
        }
        timer.record();
        Ok(())
    }

    /// Save an existing driver record. Returns false when the driver does
    /// not exist.
    pub async fn save(&self, driver: &Driver) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("save_driver");
        let result = sqlx::query(
            r#"
            UPDATE drivers SET
                description = $3, display_name = $4, notes = $5, contact_phone = $6,
                contact_email = $7, license_type = $8, license_number = $9,
                license_expire_day = $10, birthdate_day = $11, badge_id = $12,
                card_id = $13, address = $14, device_id = $15, duty_status = $16,
                updated_at = NOW()
            WHERE account_id = $1 AND driver_id = $2
            "#,
        )
        .bind(&driver.account_id)
        .bind(&driver.driver_id)
        .bind(&driver.description)
        .bind(&driver.display_name)
        .bind(&driver.notes)
        .bind(&driver.contact_phone)
        .bind(&driver.contact_email)
        .bind(&driver.license_type)
        .bind(&driver.license_number)
        .bind(driver.license_expire_day)
        .bind(driver.birthdate_day)
        .bind(&driver.badge_id)
        .bind(&driver.card_id)
        .bind(&driver.address)
        .bind(&driver.device_id)
        .bind(driver.duty_status.code())
        .execute(&self.pool)
        .await?;
        timer.record();

        if result.rows_affected() == 0 {
            return Ok(false);
        }
        if self.capabilities.driver_elog {
            self.update_elog(driver).await?;
        }
        Ok(true)
    }

    /// Delete a driver.
    pub async fn delete(&self, account_id: &str, driver_id: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_driver");
        let result = sqlx::query("DELETE FROM drivers WHERE account_id = $1 AND driver_id = $2")
            .bind(account_id)
            .bind(driver_id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Update just the duty status.
    pub async fn update_duty_status(
        &self,
        account_id: &str,
        driver_id: &str,
        status: DutyStatus,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_driver_duty_status");
        let result = sqlx::query(
            r#"
            UPDATE drivers SET duty_status = $3, updated_at = NOW()
            WHERE account_id = $1 AND driver_id = $2
            "#,
        )
        .bind(account_id)
        .bind(driver_id)
        .bind(status.code())
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Update the ELog columns. Only valid when the column family exists.
    pub async fn update_elog_state(
        &self,
        account_id: &str,
        driver_id: &str,
        enabled: bool,
        state: Option<ElogState>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("update_driver_elog_state");
        let result = sqlx::query(
            r#"
            UPDATE drivers SET elog_enabled = $3, elog_state = $4, updated_at = NOW()
            WHERE account_id = $1 AND driver_id = $2
            "#,
        )
        .bind(account_id)
        .bind(driver_id)
        .bind(enabled)
        .bind(state.map(|s| s.encode()))
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    async fn update_elog(&self, driver: &Driver) -> Result<(), sqlx::Error> {
        self.update_elog_state(
            &driver.account_id,
            &driver.driver_id,
            driver.elog_enabled,
            driver.elog_state,
        )
        .await?;
        Ok(())
    }
}
