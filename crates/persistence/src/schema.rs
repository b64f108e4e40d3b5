//! Schema-capability detection.
//!
//! Some deployments run without the optional driver ELog/HOS column family.
//! Instead of probing per query, the capabilities are resolved once at
//! startup from `information_schema` and repositories branch on the flags.

use sqlx::PgPool;
use tracing::info;

use crate::metrics::QueryTimer;

/// Optional column families present in the connected schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCapabilities {
    /// `drivers.elog_enabled` / `drivers.elog_state` columns exist.
    pub driver_elog: bool,
}

impl SchemaCapabilities {
    /// Queries `information_schema.columns` for the optional families.
    pub async fn detect(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let timer = QueryTimer::new("detect_schema_capabilities");
        let elog_columns: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) AS count
            FROM information_schema.columns
            WHERE table_name = 'drivers'
              AND column_name IN ('elog_enabled', 'elog_state')
            "#,
        )
        .fetch_one(pool)
        .await?;
        timer.record();

        let capabilities = Self {
            driver_elog: elog_columns.0 == 2,
        };
        info!(driver_elog = capabilities.driver_elog, "schema capabilities resolved");
        Ok(capabilities)
    }
}
