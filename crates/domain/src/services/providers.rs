//! Optional integration providers: ELog/HOS recording and outbound data
//! push. Implementations register in a `ProviderRegistry` at startup and
//! are looked up by name; a no-op provider backs deployments without the
//! integration.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::models::driver::DutyStatus;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider rejected the request: {0}")]
    Rejected(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

/// Electronic-logging (hours-of-service) integration.
#[async_trait]
pub trait ElogHosProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Enables or disables ELog recording for a driver.
    async fn set_driver_enabled(
        &self,
        account_id: &str,
        driver_id: &str,
        enabled: bool,
    ) -> Result<(), ProviderError>;

    /// Records a duty-status change for a driver.
    async fn record_duty_status(
        &self,
        account_id: &str,
        driver_id: &str,
        status: DutyStatus,
        at: DateTime<Utc>,
    ) -> Result<(), ProviderError>;
}

/// Outbound push of account-level changes to an external system.
#[async_trait]
pub trait DataPushProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Notifies the external system that an account record changed.
    async fn push_account_update(&self, account_id: &str) -> Result<(), ProviderError>;
}

/// No-op ELog provider for deployments without the integration.
pub struct NoopElogHosProvider;

#[async_trait]
impl ElogHosProvider for NoopElogHosProvider {
    fn name(&self) -> &str {
        "noop"
    }

    async fn set_driver_enabled(
        &self,
        account_id: &str,
        driver_id: &str,
        enabled: bool,
    ) -> Result<(), ProviderError> {
        debug!(account_id, driver_id, enabled, "elog provider disabled, ignoring");
        Ok(())
    }

    async fn record_duty_status(
        &self,
        account_id: &str,
        driver_id: &str,
        status: DutyStatus,
        _at: DateTime<Utc>,
    ) -> Result<(), ProviderError> {
        debug!(
            account_id,
            driver_id,
            status = %status,
            "elog provider disabled, ignoring duty status"
        );
        Ok(())
    }
}

/// No-op data-push provider.
pub struct NoopDataPushProvider;

#[async_trait]
impl DataPushProvider for NoopDataPushProvider {
    fn name(&self) -> &str {
        "noop"
    }

    async fn push_account_update(&self, account_id: &str) -> Result<(), ProviderError> {
        debug!(account_id, "data push provider disabled, ignoring");
        Ok(())
    }
}

/// Registry of integration providers, keyed by name and populated once at
/// startup. The no-op providers are registered by default.
pub struct ProviderRegistry {
    elog: HashMap<String, Arc<dyn ElogHosProvider>>,
    push: HashMap<String, Arc<dyn DataPushProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            elog: HashMap::new(),
            push: HashMap::new(),
        };
        registry.register_elog(Arc::new(NoopElogHosProvider));
        registry.register_push(Arc::new(NoopDataPushProvider));
        registry
    }

    pub fn register_elog(&mut self, provider: Arc<dyn ElogHosProvider>) {
        self.elog.insert(provider.name().to_string(), provider);
    }

    pub fn register_push(&mut self, provider: Arc<dyn DataPushProvider>) {
        self.push.insert(provider.name().to_string(), provider);
    }

    pub fn elog(&self, name: &str) -> Option<Arc<dyn ElogHosProvider>> {
        self.elog.get(name).cloned()
    }

    pub fn push(&self, name: &str) -> Option<Arc<dyn DataPushProvider>> {
        self.push.get(name).cloned()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
