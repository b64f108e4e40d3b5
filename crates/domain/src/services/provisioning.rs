//! Provisioning rules for new accounts, users, and drivers.
//!
//! Builds fully defaulted in-memory records from raw input. Nothing here
//! persists anything; repositories save the returned records.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::models::account::{Account, AccountType, ALL_PRIVATE_LABELS};
use crate::models::driver::Driver;
use crate::models::user::User;
use shared::validation::filter_id;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProvisioningError {
    #[error("Invalid identifier: {0:?}")]
    InvalidId(String),
}

/// Defaults applied when allocating temporary accounts.
#[derive(Debug, Clone)]
pub struct TempAccountProfile {
    /// Prefix of generated temporary account IDs.
    pub id_prefix: String,
    /// Number of random digits appended to the prefix.
    pub id_digits: usize,
    /// Length of the generated temporary password.
    pub password_length: usize,
    /// Days until a temporary account expires.
    pub expire_days: i64,
}

impl Default for TempAccountProfile {
    fn default() -> Self {
        Self {
            id_prefix: "temp".to_string(),
            id_digits: 6,
            password_length: 8,
            expire_days: 14,
        }
    }
}

impl TempAccountProfile {
    /// Generates a candidate temporary account ID. Uniqueness is the
    /// caller's concern (checked against the store before insert).
    pub fn generate_id(&self) -> String {
        format!(
            "{}{}",
            self.id_prefix,
            shared::crypto::generate_digits(self.id_digits)
        )
    }

    pub fn generate_password(&self) -> String {
        shared::crypto::generate_password(self.password_length)
    }

    pub fn expiration(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(self.expire_days)
    }
}

/// Builds a new account record from a raw ID. The system administrator
/// account gets the account-manager flag and the match-all private label;
/// every other account gets a generated description naming the account.
pub fn build_account(raw_id: &str, now: DateTime<Utc>) -> Result<Account, ProvisioningError> {
    let account_id =
        filter_id(raw_id).ok_or_else(|| ProvisioningError::InvalidId(raw_id.to_string()))?;
    let mut account = Account::new(account_id, now);

    if account.is_system_admin() {
        account.account_type = AccountType::System;
        account.description = "System Administrator".to_string();
        account.private_label_name = ALL_PRIVATE_LABELS.to_string();
        account.is_account_manager = true;
    } else {
        account.description = format!("Account {}", account.account_id);
        account.is_account_manager = false;
    }

    Ok(account)
}

/// Builds a temporary account: generated ID, generated plaintext password
/// recorded as the temp password, and a bounded lifetime.
pub fn build_temp_account(
    profile: &TempAccountProfile,
    account_id: String,
    now: DateTime<Utc>,
) -> Account {
    let mut account = Account::new(account_id, now);
    account.account_type = AccountType::Temporary;
    account.description = format!("Temporary Account {}", account.account_id);
    account.expiration_at = Some(profile.expiration(now));
    account
        .credentials
        .set_temp_password(&profile.generate_password());
    account
}

/// Builds a new user record under an account.
pub fn build_user(
    account_id: &str,
    raw_user_id: &str,
    now: DateTime<Utc>,
) -> Result<User, ProvisioningError> {
    let user_id =
        filter_id(raw_user_id).ok_or_else(|| ProvisioningError::InvalidId(raw_user_id.to_string()))?;
    let mut user = User::new(account_id, user_id, now);

    if user.is_admin() {
        user.description = "Account Administrator".to_string();
    } else {
        user.description = format!("User {}", user.user_id);
    }

    Ok(user)
}

/// Builds a new driver record under an account.
pub fn build_driver(
    account_id: &str,
    raw_driver_id: &str,
    now: DateTime<Utc>,
) -> Result<Driver, ProvisioningError> {
    let driver_id = filter_id(raw_driver_id)
        .ok_or_else(|| ProvisioningError::InvalidId(raw_driver_id.to_string()))?;
    let mut driver = Driver::new(account_id, driver_id, now);
    driver.description = format!("Driver {}", driver.driver_id);
    Ok(driver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::SYSTEM_ADMIN_ACCOUNT_ID;
    use crate::models::user::ADMIN_USER_ID;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_build_account_normalizes_id() {
        let account = build_account(" Acme Fleet! ", at(0)).unwrap();
        assert_eq!(account.account_id, "acmefleet");
    }

    #[test]
    fn test_build_account_rejects_blank_id() {
        assert_eq!(
            build_account("  ", at(0)),
            Err(ProvisioningError::InvalidId("  ".to_string()))
        );
        assert!(build_account("!!!", at(0)).is_err());
    }

    #[test]
    fn test_build_regular_account_defaults() {
        let account = build_account("acme", at(0)).unwrap();
        assert_eq!(account.account_type, AccountType::Default);
        assert!(!account.is_account_manager);
        assert!(account.description.contains("acme"));
        assert!(account.is_active);
        assert!(account.expiration_at.is_none());
    }

    #[test]
    fn test_build_system_admin_account() {
        let account = build_account(SYSTEM_ADMIN_ACCOUNT_ID, at(0)).unwrap();
        assert_eq!(account.account_type, AccountType::System);
        assert_eq!(account.private_label_name, ALL_PRIVATE_LABELS);
        assert!(account.is_account_manager);
        assert_eq!(account.description, "System Administrator");
    }

    #[test]
    fn test_build_temp_account() {
        let profile = TempAccountProfile::default();
        let id = profile.generate_id();
        assert!(id.starts_with("temp"));
        assert_eq!(id.len(), "temp".len() + 6);

        let account = build_temp_account(&profile, id.clone(), at(0));
        assert_eq!(account.account_id, id);
        assert_eq!(account.account_type, AccountType::Temporary);
        assert_eq!(account.expiration_at, Some(at(0) + Duration::days(14)));
        assert!(account.credentials.has_temp_password());
        assert_eq!(
            account.credentials.temp_password.as_ref().unwrap().len(),
            profile.password_length
        );
    }

    #[test]
    fn test_build_user_defaults() {
        let user = build_user("acme", "JSmith", at(0)).unwrap();
        assert_eq!(user.user_id, "jsmith");
        assert_eq!(user.account_id, "acme");
        assert!(user.description.contains("jsmith"));
    }

    #[test]
    fn test_build_admin_user_description() {
        let user = build_user("acme", ADMIN_USER_ID, at(0)).unwrap();
        assert_eq!(user.description, "Account Administrator");
    }

    #[test]
    fn test_build_user_rejects_blank_id() {
        assert!(build_user("acme", "", at(0)).is_err());
    }

    #[test]
    fn test_build_driver_defaults() {
        let driver = build_driver("acme", "D-100", at(0)).unwrap();
        assert_eq!(driver.driver_id, "d-100");
        assert!(driver.description.contains("d-100"));
    }

    #[test]
    fn test_build_driver_rejects_blank_id() {
        assert!(build_driver("acme", "###", at(0)).is_err());
    }
}
