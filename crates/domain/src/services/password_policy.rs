//! Password policy: the pluggable handler strategy, the general
//! configuration-driven implementation, and the startup-populated registry.
//!
//! Encoding, validation, and failed-login policy are fully delegated to a
//! `PasswordHandler`, selected per tenant label or falling back to the
//! process default. Entities only carry encoded strings.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordPolicyError {
    #[error("Password not specified")]
    NotSpecified,

    #[error("Blank password not allowed")]
    Blank,

    #[error("Password is too short (minimum {minimum} characters)")]
    TooShort { minimum: usize },

    #[error("Password matches a previously used password")]
    PreviouslyUsed,

    #[error("Failed to encode password: {0}")]
    Encoding(String),
}

/// How passwords are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordEncoding {
    /// Stored as-is. Exists for legacy data migration only.
    Plain,
    /// SHA-256 hex digest.
    Sha256,
    /// Argon2id PHC string.
    Argon2,
}

impl PasswordEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordEncoding::Plain => "plain",
            PasswordEncoding::Sha256 => "sha256",
            PasswordEncoding::Argon2 => "argon2",
        }
    }
}

impl FromStr for PasswordEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(PasswordEncoding::Plain),
            "sha256" => Ok(PasswordEncoding::Sha256),
            "argon2" => Ok(PasswordEncoding::Argon2),
            _ => Err(format!("Invalid password encoding: {}", s)),
        }
    }
}

impl fmt::Display for PasswordEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strategy interface for password encoding and account-lockout policy.
pub trait PasswordHandler: Send + Sync {
    /// Handler name, used for registry lookup and diagnostics.
    fn name(&self) -> &str;

    /// Encodes a plaintext password for storage.
    fn encode_password(&self, plain: &str) -> Result<String, PasswordPolicyError>;

    /// Checks a plaintext password against a stored encoded password.
    fn check_password(&self, plain: &str, encoded: &str) -> bool;

    /// Number of previous passwords a new password must differ from.
    /// Zero disables history checking (and history retention).
    fn required_unique_password_count(&self) -> usize;

    /// Validates a candidate password against the policy and the retained
    /// history of previously used encoded passwords.
    fn validate_new_password(
        &self,
        new_plain: &str,
        previous_encoded: &[String],
    ) -> Result<(), PasswordPolicyError>;

    /// True when the password is older than the policy's maximum age.
    /// A record with no change timestamp never expires.
    fn password_expired(&self, last_changed: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool;

    /// Maximum failed logins tolerated within the attempt window before a
    /// suspension; zero disables lockout.
    fn failed_login_maximum_attempts(&self) -> u32;

    /// Sliding window, in seconds, over which failed logins are counted.
    fn failed_login_attempt_interval_secs(&self) -> i64;

    /// How long a lockout suspension lasts, in seconds; zero disables it.
    fn failed_login_suspend_interval_secs(&self) -> i64;

    /// Given the number of failed logins in the attempt window as of
    /// `as_of`, returns the timestamp the record should stay suspended
    /// until, or `None` when no suspension applies.
    fn suspend_time_after_failures(
        &self,
        failed_attempts: u32,
        as_of: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        if failed_attempts == 0 {
            return None;
        }
        let max_attempts = self.failed_login_maximum_attempts();
        let attempt_interval = self.failed_login_attempt_interval_secs();
        if max_attempts == 0 || attempt_interval <= 0 {
            return None;
        }
        if failed_attempts < max_attempts {
            return None;
        }
        let suspend_interval = self.failed_login_suspend_interval_secs();
        if suspend_interval <= 0 {
            return None;
        }
        Some(as_of + Duration::seconds(suspend_interval))
    }
}

/// Policy knobs for `GeneralPasswordHandler`.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub minimum_length: usize,
    pub required_unique_count: usize,
    /// Zero disables password expiration.
    pub maximum_age_days: u32,
    pub failed_login_maximum_attempts: u32,
    pub failed_login_attempt_interval_secs: i64,
    pub failed_login_suspend_interval_secs: i64,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            minimum_length: 8,
            required_unique_count: 4,
            maximum_age_days: 0,
            failed_login_maximum_attempts: 5,
            failed_login_attempt_interval_secs: 120,
            failed_login_suspend_interval_secs: 180,
        }
    }
}

/// The standard configuration-driven password handler.
pub struct GeneralPasswordHandler {
    name: String,
    encoding: PasswordEncoding,
    policy: PasswordPolicy,
}

impl GeneralPasswordHandler {
    pub fn new(
        name: impl Into<String>,
        encoding: PasswordEncoding,
        policy: PasswordPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            encoding,
            policy,
        }
    }

    pub fn encoding(&self) -> PasswordEncoding {
        self.encoding
    }
}

impl PasswordHandler for GeneralPasswordHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode_password(&self, plain: &str) -> Result<String, PasswordPolicyError> {
        match self.encoding {
            PasswordEncoding::Plain => Ok(plain.to_string()),
            PasswordEncoding::Sha256 => Ok(shared::crypto::sha256_hex(plain)),
            PasswordEncoding::Argon2 => shared::password::hash_password(plain)
                .map_err(|e| PasswordPolicyError::Encoding(e.to_string())),
        }
    }

    fn check_password(&self, plain: &str, encoded: &str) -> bool {
        if encoded.is_empty() {
            return false;
        }
        match self.encoding {
            PasswordEncoding::Plain => plain == encoded,
            PasswordEncoding::Sha256 => shared::crypto::sha256_hex(plain) == encoded,
            PasswordEncoding::Argon2 => {
                shared::password::verify_password(plain, encoded).unwrap_or(false)
            }
        }
    }

    fn required_unique_password_count(&self) -> usize {
        self.policy.required_unique_count
    }

    fn validate_new_password(
        &self,
        new_plain: &str,
        previous_encoded: &[String],
    ) -> Result<(), PasswordPolicyError> {
        if new_plain.is_empty() {
            // an empty password would lock the user out entirely
            return Err(PasswordPolicyError::Blank);
        }
        if new_plain.chars().count() < self.policy.minimum_length {
            return Err(PasswordPolicyError::TooShort {
                minimum: self.policy.minimum_length,
            });
        }
        let unique_count = self.required_unique_password_count();
        if unique_count > 0 {
            for encoded in previous_encoded.iter().take(unique_count) {
                if self.check_password(new_plain, encoded) {
                    return Err(PasswordPolicyError::PreviouslyUsed);
                }
            }
        }
        Ok(())
    }

    fn password_expired(&self, last_changed: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        if self.policy.maximum_age_days == 0 {
            return false;
        }
        match last_changed {
            Some(changed) => now > changed + Duration::days(self.policy.maximum_age_days as i64),
            None => false,
        }
    }

    fn failed_login_maximum_attempts(&self) -> u32 {
        self.policy.failed_login_maximum_attempts
    }

    fn failed_login_attempt_interval_secs(&self) -> i64 {
        self.policy.failed_login_attempt_interval_secs
    }

    fn failed_login_suspend_interval_secs(&self) -> i64 {
        self.policy.failed_login_suspend_interval_secs
    }
}

/// Registry of password handlers keyed by tenant label, populated once at
/// startup and shared read-only afterwards.
pub struct PasswordHandlerRegistry {
    default: Arc<dyn PasswordHandler>,
    by_label: HashMap<String, Arc<dyn PasswordHandler>>,
}

impl PasswordHandlerRegistry {
    pub fn new(default: Arc<dyn PasswordHandler>) -> Self {
        Self {
            default,
            by_label: HashMap::new(),
        }
    }

    /// Registers a handler for a tenant label, replacing any previous one.
    pub fn register(&mut self, label: impl Into<String>, handler: Arc<dyn PasswordHandler>) {
        self.by_label.insert(label.into(), handler);
    }

    /// Resolves the handler for a tenant label, falling back to the default
    /// for an unknown or absent label.
    pub fn resolve(&self, label: Option<&str>) -> Arc<dyn PasswordHandler> {
        label
            .and_then(|l| self.by_label.get(l).cloned())
            .unwrap_or_else(|| self.default.clone())
    }

    pub fn default_handler(&self) -> Arc<dyn PasswordHandler> {
        self.default.clone()
    }
}

/// Returns the suspend-until timestamp to persist after a failed login, or
/// `None` when the policy does not call for one. Only future timestamps are
/// returned; a suspension is never back-dated.
pub fn suspend_time_for_failed_logins(
    handler: &dyn PasswordHandler,
    failed_attempts: u32,
    as_of: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    handler
        .suspend_time_after_failures(failed_attempts, as_of)
        .filter(|suspend_until| *suspend_until > now)
}
