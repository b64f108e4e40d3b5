//! Credential state shared by Account and User records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Password state carried by a login-capable record: the current encoded
/// password, a bounded history of previously used encoded passwords (most
/// recent first), and an optional temporary plaintext password that is
/// cleared whenever the permanent password changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialState {
    #[serde(skip_serializing, default)]
    pub encoded_password: String,
    #[serde(skip_serializing, default)]
    pub previous_passwords: Vec<String>,
    #[serde(skip_serializing, default)]
    pub temp_password: Option<String>,
    pub password_changed_at: Option<DateTime<Utc>>,
}

impl CredentialState {
    /// Sets the encoded password. When the value actually changes, the
    /// temporary plaintext password is cleared and the change time stamped.
    /// Returns true if the password changed.
    pub fn set_encoded_password(&mut self, encoded: &str, now: DateTime<Utc>) -> bool {
        if self.encoded_password == encoded {
            return false;
        }
        self.encoded_password = encoded.to_string();
        self.temp_password = None;
        self.password_changed_at = Some(now);
        true
    }

    /// Records a previously used encoded password at the head of the history,
    /// keeping at most `keep` entries. A `keep` of zero disables history and
    /// clears anything already retained.
    pub fn push_previous_password(&mut self, encoded: &str, keep: usize) {
        if keep == 0 {
            self.previous_passwords.clear();
            return;
        }
        self.previous_passwords.insert(0, encoded.to_string());
        self.previous_passwords.truncate(keep);
    }

    /// Sets the temporary plaintext password (e.g. for a generated account).
    pub fn set_temp_password(&mut self, plain: &str) {
        self.temp_password = Some(plain.to_string());
    }

    pub fn has_temp_password(&self) -> bool {
        self.temp_password.is_some()
    }
}
