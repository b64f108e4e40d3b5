//! User domain model: the per-account login identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::account::Account;
use crate::models::credentials::CredentialState;
use crate::models::lifecycle;
use crate::models::units::{
    AltitudeUnits, DistanceUnits, EconomyUnits, PressureUnits, SpeedUnits, TemperatureUnits,
    VolumeUnits,
};

/// Reserved user ID of the per-account super-user.
pub const ADMIN_USER_ID: &str = "admin";

/// Maximum access level a user may be granted on any resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    None,
    ReadOnly,
    ReadWrite,
    All,
}

impl AccessLevel {
    pub fn code(&self) -> i16 {
        match self {
            AccessLevel::None => 0,
            AccessLevel::ReadOnly => 1,
            AccessLevel::ReadWrite => 2,
            AccessLevel::All => 3,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(AccessLevel::None),
            1 => Some(AccessLevel::ReadOnly),
            2 => Some(AccessLevel::ReadWrite),
            3 => Some(AccessLevel::All),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "none",
            AccessLevel::ReadOnly => "read_only",
            AccessLevel::ReadWrite => "read_write",
            AccessLevel::All => "all",
        }
    }

    /// True when this level permits at least read access.
    pub fn can_read(&self) -> bool {
        *self >= AccessLevel::ReadOnly
    }

    /// True when this level permits writes.
    pub fn can_write(&self) -> bool {
        *self >= AccessLevel::ReadWrite
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(AccessLevel::None),
            "read_only" | "read" => Ok(AccessLevel::ReadOnly),
            "read_write" | "write" => Ok(AccessLevel::ReadWrite),
            "all" => Ok(AccessLevel::All),
            _ => Err(format!("Invalid access level: {}", s)),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a user's preferred device participates in device authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredDeviceAuth {
    /// The preferred device carries no authorization weight.
    Disabled,
    /// A matching preferred device is authorized in addition to group grants.
    Enabled,
    /// Only the preferred device is authorized; everything else is denied.
    Only,
}

impl PreferredDeviceAuth {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredDeviceAuth::Disabled => "false",
            PreferredDeviceAuth::Enabled => "true",
            PreferredDeviceAuth::Only => "only",
        }
    }
}

impl FromStr for PreferredDeviceAuth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "false" | "disabled" => Ok(PreferredDeviceAuth::Disabled),
            "true" | "enabled" => Ok(PreferredDeviceAuth::Enabled),
            "only" => Ok(PreferredDeviceAuth::Only),
            _ => Err(format!("Invalid preferred-device authorization: {}", s)),
        }
    }
}

impl fmt::Display for PreferredDeviceAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A per-account login identity. Contact, timezone, and unit fields are
/// optional overrides that fall back to the owning account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub account_id: String,
    pub user_id: String,
    pub description: String,
    pub display_name: String,
    pub notes: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    /// IANA timezone name; blank falls back to the account.
    pub timezone: String,
    pub role_id: Option<String>,
    pub max_access_level: AccessLevel,
    pub preferred_device_id: Option<String>,
    pub is_active: bool,
    pub expiration_at: Option<DateTime<Utc>>,
    pub suspend_until: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub credentials: CredentialState,
    pub speed_units: Option<SpeedUnits>,
    pub distance_units: Option<DistanceUnits>,
    pub volume_units: Option<VolumeUnits>,
    pub pressure_units: Option<PressureUnits>,
    pub economy_units: Option<EconomyUnits>,
    pub temperature_units: Option<TemperatureUnits>,
    pub altitude_units: Option<AltitudeUnits>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new in-memory user with default field values.
    pub fn new(
        account_id: impl Into<String>,
        user_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            user_id: user_id.into(),
            description: String::new(),
            display_name: String::new(),
            notes: String::new(),
            contact_name: String::new(),
            contact_phone: String::new(),
            contact_email: String::new(),
            timezone: String::new(),
            role_id: None,
            max_access_level: AccessLevel::All,
            preferred_device_id: None,
            is_active: true,
            expiration_at: None,
            suspend_until: None,
            last_login_at: None,
            credentials: CredentialState::default(),
            speed_units: None,
            distance_units: None,
            volume_units: None,
            pressure_units: None,
            economy_units: None,
            temperature_units: None,
            altitude_units: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True for the reserved per-account super-user.
    pub fn is_admin(&self) -> bool {
        self.user_id == ADMIN_USER_ID
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        lifecycle::is_expired(self.is_active, self.expiration_at, now)
    }

    pub fn will_expire(&self, within_secs: i64, now: DateTime<Utc>) -> bool {
        lifecycle::will_expire(self.expiration_at, within_secs, now)
    }

    pub fn is_suspended(&self, now: DateTime<Utc>) -> bool {
        lifecycle::is_suspended(self.suspend_until, now)
    }

    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
    }

    /// Contact email, falling back to the owning account's.
    pub fn effective_contact_email<'a>(&'a self, account: &'a Account) -> &'a str {
        if self.contact_email.is_empty() {
            &account.contact_email
        } else {
            &self.contact_email
        }
    }

    /// Contact phone, falling back to the owning account's.
    pub fn effective_contact_phone<'a>(&'a self, account: &'a Account) -> &'a str {
        if self.contact_phone.is_empty() {
            &account.contact_phone
        } else {
            &self.contact_phone
        }
    }

    /// Timezone, falling back to the owning account's.
    pub fn effective_timezone<'a>(&'a self, account: &'a Account) -> &'a str {
        if self.timezone.is_empty() {
            &account.timezone
        } else {
            &self.timezone
        }
    }

    pub fn effective_distance_units(&self, account: &Account) -> DistanceUnits {
        self.distance_units
            .unwrap_or_else(|| account.effective_distance_units())
    }

    pub fn effective_speed_units(&self, account: &Account) -> SpeedUnits {
        self.speed_units
            .unwrap_or_else(|| account.effective_speed_units())
    }

    pub fn effective_altitude_units(&self, account: &Account) -> AltitudeUnits {
        self.altitude_units
            .unwrap_or_else(|| account.effective_altitude_units())
    }

    pub fn effective_temperature_units(&self, account: &Account) -> TemperatureUnits {
        self.temperature_units
            .unwrap_or_else(|| account.effective_temperature_units())
    }

    pub fn effective_volume_units(&self, account: &Account) -> VolumeUnits {
        self.volume_units
            .unwrap_or_else(|| account.effective_volume_units())
    }

    pub fn effective_pressure_units(&self, account: &Account) -> PressureUnits {
        self.pressure_units
            .unwrap_or_else(|| account.effective_pressure_units())
    }

    pub fn effective_economy_units(&self, account: &Account) -> EconomyUnits {
        self.economy_units
            .unwrap_or_else(|| account.effective_economy_units())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn user() -> User {
        User::new("acme", "jsmith", at(1000))
    }

    #[test]
    fn test_is_admin() {
        assert!(User::new("acme", ADMIN_USER_ID, at(0)).is_admin());
        assert!(!user().is_admin());
    }

    #[test]
    fn test_lifecycle_matches_account_semantics() {
        let mut u = user();
        assert!(!u.is_expired(at(2000)));
        u.expiration_at = Some(at(1500));
        assert!(u.is_expired(at(2000)));
        assert!(u.will_expire(-1, at(0)));

        u.is_active = false;
        u.expiration_at = None;
        assert!(u.is_expired(at(0)));

        u.suspend_until = Some(at(9000));
        assert!(u.is_suspended(at(2000)));
        assert!(!u.is_suspended(at(9001)));
    }

    #[test]
    fn test_contact_fallback_to_account() {
        let mut account = Account::new("acme", at(0));
        account.contact_email = "ops@acme.example".to_string();
        account.contact_phone = "+1-555-0100".to_string();
        account.timezone = "America/Denver".to_string();

        let mut u = user();
        assert_eq!(u.effective_contact_email(&account), "ops@acme.example");
        assert_eq!(u.effective_contact_phone(&account), "+1-555-0100");
        assert_eq!(u.effective_timezone(&account), "America/Denver");

        u.contact_email = "jsmith@acme.example".to_string();
        u.timezone = "America/Chicago".to_string();
        assert_eq!(u.effective_contact_email(&account), "jsmith@acme.example");
        assert_eq!(u.effective_timezone(&account), "America/Chicago");
    }

    #[test]
    fn test_unit_fallback_to_account_chain() {
        let mut account = Account::new("acme", at(0));
        account.distance_units = Some(DistanceUnits::Miles);

        let mut u = user();
        // unset user preferences follow the account's chained defaults
        assert_eq!(u.effective_speed_units(&account), SpeedUnits::Mph);
        assert_eq!(u.effective_volume_units(&account), VolumeUnits::UsGallons);
        assert_eq!(u.effective_economy_units(&account), EconomyUnits::Mpg);

        // a user override wins over the account
        u.speed_units = Some(SpeedUnits::Knots);
        assert_eq!(u.effective_speed_units(&account), SpeedUnits::Knots);
    }

    #[test]
    fn test_access_level_ordering() {
        assert!(AccessLevel::All > AccessLevel::ReadWrite);
        assert!(AccessLevel::ReadWrite > AccessLevel::ReadOnly);
        assert!(AccessLevel::ReadOnly > AccessLevel::None);
    }

    #[test]
    fn test_access_level_predicates() {
        assert!(!AccessLevel::None.can_read());
        assert!(AccessLevel::ReadOnly.can_read());
        assert!(!AccessLevel::ReadOnly.can_write());
        assert!(AccessLevel::ReadWrite.can_write());
        assert!(AccessLevel::All.can_write());
    }

    #[test]
    fn test_access_level_codes() {
        for level in [
            AccessLevel::None,
            AccessLevel::ReadOnly,
            AccessLevel::ReadWrite,
            AccessLevel::All,
        ] {
            assert_eq!(AccessLevel::from_code(level.code()), Some(level));
        }
        assert_eq!(AccessLevel::from_code(7), None);
    }

    #[test]
    fn test_preferred_device_auth_from_str() {
        assert_eq!(
            PreferredDeviceAuth::from_str("false").unwrap(),
            PreferredDeviceAuth::Disabled
        );
        assert_eq!(
            PreferredDeviceAuth::from_str("TRUE").unwrap(),
            PreferredDeviceAuth::Enabled
        );
        assert_eq!(
            PreferredDeviceAuth::from_str("only").unwrap(),
            PreferredDeviceAuth::Only
        );
        assert!(PreferredDeviceAuth::from_str("maybe").is_err());
    }
}
