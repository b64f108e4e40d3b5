//! Account domain model: the tenant root entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::credentials::CredentialState;
use crate::models::lifecycle;
use crate::models::units::{
    AltitudeUnits, CurrencyUnits, DistanceUnits, EconomyUnits, GeocoderMode, LatLonFormat,
    MassUnits, PressureUnits, SpeedUnits, TemperatureUnits, VolumeUnits,
};

/// Reserved account ID of the system administrator tenant.
pub const SYSTEM_ADMIN_ACCOUNT_ID: &str = "sysadmin";

/// Private-label name matching every tenant label.
pub const ALL_PRIVATE_LABELS: &str = "*";

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Default,
    Temporary,
    Demo,
    System,
}

impl AccountType {
    pub fn code(&self) -> i16 {
        match self {
            AccountType::Default => 0,
            AccountType::Temporary => 1,
            AccountType::Demo => 2,
            AccountType::System => 9,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(AccountType::Default),
            1 => Some(AccountType::Temporary),
            2 => Some(AccountType::Demo),
            9 => Some(AccountType::System),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Default => "default",
            AccountType::Temporary => "temporary",
            AccountType::Demo => "demo",
            AccountType::System => "system",
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(AccountType::Default),
            "temporary" | "temp" => Ok(AccountType::Temporary),
            "demo" => Ok(AccountType::Demo),
            "system" => Ok(AccountType::System),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tenant account. Unit preferences are stored as options; the
/// `effective_*` getters chain the lazy defaults so a caller never sees an
/// "unset" unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub account_type: AccountType,
    pub description: String,
    pub display_name: String,
    pub notes: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    /// IANA timezone name; blank falls back to the tenant label default.
    pub timezone: String,
    pub private_label_name: String,
    pub is_active: bool,
    pub manager_id: Option<String>,
    pub is_account_manager: bool,
    /// Device quota; `None` means unlimited.
    pub max_devices: Option<u32>,
    pub expiration_at: Option<DateTime<Utc>>,
    pub suspend_until: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub total_ping_count: u32,
    /// Ping quota; zero means unlimited.
    pub max_ping_count: u32,
    #[serde(flatten)]
    pub credentials: CredentialState,
    pub speed_units: Option<SpeedUnits>,
    pub distance_units: Option<DistanceUnits>,
    pub volume_units: Option<VolumeUnits>,
    pub pressure_units: Option<PressureUnits>,
    pub economy_units: Option<EconomyUnits>,
    pub temperature_units: Option<TemperatureUnits>,
    pub altitude_units: Option<AltitudeUnits>,
    pub currency: Option<CurrencyUnits>,
    pub latlon_format: Option<LatLonFormat>,
    pub geocoder_mode: Option<GeocoderMode>,
    pub smtp_properties: String,
    pub sms_properties: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new in-memory account with default field values. Nothing is
    /// persisted until the record is saved.
    pub fn new(account_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            account_id: account_id.into(),
            account_type: AccountType::Default,
            description: String::new(),
            display_name: String::new(),
            notes: String::new(),
            contact_name: String::new(),
            contact_phone: String::new(),
            contact_email: String::new(),
            timezone: String::new(),
            private_label_name: String::new(),
            is_active: true,
            manager_id: None,
            is_account_manager: false,
            max_devices: None,
            expiration_at: None,
            suspend_until: None,
            last_login_at: None,
            total_ping_count: 0,
            max_ping_count: 0,
            credentials: CredentialState::default(),
            speed_units: None,
            distance_units: None,
            volume_units: None,
            pressure_units: None,
            economy_units: None,
            temperature_units: None,
            altitude_units: None,
            currency: None,
            latlon_format: None,
            geocoder_mode: None,
            smtp_properties: String::new(),
            sms_properties: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the display form of an account ID: the text after the last
    /// `:` in a `parent:child` compound ID, or the whole ID otherwise.
    pub fn display_id(account_id: &str) -> &str {
        match account_id.rfind(':') {
            Some(idx) => &account_id[idx + 1..],
            None => account_id,
        }
    }

    /// True for the reserved system administrator account.
    pub fn is_system_admin(&self) -> bool {
        self.account_id == SYSTEM_ADMIN_ACCOUNT_ID
    }

    /// True when this account is administered by a separate manager account.
    pub fn is_managed(&self) -> bool {
        !self.is_account_manager
            && self
                .manager_id
                .as_deref()
                .map(|m| !m.trim().is_empty())
                .unwrap_or(false)
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

    /// Records a successful login.
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.last_login_at = Some(now);
    }

    /// Adds to the ping counter, saturating at the integer bound.
    pub fn increment_ping_count(&mut self, count: u32) {
        self.total_ping_count = self.total_ping_count.saturating_add(count);
    }

    /// True when a ping quota exists and has been reached.
    pub fn exceeds_ping_limit(&self) -> bool {
        self.max_ping_count > 0 && self.total_ping_count >= self.max_ping_count
    }

    // Effective unit preferences. Each getter resolves the stored value or
    // walks the default chain, so the result is never "unset".

    pub fn effective_distance_units(&self) -> DistanceUnits {
        self.distance_units.unwrap_or(DistanceUnits::Km)
    }

    pub fn effective_speed_units(&self) -> SpeedUnits {
        self.speed_units
            .unwrap_or_else(|| SpeedUnits::default_for_distance(self.effective_distance_units()))
    }

    pub fn effective_altitude_units(&self) -> AltitudeUnits {
        self.altitude_units.unwrap_or_else(|| {
            AltitudeUnits::default_for_distance(self.effective_distance_units())
        })
    }

    pub fn effective_temperature_units(&self) -> TemperatureUnits {
        self.temperature_units.unwrap_or_else(|| {
            TemperatureUnits::default_for_distance(self.effective_distance_units())
        })
    }

    pub fn effective_volume_units(&self) -> VolumeUnits {
        self.volume_units
            .unwrap_or_else(|| VolumeUnits::default_for_distance(self.effective_distance_units()))
    }

    pub fn effective_pressure_units(&self) -> PressureUnits {
        self.pressure_units
            .unwrap_or_else(|| PressureUnits::default_for_volume(self.effective_volume_units()))
    }

    pub fn effective_economy_units(&self) -> EconomyUnits {
        self.economy_units
            .unwrap_or_else(|| EconomyUnits::default_for_volume(self.effective_volume_units()))
    }

    /// Mass units default off the fuel-volume preference (US gallons imply
    /// pounds), matching the behavior of the deployed fleet installations.
    pub fn effective_mass_units(&self) -> MassUnits {
        MassUnits::default_for_volume(self.effective_volume_units())
    }

    pub fn effective_currency(&self) -> CurrencyUnits {
        self.currency.unwrap_or(CurrencyUnits::Usd)
    }

    pub fn effective_latlon_format(&self) -> LatLonFormat {
        self.latlon_format.unwrap_or(LatLonFormat::Deg)
    }

    pub fn effective_geocoder_mode(&self) -> GeocoderMode {
        self.geocoder_mode.unwrap_or(GeocoderMode::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn account() -> Account {
        Account::new("acme", at(1000))
    }

    #[test]
    fn test_display_id_compound() {
        assert_eq!(Account::display_id("parent:child"), "child");
        assert_eq!(Account::display_id("a:b:c"), "c");
    }

    #[test]
    fn test_display_id_simple() {
        assert_eq!(Account::display_id("solo"), "solo");
        assert_eq!(Account::display_id(""), "");
    }

    #[test]
    fn test_is_system_admin() {
        assert!(Account::new(SYSTEM_ADMIN_ACCOUNT_ID, at(0)).is_system_admin());
        assert!(!account().is_system_admin());
    }

    #[test]
    fn test_is_managed() {
        let mut acct = account();
        assert!(!acct.is_managed());

        acct.manager_id = Some("mgr1".to_string());
        assert!(acct.is_managed());

        // an account manager is never itself managed
        acct.is_account_manager = true;
        assert!(!acct.is_managed());

        acct.is_account_manager = false;
        acct.manager_id = Some("  ".to_string());
        assert!(!acct.is_managed());
    }

    #[test]
    fn test_expiration_lifecycle() {
        let mut acct = account();
        assert!(!acct.is_expired(at(2000)));

        acct.expiration_at = Some(at(1500));
        assert!(acct.is_expired(at(2000)));
        assert!(!acct.is_expired(at(1400)));

        // inactive accounts are expired regardless of expiration time
        acct.expiration_at = None;
        acct.is_active = false;
        assert!(acct.is_expired(at(2000)));
    }

    #[test]
    fn test_will_expire_negative_window() {
        let mut acct = account();
        assert!(!acct.will_expire(-1, at(2000)));

        acct.expiration_at = Some(at(1_000_000));
        assert!(acct.will_expire(-1, at(2000)));
        assert!(!acct.will_expire(60, at(2000)));
    }

    #[test]
    fn test_suspension() {
        let mut acct = account();
        assert!(!acct.is_suspended(at(2000)));
        acct.suspend_until = Some(at(3000));
        assert!(acct.is_suspended(at(2000)));
        assert!(!acct.is_suspended(at(3001)));
    }

    #[test]
    fn test_ping_accounting() {
        let mut acct = account();
        assert!(!acct.exceeds_ping_limit()); // zero max means unlimited

        acct.max_ping_count = 3;
        acct.increment_ping_count(2);
        assert!(!acct.exceeds_ping_limit());
        acct.increment_ping_count(1);
        assert!(acct.exceeds_ping_limit());
    }

    #[test]
    fn test_ping_count_saturates() {
        let mut acct = account();
        acct.total_ping_count = u32::MAX - 1;
        acct.increment_ping_count(10);
        assert_eq!(acct.total_ping_count, u32::MAX);
    }

    #[test]
    fn test_record_login() {
        let mut acct = account();
        assert_eq!(acct.last_login_at, None);
        acct.record_login(at(5000));
        assert_eq!(acct.last_login_at, Some(at(5000)));
    }

    #[test]
    fn test_effective_units_metric_defaults() {
        let acct = account();
        assert_eq!(acct.effective_distance_units(), DistanceUnits::Km);
        assert_eq!(acct.effective_speed_units(), SpeedUnits::Kph);
        assert_eq!(acct.effective_altitude_units(), AltitudeUnits::Meters);
        assert_eq!(acct.effective_temperature_units(), TemperatureUnits::C);
        assert_eq!(acct.effective_volume_units(), VolumeUnits::Liters);
        assert_eq!(acct.effective_pressure_units(), PressureUnits::Kpa);
        assert_eq!(acct.effective_economy_units(), EconomyUnits::Kpl);
        assert_eq!(acct.effective_mass_units(), MassUnits::Kg);
    }

    #[test]
    fn test_effective_units_chain_from_miles() {
        let mut acct = account();
        acct.distance_units = Some(DistanceUnits::Miles);
        assert_eq!(acct.effective_speed_units(), SpeedUnits::Mph);
        assert_eq!(acct.effective_altitude_units(), AltitudeUnits::Feet);
        assert_eq!(acct.effective_temperature_units(), TemperatureUnits::F);
        assert_eq!(acct.effective_volume_units(), VolumeUnits::UsGallons);
        assert_eq!(acct.effective_pressure_units(), PressureUnits::Psi);
        assert_eq!(acct.effective_economy_units(), EconomyUnits::Mpg);
        assert_eq!(acct.effective_mass_units(), MassUnits::Lb);
    }

    #[test]
    fn test_effective_units_stored_value_wins_over_chain() {
        let mut acct = account();
        acct.distance_units = Some(DistanceUnits::Miles);
        acct.volume_units = Some(VolumeUnits::Liters);
        // miles would imply US gallons, but the stored liters preference wins
        assert_eq!(acct.effective_volume_units(), VolumeUnits::Liters);
        // and the volume-chained defaults follow the stored value
        assert_eq!(acct.effective_pressure_units(), PressureUnits::Kpa);
        assert_eq!(acct.effective_economy_units(), EconomyUnits::Kpl);
        assert_eq!(acct.effective_mass_units(), MassUnits::Kg);
    }

    #[test]
    fn test_effective_display_preferences() {
        let acct = account();
        assert_eq!(acct.effective_currency(), CurrencyUnits::Usd);
        assert_eq!(acct.effective_latlon_format(), LatLonFormat::Deg);
        assert_eq!(acct.effective_geocoder_mode(), GeocoderMode::Full);
    }

    #[test]
    fn test_account_type_codes() {
        for ty in [
            AccountType::Default,
            AccountType::Temporary,
            AccountType::Demo,
            AccountType::System,
        ] {
            assert_eq!(AccountType::from_code(ty.code()), Some(ty));
        }
        assert_eq!(AccountType::from_code(42), None);
    }

    #[test]
    fn test_account_type_from_str() {
        assert_eq!(
            AccountType::from_str("temp").unwrap(),
            AccountType::Temporary
        );
        assert_eq!(AccountType::from_str("SYSTEM").unwrap(), AccountType::System);
        assert!(AccountType::from_str("other").is_err());
    }
}
