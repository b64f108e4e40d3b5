//! Account entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;

use domain::models::{
    Account, AccountType, AltitudeUnits, CredentialState, CurrencyUnits, DistanceUnits,
    EconomyUnits, GeocoderMode, LatLonFormat, PressureUnits, SpeedUnits, TemperatureUnits,
    VolumeUnits,
};

use super::split_password_history;

/// Database row mapping for the accounts table. Unit preferences are stored
/// as nullable smallint codes; an unknown code resolves to "unset" so the
/// domain defaults take over.
#[derive(Debug, Clone, FromRow)]
pub struct AccountEntity {
    pub account_id: String,
    pub account_type: i16,
    pub description: String,
    pub display_name: String,
    pub notes: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub timezone: String,
    pub private_label_name: String,
    pub is_active: bool,
    pub manager_id: Option<String>,
    pub is_account_manager: bool,
    pub max_devices: Option<i32>,
    pub expiration_at: Option<DateTime<Utc>>,
    pub suspend_until: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub total_ping_count: i32,
    pub max_ping_count: i32,
    pub encoded_password: String,
    pub previous_passwords: String,
    pub temp_password: Option<String>,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub speed_units: Option<i16>,
    pub distance_units: Option<i16>,
    pub volume_units: Option<i16>,
    pub pressure_units: Option<i16>,
    pub economy_units: Option<i16>,
    pub temperature_units: Option<i16>,
    pub altitude_units: Option<i16>,
    pub currency: Option<String>,
    pub latlon_format: Option<i16>,
    pub geocoder_mode: Option<i16>,
    pub smtp_properties: String,
    pub sms_properties: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountEntity> for Account {
    fn from(entity: AccountEntity) -> Self {
        Self {
            account_id: entity.account_id,
            account_type: AccountType::from_code(entity.account_type)
                .unwrap_or(AccountType::Default),
            description: entity.description,
            display_name: entity.display_name,
            notes: entity.notes,
            contact_name: entity.contact_name,
            contact_phone: entity.contact_phone,
            contact_email: entity.contact_email,
            timezone: entity.timezone,
            private_label_name: entity.private_label_name,
            is_active: entity.is_active,
            manager_id: entity.manager_id,
            is_account_manager: entity.is_account_manager,
            max_devices: entity.max_devices.map(|v| v.max(0) as u32),
            expiration_at: entity.expiration_at,
            suspend_until: entity.suspend_until,
            last_login_at: entity.last_login_at,
            total_ping_count: entity.total_ping_count.max(0) as u32,
            max_ping_count: entity.max_ping_count.max(0) as u32,
            credentials: CredentialState {
                encoded_password: entity.encoded_password,
                previous_passwords: split_password_history(&entity.previous_passwords),
                temp_password: entity.temp_password,
                password_changed_at: entity.password_changed_at,
            },
            speed_units: entity.speed_units.and_then(SpeedUnits::from_code),
            distance_units: entity.distance_units.and_then(DistanceUnits::from_code),
            volume_units: entity.volume_units.and_then(VolumeUnits::from_code),
            pressure_units: entity.pressure_units.and_then(PressureUnits::from_code),
            economy_units: entity.economy_units.and_then(EconomyUnits::from_code),
            temperature_units: entity
                .temperature_units
                .and_then(TemperatureUnits::from_code),
            altitude_units: entity.altitude_units.and_then(AltitudeUnits::from_code),
            currency: entity
                .currency
                .as_deref()
                .and_then(|c| CurrencyUnits::from_str(c).ok()),
            latlon_format: entity.latlon_format.and_then(LatLonFormat::from_code),
            geocoder_mode: entity.geocoder_mode.and_then(GeocoderMode::from_code),
            smtp_properties: entity.smtp_properties,
            sms_properties: entity.sms_properties,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entity() -> AccountEntity {
        let at = Utc.timestamp_opt(1000, 0).unwrap();
        AccountEntity {
            account_id: "acme".to_string(),
            account_type: 0,
            description: "Account acme".to_string(),
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
            encoded_password: "enc".to_string(),
            previous_passwords: "old2,old1".to_string(),
            temp_password: None,
            password_changed_at: None,
            speed_units: Some(0),
            distance_units: Some(0),
            volume_units: None,
            pressure_units: None,
            economy_units: None,
            temperature_units: None,
            altitude_units: None,
            currency: Some("usd".to_string()),
            latlon_format: Some(1),
            geocoder_mode: Some(3),
            smtp_properties: String::new(),
            sms_properties: String::new(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_entity_into_domain() {
        let account: Account = entity().into();
        assert_eq!(account.account_id, "acme");
        assert_eq!(account.account_type, AccountType::Default);
        assert_eq!(account.speed_units, Some(SpeedUnits::Mph));
        assert_eq!(account.distance_units, Some(DistanceUnits::Miles));
        assert_eq!(account.currency, Some(CurrencyUnits::Usd));
        assert_eq!(account.latlon_format, Some(LatLonFormat::Dms));
        assert_eq!(account.geocoder_mode, Some(GeocoderMode::Full));
        assert_eq!(
            account.credentials.previous_passwords,
            vec!["old2".to_string(), "old1".to_string()]
        );
    }

    #[test]
    fn test_unknown_codes_resolve_to_unset() {
        let mut e = entity();
        e.account_type = 42;
        e.speed_units = Some(99);
        e.currency = Some("doubloons".to_string());
        let account: Account = e.into();
        assert_eq!(account.account_type, AccountType::Default);
        assert_eq!(account.speed_units, None);
        assert_eq!(account.currency, None);
        // the effective getter then falls back to the chained default
        assert_eq!(account.effective_speed_units(), SpeedUnits::Mph);
    }

    #[test]
    fn test_negative_counters_clamped() {
        let mut e = entity();
        e.total_ping_count = -5;
        e.max_devices = Some(-1);
        let account: Account = e.into();
        assert_eq!(account.total_ping_count, 0);
        assert_eq!(account.max_devices, Some(0));
    }
}
