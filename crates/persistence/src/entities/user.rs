//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{
    AccessLevel, AltitudeUnits, CredentialState, DistanceUnits, EconomyUnits, PressureUnits,
    SpeedUnits, TemperatureUnits, User, VolumeUnits,
};

use super::split_password_history;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub account_id: String,
    pub user_id: String,
    pub description: String,
    pub display_name: String,
    pub notes: String,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub timezone: String,
    pub role_id: Option<String>,
    pub max_access_level: i16,
    pub preferred_device_id: Option<String>,
    pub is_active: bool,
    pub expiration_at: Option<DateTime<Utc>>,
    pub suspend_until: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            account_id: entity.account_id,
            user_id: entity.user_id,
            description: entity.description,
            display_name: entity.display_name,
            notes: entity.notes,
            contact_name: entity.contact_name,
            contact_phone: entity.contact_phone,
            contact_email: entity.contact_email,
            timezone: entity.timezone,
            role_id: entity.role_id,
            max_access_level: AccessLevel::from_code(entity.max_access_level)
                .unwrap_or(AccessLevel::None),
            preferred_device_id: entity.preferred_device_id,
            is_active: entity.is_active,
            expiration_at: entity.expiration_at,
            suspend_until: entity.suspend_until,
            last_login_at: entity.last_login_at,
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
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entity() -> UserEntity {
        let at = Utc.timestamp_opt(1000, 0).unwrap();
        UserEntity {
            account_id: "acme".to_string(),
            user_id: "jsmith".to_string(),
            description: "User jsmith".to_string(),
            display_name: String::new(),
            notes: String::new(),
            contact_name: String::new(),
            contact_phone: String::new(),
            contact_email: String::new(),
            timezone: String::new(),
            role_id: None,
            max_access_level: 2,
            preferred_device_id: None,
            is_active: true,
            expiration_at: None,
            suspend_until: None,
            last_login_at: None,
            encoded_password: String::new(),
            previous_passwords: String::new(),
            temp_password: None,
            password_changed_at: None,
            speed_units: None,
            distance_units: None,
            volume_units: None,
            pressure_units: None,
            economy_units: None,
            temperature_units: None,
            altitude_units: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_entity_into_domain() {
        let user: User = entity().into();
        assert_eq!(user.account_id, "acme");
        assert_eq!(user.user_id, "jsmith");
        assert_eq!(user.max_access_level, AccessLevel::ReadWrite);
        assert!(user.credentials.previous_passwords.is_empty());
    }

    #[test]
    fn test_unknown_access_level_resolves_to_none() {
        let mut e = entity();
        e.max_access_level = 99;
        let user: User = e.into();
        assert_eq!(user.max_access_level, AccessLevel::None);
    }
}
