//! Driver entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{Driver, DutyStatus, ElogState};

/// Database row mapping for the drivers table. The ELog columns belong to
/// an optional column family; rows loaded from schemas without it carry the
/// defaults (see `SchemaCapabilities`).
#[derive(Debug, Clone, FromRow)]
pub struct DriverEntity {
    pub account_id: String,
    pub driver_id: String,
    pub description: String,
    pub display_name: String,
    pub notes: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub license_type: String,
    pub license_number: String,
    pub license_expire_day: Option<i32>,
    pub birthdate_day: Option<i32>,
    pub badge_id: String,
    pub card_id: String,
    pub address: String,
    pub device_id: Option<String>,
    pub duty_status: i16,
    #[sqlx(default)]
    pub elog_enabled: Option<bool>,
    #[sqlx(default)]
    pub elog_state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DriverEntity> for Driver {
    fn from(entity: DriverEntity) -> Self {
        Self {
            account_id: entity.account_id,
            driver_id: entity.driver_id,
            description: entity.description,
            display_name: entity.display_name,
            notes: entity.notes,
            contact_phone: entity.contact_phone,
            contact_email: entity.contact_email,
            license_type: entity.license_type,
            license_number: entity.license_number,
            license_expire_day: entity.license_expire_day,
            birthdate_day: entity.birthdate_day,
            badge_id: entity.badge_id,
            card_id: entity.card_id,
            address: entity.address,
            device_id: entity.device_id,
            duty_status: DutyStatus::from_code(entity.duty_status),
            elog_enabled: entity.elog_enabled.unwrap_or(false),
            elog_state: entity
                .elog_state
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(ElogState::decode),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entity() -> DriverEntity {
        let at = Utc.timestamp_opt(1000, 0).unwrap();
        DriverEntity {
            account_id: "acme".to_string(),
            driver_id: "jsmith".to_string(),
            description: "Driver jsmith".to_string(),
            display_name: String::new(),
            notes: String::new(),
            contact_phone: String::new(),
            contact_email: String::new(),
            license_type: "CDL-A".to_string(),
            license_number: "D1234567".to_string(),
            license_expire_day: Some(20000),
            birthdate_day: None,
            badge_id: String::new(),
            card_id: String::new(),
            address: String::new(),
            device_id: Some("truck-17".to_string()),
            duty_status: 3,
            elog_enabled: Some(true),
            elog_state: Some("1500000000,1".to_string()),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_entity_into_domain() {
        let driver: Driver = entity().into();
        assert_eq!(driver.driver_id, "jsmith");
        assert_eq!(driver.duty_status, DutyStatus::Driving);
        assert!(driver.elog_enabled);
        assert_eq!(driver.elog_state, Some(ElogState::new(1500000000, true)));
        assert_eq!(driver.license_expire_day, Some(20000));
    }

    #[test]
    fn test_missing_elog_columns_default_off() {
        let mut e = entity();
        e.elog_enabled = None;
        e.elog_state = None;
        let driver: Driver = e.into();
        assert!(!driver.elog_enabled);
        assert_eq!(driver.elog_state, None);
    }

    #[test]
    fn test_blank_elog_state_decodes_to_none() {
        let mut e = entity();
        e.elog_state = Some(String::new());
        let driver: Driver = e.into();
        assert_eq!(driver.elog_state, None);
    }

    #[test]
    fn test_unknown_duty_status_code() {
        let mut e = entity();
        e.duty_status = 77;
        let driver: Driver = e.into();
        assert_eq!(driver.duty_status, DutyStatus::Unknown);
    }
}
