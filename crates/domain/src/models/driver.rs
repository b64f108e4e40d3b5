//! Driver domain model: the per-account vehicle operator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use shared::time::is_day_past;

/// Driver duty status per US FMCSA §395.8 record-of-duty-status categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyStatus {
    Invalid,
    Unknown,
    OffDuty,
    Sleeping,
    Driving,
    OnDuty,
}

impl DutyStatus {
    /// True only for the off-duty statuses (off duty, sleeper berth).
    pub fn is_off_duty(&self) -> bool {
        matches!(self, DutyStatus::OffDuty | DutyStatus::Sleeping)
    }

    /// True only for the on-duty statuses (driving, on duty not driving).
    pub fn is_on_duty(&self) -> bool {
        matches!(self, DutyStatus::Driving | DutyStatus::OnDuty)
    }

    pub fn code(&self) -> i16 {
        match self {
            DutyStatus::Invalid => -1,
            DutyStatus::Unknown => 0,
            DutyStatus::OffDuty => 1,
            DutyStatus::Sleeping => 2,
            DutyStatus::Driving => 3,
            DutyStatus::OnDuty => 4,
        }
    }

    /// Resolves a stored status code. Unrecognized codes resolve to
    /// `Unknown` rather than failing; a duty status is display data.
    pub fn from_code(code: i16) -> Self {
        match code {
            -1 => DutyStatus::Invalid,
            1 => DutyStatus::OffDuty,
            2 => DutyStatus::Sleeping,
            3 => DutyStatus::Driving,
            4 => DutyStatus::OnDuty,
            _ => DutyStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DutyStatus::Invalid => "invalid",
            DutyStatus::Unknown => "unknown",
            DutyStatus::OffDuty => "off_duty",
            DutyStatus::Sleeping => "sleeping",
            DutyStatus::Driving => "driving",
            DutyStatus::OnDuty => "on_duty",
        }
    }
}

impl FromStr for DutyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "invalid" => Ok(DutyStatus::Invalid),
            "unknown" => Ok(DutyStatus::Unknown),
            "off_duty" | "off" => Ok(DutyStatus::OffDuty),
            "sleeping" | "sb" => Ok(DutyStatus::Sleeping),
            "driving" | "d" => Ok(DutyStatus::Driving),
            "on_duty" | "on" => Ok(DutyStatus::OnDuty),
            _ => Err(format!("Invalid duty status: {}", s)),
        }
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Last electronic-logging state for a driver, stored as
/// `"<epoch-seconds>,<0|1>"` (timestamp of the last ELog event and whether
/// the driver was driving at that point).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElogState {
    pub last_timestamp: i64,
    pub is_driving: bool,
}

impl ElogState {
    pub fn new(last_timestamp: i64, is_driving: bool) -> Self {
        Self {
            last_timestamp,
            is_driving,
        }
    }

    /// Serializes to the stored column format.
    pub fn encode(&self) -> String {
        format!(
            "{},{}",
            self.last_timestamp,
            if self.is_driving { 1 } else { 0 }
        )
    }

    /// Parses the stored column format. Malformed input decodes to the
    /// default (no recorded state) rather than failing a row load.
    pub fn decode(raw: &str) -> Self {
        let mut parts = raw.splitn(2, ',');
        let last_timestamp = parts
            .next()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(0);
        let is_driving = parts.next().map(|p| p.trim() == "1").unwrap_or(false);
        Self {
            last_timestamp,
            is_driving,
        }
    }
}

impl fmt::Display for ElogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// A vehicle operator belonging to an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub account_id: String,
    pub driver_id: String,
    pub description: String,
    pub display_name: String,
    pub notes: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub license_type: String,
    pub license_number: String,
    /// License expiration as a day number; `None` means unset.
    pub license_expire_day: Option<i32>,
    /// Birthdate as a day number; `None` means unset.
    pub birthdate_day: Option<i32>,
    pub badge_id: String,
    pub card_id: String,
    pub address: String,
    /// Optionally linked device.
    pub device_id: Option<String>,
    pub duty_status: DutyStatus,
    pub elog_enabled: bool,
    pub elog_state: Option<ElogState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Driver {
    /// Creates a new in-memory driver with default field values.
    pub fn new(
        account_id: impl Into<String>,
        driver_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            driver_id: driver_id.into(),
            description: String::new(),
            display_name: String::new(),
            notes: String::new(),
            contact_phone: String::new(),
            contact_email: String::new(),
            license_type: String::new(),
            license_number: String::new(),
            license_expire_day: None,
            birthdate_day: None,
            badge_id: String::new(),
            card_id: String::new(),
            address: String::new(),
            device_id: None,
            duty_status: DutyStatus::Unknown,
            elog_enabled: false,
            elog_state: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True when a license expiration is recorded and lies strictly before
    /// the calendar date of `now`.
    pub fn is_license_expired(&self, now: DateTime<Utc>) -> bool {
        match self.license_expire_day {
            Some(day) => is_day_past(day, now),
            None => false,
        }
    }

    pub fn has_linked_device(&self) -> bool {
        self.device_id
            .as_deref()
            .map(|d| !d.is_empty())
            .unwrap_or(false)
    }

    /// Updates the duty status; negative codes other than -1 collapse to
    /// `Unknown` via `DutyStatus::from_code`.
    pub fn set_duty_status(&mut self, status: DutyStatus) {
        self.duty_status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::time::day_number_at;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_duty_status_off_duty_predicate() {
        assert!(DutyStatus::OffDuty.is_off_duty());
        assert!(DutyStatus::Sleeping.is_off_duty());
        assert!(!DutyStatus::Driving.is_off_duty());
        assert!(!DutyStatus::OnDuty.is_off_duty());
        assert!(!DutyStatus::Unknown.is_off_duty());
        assert!(!DutyStatus::Invalid.is_off_duty());
    }

    #[test]
    fn test_duty_status_on_duty_predicate() {
        assert!(DutyStatus::Driving.is_on_duty());
        assert!(DutyStatus::OnDuty.is_on_duty());
        assert!(!DutyStatus::OffDuty.is_on_duty());
        assert!(!DutyStatus::Sleeping.is_on_duty());
        assert!(!DutyStatus::Unknown.is_on_duty());
        assert!(!DutyStatus::Invalid.is_on_duty());
    }

    #[test]
    fn test_duty_status_codes() {
        assert_eq!(DutyStatus::from_code(-1), DutyStatus::Invalid);
        assert_eq!(DutyStatus::from_code(0), DutyStatus::Unknown);
        assert_eq!(DutyStatus::from_code(1), DutyStatus::OffDuty);
        assert_eq!(DutyStatus::from_code(2), DutyStatus::Sleeping);
        assert_eq!(DutyStatus::from_code(3), DutyStatus::Driving);
        assert_eq!(DutyStatus::from_code(4), DutyStatus::OnDuty);
        // unrecognized codes resolve to Unknown, never an error
        assert_eq!(DutyStatus::from_code(99), DutyStatus::Unknown);
        assert_eq!(DutyStatus::from_code(-5), DutyStatus::Unknown);
    }

    #[test]
    fn test_duty_status_from_str_fmcsa_abbreviations() {
        assert_eq!(DutyStatus::from_str("off").unwrap(), DutyStatus::OffDuty);
        assert_eq!(DutyStatus::from_str("SB").unwrap(), DutyStatus::Sleeping);
        assert_eq!(DutyStatus::from_str("d").unwrap(), DutyStatus::Driving);
        assert_eq!(DutyStatus::from_str("ON").unwrap(), DutyStatus::OnDuty);
        assert!(DutyStatus::from_str("resting").is_err());
    }

    #[test]
    fn test_elog_state_encode() {
        assert_eq!(ElogState::new(1500000000, true).encode(), "1500000000,1");
        assert_eq!(ElogState::new(0, false).encode(), "0,0");
    }

    #[test]
    fn test_elog_state_decode() {
        assert_eq!(
            ElogState::decode("1500000000,1"),
            ElogState::new(1500000000, true)
        );
        assert_eq!(ElogState::decode("1500000000,0"), ElogState::new(1500000000, false));
    }

    #[test]
    fn test_elog_state_decode_malformed() {
        assert_eq!(ElogState::decode(""), ElogState::default());
        assert_eq!(ElogState::decode("garbage"), ElogState::default());
        assert_eq!(ElogState::decode("123"), ElogState::new(123, false));
        assert_eq!(ElogState::decode("abc,1"), ElogState::new(0, true));
    }

    #[test]
    fn test_elog_state_round_trip() {
        let state = ElogState::new(1700000000, true);
        assert_eq!(ElogState::decode(&state.encode()), state);
    }

    #[test]
    fn test_license_expiration() {
        let now = at(1_000_000_000);
        let today = day_number_at(now);

        let mut driver = Driver::new("acme", "jsmith", now);
        assert!(!driver.is_license_expired(now)); // unset never expires

        driver.license_expire_day = Some(today - 1);
        assert!(driver.is_license_expired(now));

        driver.license_expire_day = Some(today);
        assert!(!driver.is_license_expired(now)); // expires end of day

        driver.license_expire_day = Some(today + 30);
        assert!(!driver.is_license_expired(now));
    }

    #[test]
    fn test_has_linked_device() {
        let mut driver = Driver::new("acme", "jsmith", at(0));
        assert!(!driver.has_linked_device());
        driver.device_id = Some(String::new());
        assert!(!driver.has_linked_device());
        driver.device_id = Some("truck-17".to_string());
        assert!(driver.has_linked_device());
    }
}
