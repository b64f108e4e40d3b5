//! Expiration and suspension predicates shared by Account and User.

use chrono::{DateTime, Duration, Utc};

/// True when the record is expired: inactive records are always treated as
/// expired, otherwise an expiration timestamp in the past expires the record.
pub fn is_expired(is_active: bool, expiration: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    if !is_active {
        return true;
    }
    matches!(expiration, Some(at) if at <= now)
}

/// True when the record will expire within `within_secs` seconds. A negative
/// window means "has any expiration at all".
pub fn will_expire(
    expiration: Option<DateTime<Utc>>,
    within_secs: i64,
    now: DateTime<Utc>,
) -> bool {
    match expiration {
        None => false,
        Some(_) if within_secs < 0 => true,
        Some(at) => at <= now + Duration::seconds(within_secs),
    }
}

/// True while a suspend-until timestamp lies in the future.
pub fn is_suspended(suspend_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(suspend_until, Some(at) if at > now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_inactive_is_always_expired() {
        assert!(is_expired(false, None, at(1000)));
        assert!(is_expired(false, Some(at(2000)), at(1000)));
    }

    #[test]
    fn test_active_without_expiration_never_expires() {
        assert!(!is_expired(true, None, at(1000)));
    }

    #[test]
    fn test_expiration_in_past_expires() {
        assert!(is_expired(true, Some(at(500)), at(1000)));
        assert!(is_expired(true, Some(at(1000)), at(1000)));
        assert!(!is_expired(true, Some(at(1500)), at(1000)));
    }

    #[test]
    fn test_will_expire_without_expiration() {
        assert!(!will_expire(None, 60, at(1000)));
        assert!(!will_expire(None, -1, at(1000)));
    }

    #[test]
    fn test_will_expire_negative_window_matches_any_expiration() {
        assert!(will_expire(Some(at(999_999)), -1, at(1000)));
        assert!(will_expire(Some(at(500)), -1, at(1000)));
    }

    #[test]
    fn test_will_expire_within_window() {
        assert!(will_expire(Some(at(1050)), 60, at(1000)));
        assert!(will_expire(Some(at(1060)), 60, at(1000)));
        assert!(!will_expire(Some(at(1061)), 60, at(1000)));
        // already expired also counts as expiring within the window
        assert!(will_expire(Some(at(900)), 60, at(1000)));
    }

    #[test]
    fn test_is_suspended() {
        assert!(!is_suspended(None, at(1000)));
        assert!(is_suspended(Some(at(1500)), at(1000)));
        assert!(!is_suspended(Some(at(1000)), at(1000)));
        assert!(!is_suspended(Some(at(500)), at(1000)));
    }
}
