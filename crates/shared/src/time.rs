//! Day-number date helpers.
//!
//! Driver license expirations and birthdates are stored as whole days since
//! 1970-01-01 (the Unix epoch). A missing value means "unset".

use chrono::{DateTime, Duration, NaiveDate, Utc};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date is valid")
}

/// Converts a calendar date to its day number.
pub fn day_number_from_date(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

/// Converts a day number back to a calendar date. Returns `None` when the
/// day number is outside chrono's representable range.
pub fn date_from_day_number(day: i32) -> Option<NaiveDate> {
    epoch().checked_add_signed(Duration::days(day as i64))
}

/// Returns the day number of the given instant (UTC calendar date).
pub fn day_number_at(at: DateTime<Utc>) -> i32 {
    day_number_from_date(at.date_naive())
}

/// Returns true if `day` falls strictly before the calendar date of `at`.
pub fn is_day_past(day: i32, at: DateTime<Utc>) -> bool {
    day < day_number_at(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_epoch_is_day_zero() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(day_number_from_date(epoch), 0);
        assert_eq!(date_from_day_number(0), Some(epoch));
    }

    #[test]
    fn test_known_day_numbers() {
        let date = NaiveDate::from_ymd_opt(1970, 2, 1).unwrap();
        assert_eq!(day_number_from_date(date), 31);

        // 2000-01-01 is 10957 days after the epoch (7 leap years in between)
        let y2k = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        assert_eq!(day_number_from_date(y2k), 10957);
    }

    #[test]
    fn test_round_trip() {
        for day in [0, 1, 365, 10957, 20000] {
            let date = date_from_day_number(day).unwrap();
            assert_eq!(day_number_from_date(date), day);
        }
    }

    #[test]
    fn test_negative_day_number() {
        let date = date_from_day_number(-1).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1969, 12, 31).unwrap());
        assert_eq!(day_number_from_date(date), -1);
    }

    #[test]
    fn test_is_day_past() {
        let at = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!(is_day_past(10956, at)); // 1999-12-31
        assert!(!is_day_past(10957, at)); // same day is not past
        assert!(!is_day_past(10958, at)); // tomorrow
    }

    #[test]
    fn test_day_number_at_ignores_time_of_day() {
        let morning = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 1).unwrap();
        let night = Utc.with_ymd_and_hms(2000, 1, 1, 23, 59, 59).unwrap();
        assert_eq!(day_number_at(morning), day_number_at(night));
    }
}
