//! Identifier and contact validation.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex");
}

/// Maximum length of account/user/driver identifiers.
pub const MAX_ID_LENGTH: usize = 32;

/// Filters a raw identifier down to its valid characters and lowercases it.
///
/// Valid characters are ASCII letters, digits, and `_` `-` `.` `@`; everything
/// else is removed. Returns `None` when the input is blank or nothing valid
/// remains, since a blank ID never identifies a record.
pub fn filter_id(raw: &str) -> Option<String> {
    let filtered: String = raw
        .trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '@'))
        .take(MAX_ID_LENGTH)
        .collect::<String>()
        .to_lowercase();

    if filtered.is_empty() {
        None
    } else {
        Some(filtered)
    }
}

/// Returns true if `id` is already a valid, normalized identifier.
pub fn is_valid_id(id: &str) -> bool {
    filter_id(id).as_deref() == Some(id)
}

/// Validates a contact email address. Blank is allowed (contact email is an
/// optional field everywhere it appears).
pub fn validate_contact_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        let mut err = ValidationError::new("contact_email");
        err.message = Some("Invalid contact email address".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    #[test]
    fn test_filter_id_passthrough() {
        assert_eq!(filter_id("fleet01"), Some("fleet01".to_string()));
        assert_eq!(filter_id("ops.east_1-a@hq"), Some("ops.east_1-a@hq".to_string()));
    }

    #[test]
    fn test_filter_id_lowercases() {
        assert_eq!(filter_id("FleetOne"), Some("fleetone".to_string()));
        assert_eq!(filter_id("ACME"), Some("acme".to_string()));
    }

    #[test]
    fn test_filter_id_strips_invalid_characters() {
        assert_eq!(filter_id("fleet one!"), Some("fleetone".to_string()));
        assert_eq!(filter_id("a#b$c"), Some("abc".to_string()));
    }

    #[test]
    fn test_filter_id_trims_whitespace() {
        assert_eq!(filter_id("  fleet01  "), Some("fleet01".to_string()));
    }

    #[test]
    fn test_filter_id_blank_is_invalid() {
        assert_eq!(filter_id(""), None);
        assert_eq!(filter_id("   "), None);
        assert_eq!(filter_id("!#$%"), None);
    }

    #[test]
    fn test_filter_id_truncates_to_max_length() {
        let long = "a".repeat(MAX_ID_LENGTH + 10);
        assert_eq!(filter_id(&long).unwrap().len(), MAX_ID_LENGTH);
    }

    #[test]
    fn test_is_valid_id() {
        assert!(is_valid_id("fleet01"));
        assert!(is_valid_id("ops-east.1"));
        assert!(!is_valid_id("Fleet01")); // not lowercased
        assert!(!is_valid_id("fleet 01")); // contains space
        assert!(!is_valid_id(""));
    }

    #[test]
    fn test_validate_contact_email_valid() {
        assert!(validate_contact_email("ops@example.com").is_ok());
        assert!(validate_contact_email("first.last+tag@sub.example.co").is_ok());
    }

    #[test]
    fn test_validate_contact_email_blank_allowed() {
        assert!(validate_contact_email("").is_ok());
    }

    #[test]
    fn test_validate_contact_email_invalid() {
        assert!(validate_contact_email("not-an-email").is_err());
        assert!(validate_contact_email("missing@tld").is_err());
        assert!(validate_contact_email("@example.com").is_err());
    }

    #[test]
    fn test_validate_contact_email_generated() {
        for _ in 0..10 {
            let email: String = SafeEmail().fake();
            assert!(validate_contact_email(&email).is_ok(), "rejected {}", email);
        }
    }
}
