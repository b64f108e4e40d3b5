//! Property-blob parsing.
//!
//! SMTP and SMS settings are stored as a single text column holding
//! whitespace-separated `key=value` pairs, with double quotes around values
//! that contain spaces (e.g. `host=smtp.example.com port=465 from="Fleet Ops"`).
//! `PropertyBag` parses and re-serializes that format.

use std::collections::BTreeMap;

/// An ordered set of `key=value` properties parsed from a text blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    entries: BTreeMap<String, String>,
}

impl PropertyBag {
    /// Creates an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a property blob. Pairs without an `=` are treated as flags with
    /// an empty value; a later duplicate key replaces an earlier one.
    pub fn parse(blob: &str) -> Self {
        let mut entries = BTreeMap::new();
        let mut chars = blob.chars().peekable();

        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() {
                chars.next();
                continue;
            }

            let mut key = String::new();
            while let Some(&ch) = chars.peek() {
                if ch == '=' || ch.is_whitespace() {
                    break;
                }
                key.push(ch);
                chars.next();
            }

            let mut value = String::new();
            if chars.peek() == Some(&'=') {
                chars.next(); // consume '='
                if chars.peek() == Some(&'"') {
                    chars.next(); // consume opening quote
                    for ch in chars.by_ref() {
                        if ch == '"' {
                            break;
                        }
                        value.push(ch);
                    }
                } else {
                    while let Some(&ch) = chars.peek() {
                        if ch.is_whitespace() {
                            break;
                        }
                        value.push(ch);
                        chars.next();
                    }
                }
            }

            if !key.is_empty() {
                entries.insert(key, value);
            }
        }

        Self { entries }
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Sets a property, replacing any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes back to the `key=value` blob format, quoting values that
    /// contain whitespace.
    pub fn to_blob(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(key);
            out.push('=');
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                out.push('"');
                out.push_str(value);
                out.push('"');
            } else {
                out.push_str(value);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert!(PropertyBag::parse("").is_empty());
        assert!(PropertyBag::parse("   \t  ").is_empty());
    }

    #[test]
    fn test_parse_single_pair() {
        let bag = PropertyBag::parse("host=smtp.example.com");
        assert_eq!(bag.get("host"), Some("smtp.example.com"));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_parse_multiple_pairs() {
        let bag = PropertyBag::parse("host=smtp.example.com port=465 ssl=true");
        assert_eq!(bag.get("host"), Some("smtp.example.com"));
        assert_eq!(bag.get("port"), Some("465"));
        assert_eq!(bag.get("ssl"), Some("true"));
    }

    #[test]
    fn test_parse_quoted_value() {
        let bag = PropertyBag::parse(r#"from="Fleet Operations" port=25"#);
        assert_eq!(bag.get("from"), Some("Fleet Operations"));
        assert_eq!(bag.get("port"), Some("25"));
    }

    #[test]
    fn test_parse_empty_quoted_value() {
        let bag = PropertyBag::parse(r#"user="""#);
        assert_eq!(bag.get("user"), Some(""));
    }

    #[test]
    fn test_parse_flag_without_value() {
        let bag = PropertyBag::parse("enabled host=mail");
        assert_eq!(bag.get("enabled"), Some(""));
        assert_eq!(bag.get("host"), Some("mail"));
    }

    #[test]
    fn test_parse_duplicate_key_last_wins() {
        let bag = PropertyBag::parse("port=25 port=465");
        assert_eq!(bag.get("port"), Some("465"));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_parse_extra_whitespace() {
        let bag = PropertyBag::parse("  host=mail \t  port=25\n");
        assert_eq!(bag.get("host"), Some("mail"));
        assert_eq!(bag.get("port"), Some("25"));
    }

    #[test]
    fn test_get_or_default() {
        let bag = PropertyBag::parse("port=25");
        assert_eq!(bag.get_or("port", "465"), "25");
        assert_eq!(bag.get_or("host", "localhost"), "localhost");
    }

    #[test]
    fn test_set_replaces() {
        let mut bag = PropertyBag::parse("port=25");
        bag.set("port", "465");
        bag.set("host", "mail");
        assert_eq!(bag.get("port"), Some("465"));
        assert_eq!(bag.get("host"), Some("mail"));
    }

    #[test]
    fn test_to_blob_round_trip() {
        let bag = PropertyBag::parse(r#"from="Fleet Operations" host=mail port=25"#);
        let reparsed = PropertyBag::parse(&bag.to_blob());
        assert_eq!(bag, reparsed);
    }

    #[test]
    fn test_to_blob_quotes_whitespace_values() {
        let mut bag = PropertyBag::new();
        bag.set("from", "Fleet Operations");
        assert_eq!(bag.to_blob(), r#"from="Fleet Operations""#);
    }

    #[test]
    fn test_unterminated_quote_reads_to_end() {
        let bag = PropertyBag::parse(r#"from="Fleet Operations"#);
        assert_eq!(bag.get("from"), Some("Fleet Operations"));
    }
}
