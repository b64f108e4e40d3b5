//! Hierarchical resolution of SMTP and SMS configuration properties.
//!
//! A setting resolves through up to three layers: the entity's own property
//! blob when non-blank, then the manager account's blob when the entity is
//! managed, then the tenant label defaults. Resolution walks the chain per
//! read; nothing is memoized on the entity.

use serde::{Deserialize, Serialize};
use std::fmt;

use shared::properties::PropertyBag;

/// Which layer supplied a resolved property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertySource {
    Record,
    Manager,
    Label,
}

impl fmt::Display for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertySource::Record => write!(f, "record"),
            PropertySource::Manager => write!(f, "manager"),
            PropertySource::Label => write!(f, "label"),
        }
    }
}

/// A resolved property chain. Lookups walk record → manager → label and
/// return the first layer that defines the key.
#[derive(Debug, Clone, Default)]
pub struct ResolvedProperties {
    layers: Vec<(PropertySource, PropertyBag)>,
}

impl ResolvedProperties {
    /// Builds the chain from the raw blobs. Blank blobs contribute no layer,
    /// and the manager layer is only present for managed entities.
    pub fn resolve(record_blob: &str, manager_blob: Option<&str>, label_blob: &str) -> Self {
        let mut layers = Vec::new();

        let record = PropertyBag::parse(record_blob);
        if !record.is_empty() {
            layers.push((PropertySource::Record, record));
        }
        if let Some(blob) = manager_blob {
            let manager = PropertyBag::parse(blob);
            if !manager.is_empty() {
                layers.push((PropertySource::Manager, manager));
            }
        }
        let label = PropertyBag::parse(label_blob);
        if !label.is_empty() {
            layers.push((PropertySource::Label, label));
        }

        Self { layers }
    }

    /// Returns the value for `key` from the nearest layer defining it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.layers
            .iter()
            .find_map(|(_, bag)| bag.get(key))
    }

    /// Returns the value for `key`, or `default` when no layer defines it.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Returns which layer supplies `key`, if any.
    pub fn source_of(&self, key: &str) -> Option<PropertySource> {
        self.layers
            .iter()
            .find(|(_, bag)| bag.contains_key(key))
            .map(|(source, _)| *source)
    }

    /// True when no layer defines any property.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Typed view of the resolved SMTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: String,
    pub use_ssl: bool,
}

impl SmtpConfig {
    pub fn from_resolved(props: &ResolvedProperties) -> Self {
        Self {
            host: props.get_or("host", "").to_string(),
            port: props
                .get("port")
                .and_then(|p| p.parse().ok())
                .unwrap_or(25),
            user: props.get_or("user", "").to_string(),
            password: props.get_or("password", "").to_string(),
            from: props.get_or("from", "").to_string(),
            use_ssl: props.get_or("ssl", "false") == "true",
        }
    }

    /// True when a usable relay host is configured somewhere in the chain.
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty()
    }
}

/// Typed view of the resolved SMS gateway settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsConfig {
    pub gateway: String,
    pub sender: String,
    pub auth_id: String,
    pub auth_token: String,
    pub max_message_length: usize,
}

impl SmsConfig {
    pub fn from_resolved(props: &ResolvedProperties) -> Self {
        Self {
            gateway: props.get_or("gateway", "").to_string(),
            sender: props.get_or("sender", "").to_string(),
            auth_id: props.get_or("auth.id", "").to_string(),
            auth_token: props.get_or("auth.token", "").to_string(),
            max_message_length: props
                .get("max.length")
                .and_then(|p| p.parse().ok())
                .unwrap_or(160),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.gateway.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_layer_wins() {
        let props = ResolvedProperties::resolve(
            "host=record.example",
            Some("host=manager.example"),
            "host=label.example",
        );
        assert_eq!(props.get("host"), Some("record.example"));
        assert_eq!(props.source_of("host"), Some(PropertySource::Record));
    }

    #[test]
    fn test_manager_layer_fills_gaps() {
        let props = ResolvedProperties::resolve(
            "from=ops@record.example",
            Some("host=manager.example port=465"),
            "host=label.example ssl=true",
        );
        assert_eq!(props.get("from"), Some("ops@record.example"));
        assert_eq!(props.get("host"), Some("manager.example"));
        assert_eq!(props.source_of("host"), Some(PropertySource::Manager));
        assert_eq!(props.get("ssl"), Some("true"));
        assert_eq!(props.source_of("ssl"), Some(PropertySource::Label));
    }

    #[test]
    fn test_unmanaged_entity_skips_manager_layer() {
        let props = ResolvedProperties::resolve("", None, "host=label.example");
        assert_eq!(props.get("host"), Some("label.example"));
        assert_eq!(props.source_of("host"), Some(PropertySource::Label));
    }

    #[test]
    fn test_blank_layers_contribute_nothing() {
        let props = ResolvedProperties::resolve("", Some("   "), "");
        assert!(props.is_empty());
        assert_eq!(props.get("host"), None);
        assert_eq!(props.source_of("host"), None);
    }

    #[test]
    fn test_missing_key_returns_default() {
        let props = ResolvedProperties::resolve("host=mail", None, "");
        assert_eq!(props.get_or("port", "25"), "25");
        assert_eq!(props.get_or("host", "other"), "mail");
    }

    #[test]
    fn test_smtp_config_decoding() {
        let props = ResolvedProperties::resolve(
            "host=smtp.acme.example port=465 ssl=true",
            None,
            r#"from="Fleet Ops" user=mailer password=hunter2"#,
        );
        let smtp = SmtpConfig::from_resolved(&props);
        assert_eq!(smtp.host, "smtp.acme.example");
        assert_eq!(smtp.port, 465);
        assert!(smtp.use_ssl);
        assert_eq!(smtp.from, "Fleet Ops");
        assert_eq!(smtp.user, "mailer");
        assert!(smtp.is_configured());
    }

    #[test]
    fn test_smtp_config_defaults() {
        let smtp = SmtpConfig::from_resolved(&ResolvedProperties::default());
        assert_eq!(smtp.port, 25);
        assert!(!smtp.use_ssl);
        assert!(!smtp.is_configured());
    }

    #[test]
    fn test_smtp_config_bad_port_falls_back() {
        let props = ResolvedProperties::resolve("host=mail port=notaport", None, "");
        let smtp = SmtpConfig::from_resolved(&props);
        assert_eq!(smtp.port, 25);
    }

    #[test]
    fn test_sms_config_decoding() {
        let props = ResolvedProperties::resolve(
            "gateway=twilio sender=+15550100",
            Some("auth.id=AC123 auth.token=tok456"),
            "max.length=140",
        );
        let sms = SmsConfig::from_resolved(&props);
        assert_eq!(sms.gateway, "twilio");
        assert_eq!(sms.sender, "+15550100");
        assert_eq!(sms.auth_id, "AC123");
        assert_eq!(sms.auth_token, "tok456");
        assert_eq!(sms.max_message_length, 140);
        assert!(sms.is_configured());
    }

    #[test]
    fn test_sms_config_defaults() {
        let sms = SmsConfig::from_resolved(&ResolvedProperties::default());
        assert_eq!(sms.max_message_length, 160);
        assert!(!sms.is_configured());
    }
}
