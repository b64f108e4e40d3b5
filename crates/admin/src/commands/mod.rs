//! Administration commands, grouped by entity.

pub mod account;
pub mod driver;
pub mod user;

use std::sync::Arc;
use thiserror::Error;

use domain::services::password_policy::{PasswordHandler, PasswordHandlerRegistry};
use domain::services::providers::ProviderRegistry;
use persistence::repositories::{
    AccountRepository, AuditRepository, DeviceRepository, DriverRepository, EventRepository,
    GroupListRepository, UserRepository,
};

use crate::config::TenantConfig;

/// Exit code for usage/validation errors.
pub const EXIT_USAGE: u8 = 1;
/// Exit code for not-found / already-exists preconditions.
pub const EXIT_PRECONDITION: u8 = 98;
/// Exit code for database or operational failures.
pub const EXIT_FAILURE: u8 = 99;

/// Error from an administration command, mapped to a process exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Precondition(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Operation(String),
}

impl CommandError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Usage(_) => EXIT_USAGE,
            CommandError::Precondition(_) => EXIT_PRECONDITION,
            CommandError::Database(_) | CommandError::Operation(_) => EXIT_FAILURE,
        }
    }
}

/// Shared handles built once at startup and passed into every command.
pub struct AdminContext {
    pub accounts: AccountRepository,
    pub users: UserRepository,
    pub drivers: DriverRepository,
    pub groups: GroupListRepository,
    pub audit: AuditRepository,
    pub events: EventRepository,
    pub devices: DeviceRepository,
    pub passwords: PasswordHandlerRegistry,
    pub providers: ProviderRegistry,
    pub tenant: TenantConfig,
}

impl AdminContext {
    /// Resolves the password handler for the configured tenant label.
    pub fn password_handler(&self) -> Arc<dyn PasswordHandler> {
        self.passwords.resolve(Some(&self.tenant.label_name))
    }
}

/// Parses repeated `--set field=value` arguments into pairs.
pub fn parse_set_args(args: &[String]) -> Result<Vec<(String, String)>, CommandError> {
    args.iter()
        .map(|arg| match arg.split_once('=') {
            Some((field, value)) if !field.is_empty() => {
                Ok((field.to_string(), value.to_string()))
            }
            _ => Err(CommandError::Usage(format!(
                "Invalid --set argument {:?}, expected field=value",
                arg
            ))),
        })
        .collect()
}

/// Parses a boolean field value.
pub fn parse_bool(field: &str, value: &str) -> Result<bool, CommandError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(CommandError::Usage(format!(
            "Invalid boolean for {}: {:?}",
            field, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_args() {
        let args = vec![
            "description=East fleet".to_string(),
            "is_active=true".to_string(),
        ];
        let pairs = parse_set_args(&args).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("description".to_string(), "East fleet".to_string()),
                ("is_active".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_set_args_value_may_contain_equals() {
        let pairs = parse_set_args(&["smtp_properties=host=mail port=25".to_string()]).unwrap();
        assert_eq!(pairs[0].0, "smtp_properties");
        assert_eq!(pairs[0].1, "host=mail port=25");
    }

    #[test]
    fn test_parse_set_args_rejects_missing_equals() {
        assert!(matches!(
            parse_set_args(&["description".to_string()]),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn test_parse_set_args_rejects_empty_field() {
        assert!(matches!(
            parse_set_args(&["=value".to_string()]),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("is_active", "true").unwrap());
        assert!(parse_bool("is_active", "YES").unwrap());
        assert!(!parse_bool("is_active", "0").unwrap());
        assert!(parse_bool("is_active", "maybe").is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CommandError::Usage("x".into()).exit_code(), EXIT_USAGE);
        assert_eq!(
            CommandError::Precondition("x".into()).exit_code(),
            EXIT_PRECONDITION
        );
        assert_eq!(
            CommandError::Operation("x".into()).exit_code(),
            EXIT_FAILURE
        );
        assert_eq!(
            CommandError::Database(sqlx::Error::RowNotFound).exit_code(),
            EXIT_FAILURE
        );
    }
}
