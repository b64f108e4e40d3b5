//! User administration commands.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use std::str::FromStr;
use tracing::info;

use domain::models::{AccessLevel, PreferredDeviceAuth, User};
use domain::services::authorization::{is_authorized_device, DeviceAuthorizationInput};
use domain::services::password_policy::suspend_time_for_failed_logins;
use domain::services::provisioning::build_user;

use super::account::require_account;
use super::{parse_bool, parse_set_args, AdminContext, CommandError};

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create a new user under an account
    Create {
        account_id: String,
        user_id: String,
        /// Initial password; a temporary password is generated when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Edit user fields
    Edit {
        account_id: String,
        user_id: String,
        /// Field assignment, repeatable: --set field=value
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        /// Replace the authorized device-group list (comma-separated)
        #[arg(long)]
        groups: Option<String>,
    },
    /// Delete a user
    Delete {
        account_id: String,
        user_id: String,
    },
    /// List users under an account
    List { account_id: String },
    /// Set a user password
    SetPassword {
        account_id: String,
        user_id: String,
        password: String,
    },
    /// Check a user password, recording the attempt and applying the
    /// failed-login suspension policy
    CheckPassword {
        account_id: String,
        user_id: String,
        password: String,
    },
    /// Check whether a user is authorized for a device
    CheckDevice {
        account_id: String,
        user_id: String,
        device_id: String,
    },
}

pub async fn run(ctx: &AdminContext, command: UserCommand) -> Result<(), CommandError> {
    match command {
        UserCommand::Create {
            account_id,
            user_id,
            password,
        } => create(ctx, &account_id, &user_id, password).await,
        UserCommand::Edit {
            account_id,
            user_id,
            set,
            groups,
        } => edit(ctx, &account_id, &user_id, &set, groups.as_deref()).await,
        UserCommand::Delete {
            account_id,
            user_id,
        } => delete(ctx, &account_id, &user_id).await,
        UserCommand::List { account_id } => list(ctx, &account_id).await,
        UserCommand::SetPassword {
            account_id,
            user_id,
            password,
        } => set_password(ctx, &account_id, &user_id, &password).await,
        UserCommand::CheckPassword {
            account_id,
            user_id,
            password,
        } => check_password(ctx, &account_id, &user_id, &password).await,
        UserCommand::CheckDevice {
            account_id,
            user_id,
            device_id,
        } => check_device(ctx, &account_id, &user_id, &device_id).await,
    }
}

async fn require_user(
    ctx: &AdminContext,
    account_id: &str,
    user_id: &str,
) -> Result<User, CommandError> {
    match ctx.users.find_by_id(account_id, user_id).await? {
        Some(entity) => Ok(entity.into()),
        None => Err(CommandError::Precondition(format!(
            "User {:?} does not exist under account {:?}",
            user_id, account_id
        ))),
    }
}

async fn create(
    ctx: &AdminContext,
    account_id: &str,
    raw_user_id: &str,
    password: Option<String>,
) -> Result<(), CommandError> {
    require_account(ctx, account_id).await?;

    let now = Utc::now();
    let mut user =
        build_user(account_id, raw_user_id, now).map_err(|e| CommandError::Usage(e.to_string()))?;

    if ctx.users.exists(account_id, &user.user_id).await? {
        return Err(CommandError::Precondition(format!(
            "User {:?} already exists under account {:?}",
            user.user_id, account_id
        )));
    }

    match password {
        Some(plain) => {
            let handler = ctx.password_handler();
            handler
                .validate_new_password(&plain, &[])
                .map_err(|e| CommandError::Usage(e.to_string()))?;
            let encoded = handler
                .encode_password(&plain)
                .map_err(|e| CommandError::Operation(e.to_string()))?;
            user.credentials.set_encoded_password(&encoded, now);
        }
        None => {
            let temp = shared::crypto::generate_password(8);
            user.credentials.set_temp_password(&temp);
            println!("Generated temporary password: {}", temp);
        }
    }

    ctx.users.insert(&user).await?;
    info!(account_id, user_id = %user.user_id, "user created");
    println!("Created user {}/{}", account_id, user.user_id);
    Ok(())
}

async fn edit(
    ctx: &AdminContext,
    account_id: &str,
    user_id: &str,
    set: &[String],
    groups: Option<&str>,
) -> Result<(), CommandError> {
    let mut user = require_user(ctx, account_id, user_id).await?;
    let assignments = parse_set_args(set)?;
    if assignments.is_empty() && groups.is_none() {
        return Err(CommandError::Usage(
            "No --set field=value assignments or --groups given".to_string(),
        ));
    }

    let now = Utc::now();
    for (field, value) in &assignments {
        apply_user_field(&mut user, field, value, now)?;
    }
    if !assignments.is_empty() {
        ctx.users.save(&user).await?;
    }

    if let Some(groups) = groups {
        let group_ids: Vec<String> = groups
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();
        ctx.groups
            .replace_assignments(account_id, user_id, &group_ids)
            .await?;
        println!(
            "Assigned {} device group(s) to {}/{}",
            group_ids.len(),
            account_id,
            user_id
        );
    }

    info!(account_id, user_id, "user updated");
    println!("Updated user {}/{}", account_id, user_id);
    Ok(())
}

fn apply_user_field(
    user: &mut User,
    field: &str,
    value: &str,
    _now: DateTime<Utc>,
) -> Result<(), CommandError> {
    let usage = |e: String| CommandError::Usage(e);
    match field {
        "description" => user.description = value.to_string(),
        "display_name" => user.display_name = value.to_string(),
        "notes" => user.notes = value.to_string(),
        "contact_name" => user.contact_name = value.to_string(),
        "contact_phone" => user.contact_phone = value.to_string(),
        "contact_email" => {
            shared::validation::validate_contact_email(value)
                .map_err(|e| usage(e.to_string()))?;
            user.contact_email = value.to_string();
        }
        "timezone" => user.timezone = value.to_string(),
        "role_id" => {
            user.role_id = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        }
        "max_access_level" => {
            user.max_access_level = AccessLevel::from_str(value).map_err(usage)?
        }
        "preferred_device_id" => {
            user.preferred_device_id = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        }
        "is_active" => user.is_active = parse_bool(field, value)?,
        _ => return Err(usage(format!("Unknown user field: {:?}", field))),
    }
    Ok(())
}

async fn delete(ctx: &AdminContext, account_id: &str, user_id: &str) -> Result<(), CommandError> {
    if !ctx.users.delete(account_id, user_id).await? {
        return Err(CommandError::Precondition(format!(
            "User {:?} does not exist under account {:?}",
            user_id, account_id
        )));
    }
    info!(account_id, user_id, "user deleted");
    println!("Deleted user {}/{}", account_id, user_id);
    Ok(())
}

async fn list(ctx: &AdminContext, account_id: &str) -> Result<(), CommandError> {
    require_account(ctx, account_id).await?;
    let users = ctx.users.list_for_account(account_id).await?;
    for entity in &users {
        println!(
            "{:<24} {:<12} {}",
            entity.user_id,
            AccessLevel::from_code(entity.max_access_level)
                .unwrap_or(AccessLevel::None)
                .as_str(),
            entity.description
        );
    }
    println!("{} user(s) under account {}", users.len(), account_id);
    Ok(())
}

async fn set_password(
    ctx: &AdminContext,
    account_id: &str,
    user_id: &str,
    password: &str,
) -> Result<(), CommandError> {
    let mut user = require_user(ctx, account_id, user_id).await?;
    let handler = ctx.password_handler();

    handler
        .validate_new_password(password, &user.credentials.previous_passwords)
        .map_err(|e| CommandError::Usage(e.to_string()))?;
    let encoded = handler
        .encode_password(password)
        .map_err(|e| CommandError::Operation(e.to_string()))?;

    let keep = handler.required_unique_password_count();
    let old = user.credentials.encoded_password.clone();
    if !old.is_empty() {
        user.credentials.push_previous_password(&old, keep);
    }
    user.credentials.set_encoded_password(&encoded, Utc::now());

    ctx.users
        .update_credentials(account_id, user_id, &user.credentials)
        .await?;
    info!(account_id, user_id, "user password updated");
    println!("Password updated for user {}/{}", account_id, user_id);
    Ok(())
}

async fn check_password(
    ctx: &AdminContext,
    account_id: &str,
    user_id: &str,
    password: &str,
) -> Result<(), CommandError> {
    let user = require_user(ctx, account_id, user_id).await?;
    let handler = ctx.password_handler();
    let now = Utc::now();

    if handler.check_password(password, &user.credentials.encoded_password) {
        ctx.audit.record_login_ok(account_id, user_id, now).await?;
        ctx.users.record_login(account_id, user_id, now).await?;
        ctx.accounts.record_login(account_id, now).await?;
        println!("Password accepted for {}/{}", account_id, user_id);
        return Ok(());
    }

    ctx.audit
        .record_login_failed(account_id, user_id, now)
        .await?;
    let window_start =
        now - chrono::Duration::seconds(handler.failed_login_attempt_interval_secs());
    let failed = ctx
        .audit
        .count_failed_logins_since(account_id, user_id, window_start)
        .await?;

    if let Some(until) = suspend_time_for_failed_logins(handler.as_ref(), failed, now, now) {
        ctx.users
            .update_suspend_until(account_id, user_id, Some(until))
            .await?;
        info!(account_id, user_id, until = %until, "user suspended after failed logins");
        println!(
            "Password rejected for {}/{}; suspended until {}",
            account_id,
            user_id,
            until.to_rfc3339()
        );
    } else {
        println!(
            "Password rejected for {}/{} ({} recent failure(s))",
            account_id, user_id, failed
        );
    }
    Ok(())
}

async fn check_device(
    ctx: &AdminContext,
    account_id: &str,
    user_id: &str,
    device_id: &str,
) -> Result<(), CommandError> {
    let user = require_user(ctx, account_id, user_id).await?;

    let preferred_device_auth = PreferredDeviceAuth::from_str(&ctx.tenant.preferred_device_auth)
        .map_err(CommandError::Operation)?;
    let assigned_groups = ctx.groups.assigned_groups(account_id, user_id).await?;
    let groups_containing_device = ctx
        .groups
        .groups_containing_device(account_id, &assigned_groups, device_id)
        .await?;

    let authorized = is_authorized_device(&DeviceAuthorizationInput {
        is_admin: user.is_admin(),
        device_id,
        preferred_device_id: user.preferred_device_id.as_deref(),
        preferred_device_auth,
        assigned_groups: &assigned_groups,
        groups_containing_device: &groups_containing_device,
        default_authorization: ctx.tenant.default_device_authorization,
    });

    println!(
        "User {}/{} is {} for device {}",
        account_id,
        user_id,
        if authorized {
            "authorized"
        } else {
            "not authorized"
        },
        device_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user() -> User {
        User::new("acme", "jsmith", Utc.timestamp_opt(0, 0).unwrap())
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_000_000, 0).unwrap()
    }

    #[test]
    fn test_apply_string_fields() {
        let mut u = user();
        apply_user_field(&mut u, "description", "Dispatcher", now()).unwrap();
        apply_user_field(&mut u, "contact_phone", "+1-555-0100", now()).unwrap();
        assert_eq!(u.description, "Dispatcher");
        assert_eq!(u.contact_phone, "+1-555-0100");
    }

    #[test]
    fn test_apply_access_level() {
        let mut u = user();
        apply_user_field(&mut u, "max_access_level", "read_only", now()).unwrap();
        assert_eq!(u.max_access_level, AccessLevel::ReadOnly);
        assert!(apply_user_field(&mut u, "max_access_level", "root", now()).is_err());
    }

    #[test]
    fn test_apply_preferred_device() {
        let mut u = user();
        apply_user_field(&mut u, "preferred_device_id", "truck-1", now()).unwrap();
        assert_eq!(u.preferred_device_id, Some("truck-1".to_string()));
        apply_user_field(&mut u, "preferred_device_id", "", now()).unwrap();
        assert_eq!(u.preferred_device_id, None);
    }

    #[test]
    fn test_apply_unknown_field_is_usage_error() {
        let mut u = user();
        assert!(matches!(
            apply_user_field(&mut u, "shoe_size", "11", now()),
            Err(CommandError::Usage(_))
        ));
    }
}
