//! Account administration commands.

use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use std::str::FromStr;
use tracing::info;

use domain::models::{
    Account, AltitudeUnits, CurrencyUnits, DistanceUnits, EconomyUnits, GeocoderMode,
    LatLonFormat, PressureUnits, SpeedUnits, TemperatureUnits, VolumeUnits,
};
use domain::services::password_policy::suspend_time_for_failed_logins;
use domain::services::provisioning::build_account;
use persistence::repositories::TempAccountError;

use super::{parse_bool, parse_set_args, AdminContext, CommandError};

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Create a new account
    Create {
        /// Account ID (omitted when allocating a temporary account)
        account_id: Option<String>,
        /// Account description
        #[arg(long)]
        description: Option<String>,
        /// Initial password; a temporary password is generated when omitted
        #[arg(long)]
        password: Option<String>,
        /// Allocate a temporary account with a generated ID
        #[arg(long)]
        temporary: bool,
    },
    /// Edit account fields
    Edit {
        account_id: String,
        /// Field assignment, repeatable: --set field=value
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
    /// Delete an account and its dependent records
    Delete { account_id: String },
    /// List account IDs and descriptions
    List,
    /// Report account usage and lifecycle state
    Report {
        /// Limit the report to one account
        account_id: Option<String>,
    },
    /// Set an account password
    SetPassword {
        account_id: String,
        password: String,
    },
    /// Check an account password, recording the attempt and applying the
    /// failed-login suspension policy
    CheckPassword {
        account_id: String,
        password: String,
    },
    /// Find accounts and users by contact email
    FindEmail { email: String },
    /// Delete expired temporary accounts
    Prune,
    /// Count events older than the given age
    CountOldEvents {
        account_id: String,
        /// Age cutoff in days
        days: i64,
    },
    /// Delete events older than the given age
    DeleteOldEvents {
        account_id: String,
        /// Age cutoff in days
        days: i64,
        /// Required confirmation for the destructive delete
        #[arg(long)]
        confirm_delete: bool,
    },
}

pub async fn run(ctx: &AdminContext, command: AccountCommand) -> Result<(), CommandError> {
    match command {
        AccountCommand::Create {
            account_id,
            description,
            password,
            temporary,
        } => create(ctx, account_id, description, password, temporary).await,
        AccountCommand::Edit { account_id, set } => edit(ctx, &account_id, &set).await,
        AccountCommand::Delete { account_id } => delete(ctx, &account_id).await,
        AccountCommand::List => list(ctx).await,
        AccountCommand::Report { account_id } => report(ctx, account_id.as_deref()).await,
        AccountCommand::SetPassword {
            account_id,
            password,
        } => set_password(ctx, &account_id, &password).await,
        AccountCommand::CheckPassword {
            account_id,
            password,
        } => check_password(ctx, &account_id, &password).await,
        AccountCommand::FindEmail { email } => find_email(ctx, &email).await,
        AccountCommand::Prune => prune(ctx).await,
        AccountCommand::CountOldEvents { account_id, days } => {
            count_old_events(ctx, &account_id, days).await
        }
        AccountCommand::DeleteOldEvents {
            account_id,
            days,
            confirm_delete,
        } => delete_old_events(ctx, &account_id, days, confirm_delete).await,
    }
}

/// Loads an account or fails with a not-found precondition.
pub async fn require_account(
    ctx: &AdminContext,
    account_id: &str,
) -> Result<Account, CommandError> {
    match ctx.accounts.find_by_id(account_id).await? {
        Some(entity) => Ok(entity.into()),
        None => Err(CommandError::Precondition(format!(
            "Account {:?} does not exist",
            account_id
        ))),
    }
}

async fn create(
    ctx: &AdminContext,
    account_id: Option<String>,
    description: Option<String>,
    password: Option<String>,
    temporary: bool,
) -> Result<(), CommandError> {
    let now = Utc::now();

    if temporary {
        if account_id.is_some() {
            return Err(CommandError::Usage(
                "A temporary account ID is generated; do not pass one".to_string(),
            ));
        }
        let profile = ctx.tenant.temp_account_profile();
        let account = ctx
            .accounts
            .create_temporary(&profile, now)
            .await
            .map_err(|e| match e {
                TempAccountError::Database(e) => CommandError::Database(e),
                other => CommandError::Operation(other.to_string()),
            })?;
        info!(account_id = %account.account_id, "temporary account created");
        println!("Created temporary account {}", account.account_id);
        if let Some(temp) = &account.credentials.temp_password {
            println!("Temporary password: {}", temp);
        }
        if let Some(expires) = account.expiration_at {
            println!("Expires: {}", expires.to_rfc3339());
        }
        return Ok(());
    }

    let raw_id = account_id.ok_or_else(|| {
        CommandError::Usage("An account ID is required unless --temporary is given".to_string())
    })?;
    let mut account =
        build_account(&raw_id, now).map_err(|e| CommandError::Usage(e.to_string()))?;

    if ctx.accounts.exists(&account.account_id).await? {
        return Err(CommandError::Precondition(format!(
            "Account {:?} already exists",
            account.account_id
        )));
    }

    if let Some(description) = description {
        account.description = description;
    }
    if account.private_label_name.is_empty() {
        account.private_label_name = ctx.tenant.label_name.clone();
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
            account.credentials.set_encoded_password(&encoded, now);
        }
        None => {
            let temp = shared::crypto::generate_password(8);
            account.credentials.set_temp_password(&temp);
            println!("Generated temporary password: {}", temp);
        }
    }

    ctx.accounts.insert(&account).await?;
    info!(account_id = %account.account_id, "account created");
    println!("Created account {}", account.account_id);
    Ok(())
}

async fn edit(ctx: &AdminContext, account_id: &str, set: &[String]) -> Result<(), CommandError> {
    let mut account = require_account(ctx, account_id).await?;
    let assignments = parse_set_args(set)?;
    if assignments.is_empty() {
        return Err(CommandError::Usage(
            "No --set field=value assignments given".to_string(),
        ));
    }

    let now = Utc::now();
    for (field, value) in &assignments {
        apply_account_field(&mut account, field, value, now)?;
    }

    ctx.accounts.save(&account).await?;

    // Notify the outbound push integration of the account change
    if let Some(provider) = ctx.providers.push(&ctx.tenant.push_provider) {
        provider
            .push_account_update(&account.account_id)
            .await
            .map_err(|e| CommandError::Operation(e.to_string()))?;
    }

    info!(account_id, fields = assignments.len(), "account updated");
    println!("Updated account {}", account.account_id);
    Ok(())
}

fn apply_account_field(
    account: &mut Account,
    field: &str,
    value: &str,
    now: DateTime<Utc>,
) -> Result<(), CommandError> {
    let usage = |e: String| CommandError::Usage(e);
    match field {
        "description" => account.description = value.to_string(),
        "display_name" => account.display_name = value.to_string(),
        "notes" => account.notes = value.to_string(),
        "contact_name" => account.contact_name = value.to_string(),
        "contact_phone" => account.contact_phone = value.to_string(),
        "contact_email" => {
            shared::validation::validate_contact_email(value)
                .map_err(|e| usage(e.to_string()))?;
            account.contact_email = value.to_string();
        }
        "timezone" => account.timezone = value.to_string(),
        "private_label_name" => account.private_label_name = value.to_string(),
        "is_active" => account.is_active = parse_bool(field, value)?,
        "manager_id" => {
            account.manager_id = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        }
        "is_account_manager" => account.is_account_manager = parse_bool(field, value)?,
        "max_devices" => {
            account.max_devices = match value {
                "" | "none" => None,
                v => Some(
                    v.parse::<u32>()
                        .map_err(|_| usage(format!("Invalid max_devices: {:?}", v)))?,
                ),
            }
        }
        "max_ping_count" => {
            account.max_ping_count = value
                .parse::<u32>()
                .map_err(|_| usage(format!("Invalid max_ping_count: {:?}", value)))?
        }
        "expire_days" => {
            account.expiration_at = match value {
                "" | "never" => None,
                v => {
                    let days = v
                        .parse::<i64>()
                        .map_err(|_| usage(format!("Invalid expire_days: {:?}", v)))?;
                    Some(now + Duration::days(days))
                }
            }
        }
        "speed_units" => {
            account.speed_units = Some(SpeedUnits::from_str(value).map_err(usage)?)
        }
        "distance_units" => {
            account.distance_units = Some(DistanceUnits::from_str(value).map_err(usage)?)
        }
        "volume_units" => {
            account.volume_units = Some(VolumeUnits::from_str(value).map_err(usage)?)
        }
        "pressure_units" => {
            account.pressure_units = Some(PressureUnits::from_str(value).map_err(usage)?)
        }
        "economy_units" => {
            account.economy_units = Some(EconomyUnits::from_str(value).map_err(usage)?)
        }
        "temperature_units" => {
            account.temperature_units = Some(TemperatureUnits::from_str(value).map_err(usage)?)
        }
        "altitude_units" => {
            account.altitude_units = Some(AltitudeUnits::from_str(value).map_err(usage)?)
        }
        "currency" => account.currency = Some(CurrencyUnits::from_str(value).map_err(usage)?),
        "latlon_format" => {
            account.latlon_format = Some(LatLonFormat::from_str(value).map_err(usage)?)
        }
        "geocoder_mode" => {
            account.geocoder_mode = Some(GeocoderMode::from_str(value).map_err(usage)?)
        }
        "smtp_properties" => account.smtp_properties = value.to_string(),
        "sms_properties" => account.sms_properties = value.to_string(),
        _ => return Err(usage(format!("Unknown account field: {:?}", field))),
    }
    Ok(())
}

async fn delete(ctx: &AdminContext, account_id: &str) -> Result<(), CommandError> {
    if !ctx.accounts.delete(account_id).await? {
        return Err(CommandError::Precondition(format!(
            "Account {:?} does not exist",
            account_id
        )));
    }
    info!(account_id, "account deleted");
    println!("Deleted account {}", account_id);
    Ok(())
}

async fn list(ctx: &AdminContext) -> Result<(), CommandError> {
    let ids = ctx.accounts.list_ids().await?;
    for id in &ids {
        if let Some(entity) = ctx.accounts.find_by_id(id).await? {
            let account: Account = entity.into();
            println!(
                "{:<24} {:<10} {}",
                account.account_id,
                account.account_type.as_str(),
                account.description
            );
        }
    }
    println!("{} account(s)", ids.len());
    Ok(())
}

async fn report(ctx: &AdminContext, account_id: Option<&str>) -> Result<(), CommandError> {
    let ids = match account_id {
        Some(id) => {
            require_account(ctx, id).await?;
            vec![id.to_string()]
        }
        None => ctx.accounts.list_ids().await?,
    };

    let now = Utc::now();
    println!(
        "{:<24} {:>6} {:>8} {:>8} {:<10} {}",
        "Account", "Users", "Drivers", "Devices", "State", "Expires"
    );
    for id in &ids {
        let Some(entity) = ctx.accounts.find_by_id(id).await? else {
            continue;
        };
        let account: Account = entity.into();
        let users = ctx.users.list_for_account(id).await?.len();
        let drivers = ctx.drivers.list_for_account(id).await?.len();
        let devices = ctx.devices.count_for_account(id).await?;
        let state = if account.is_expired(now) {
            "expired"
        } else if account.is_suspended(now) {
            "suspended"
        } else {
            "active"
        };
        let expires = account
            .expiration_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:>6} {:>8} {:>8} {:<10} {}",
            account.account_id, users, drivers, devices, state, expires
        );
    }

    // Single-account reports also list the device inventory
    if let Some(id) = account_id {
        for device_id in ctx.devices.list_ids_for_account(id).await? {
            println!("  device {}", device_id);
        }
    }
    Ok(())
}

async fn set_password(
    ctx: &AdminContext,
    account_id: &str,
    password: &str,
) -> Result<(), CommandError> {
    let mut account = require_account(ctx, account_id).await?;
    let handler = ctx.password_handler();

    handler
        .validate_new_password(password, &account.credentials.previous_passwords)
        .map_err(|e| CommandError::Usage(e.to_string()))?;
    let encoded = handler
        .encode_password(password)
        .map_err(|e| CommandError::Operation(e.to_string()))?;

    let keep = handler.required_unique_password_count();
    let old = account.credentials.encoded_password.clone();
    if !old.is_empty() {
        account.credentials.push_previous_password(&old, keep);
    }
    account.credentials.set_encoded_password(&encoded, Utc::now());

    ctx.accounts
        .update_credentials(account_id, &account.credentials)
        .await?;
    info!(account_id, "account password updated");
    println!("Password updated for account {}", account_id);
    Ok(())
}

/// Account-level login check. Failed attempts are audited under the account
/// with a blank user ID, and the suspension policy applies to the account
/// itself.
async fn check_password(
    ctx: &AdminContext,
    account_id: &str,
    password: &str,
) -> Result<(), CommandError> {
    let account = require_account(ctx, account_id).await?;
    let handler = ctx.password_handler();
    let now = Utc::now();

    if handler.check_password(password, &account.credentials.encoded_password) {
        ctx.audit.record_login_ok(account_id, "", now).await?;
        ctx.accounts.record_login(account_id, now).await?;
        println!("Password accepted for account {}", account_id);
        return Ok(());
    }

    ctx.audit.record_login_failed(account_id, "", now).await?;
    let window_start =
        now - Duration::seconds(handler.failed_login_attempt_interval_secs());
    let failed = ctx
        .audit
        .count_failed_logins_since(account_id, "", window_start)
        .await?;

    if let Some(until) = suspend_time_for_failed_logins(handler.as_ref(), failed, now, now) {
        ctx.accounts
            .update_suspend_until(account_id, Some(until))
            .await?;
        info!(account_id, until = %until, "account suspended after failed logins");
        println!(
            "Password rejected; account {} suspended until {}",
            account_id,
            until.to_rfc3339()
        );
    } else {
        println!(
            "Password rejected for account {} ({} recent failure(s))",
            account_id, failed
        );
    }
    Ok(())
}

async fn find_email(ctx: &AdminContext, email: &str) -> Result<(), CommandError> {
    let accounts = ctx.accounts.find_by_contact_email(email).await?;
    for entity in &accounts {
        println!("account  {}", entity.account_id);
    }
    let users = ctx.users.find_by_contact_email(email).await?;
    for entity in &users {
        println!("user     {}/{}", entity.account_id, entity.user_id);
    }
    println!(
        "{} account(s), {} user(s) with contact email {}",
        accounts.len(),
        users.len(),
        email
    );
    Ok(())
}

async fn prune(ctx: &AdminContext) -> Result<(), CommandError> {
    let now = Utc::now();
    let expired = ctx.accounts.list_expired_temporary(now).await?;
    for id in &expired {
        ctx.accounts.delete(id).await?;
        info!(account_id = %id, "expired temporary account pruned");
        println!("Pruned {}", id);
    }
    println!("{} temporary account(s) pruned", expired.len());
    Ok(())
}

async fn count_old_events(
    ctx: &AdminContext,
    account_id: &str,
    days: i64,
) -> Result<(), CommandError> {
    require_account(ctx, account_id).await?;
    let cutoff = Utc::now() - Duration::days(days);
    let count = ctx.events.count_events_before(account_id, cutoff).await?;
    println!(
        "{} event(s) older than {} day(s) for account {}",
        count, days, account_id
    );
    Ok(())
}

async fn delete_old_events(
    ctx: &AdminContext,
    account_id: &str,
    days: i64,
    confirm_delete: bool,
) -> Result<(), CommandError> {
    if !confirm_delete {
        return Err(CommandError::Usage(
            "Deleting events requires --confirm-delete".to_string(),
        ));
    }
    require_account(ctx, account_id).await?;
    let cutoff = Utc::now() - Duration::days(days);
    let deleted = ctx.events.delete_events_before(account_id, cutoff).await?;
    info!(account_id, deleted, "old events deleted");
    println!(
        "Deleted {} event(s) older than {} day(s) for account {}",
        deleted, days, account_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn account() -> Account {
        Account::new("acme", Utc.timestamp_opt(0, 0).unwrap())
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_000_000, 0).unwrap()
    }

    #[test]
    fn test_apply_string_fields() {
        let mut acct = account();
        apply_account_field(&mut acct, "description", "East fleet", now()).unwrap();
        apply_account_field(&mut acct, "timezone", "America/Denver", now()).unwrap();
        assert_eq!(acct.description, "East fleet");
        assert_eq!(acct.timezone, "America/Denver");
    }

    #[test]
    fn test_apply_unit_fields() {
        let mut acct = account();
        apply_account_field(&mut acct, "distance_units", "miles", now()).unwrap();
        apply_account_field(&mut acct, "geocoder_mode", "partial", now()).unwrap();
        assert_eq!(acct.distance_units, Some(DistanceUnits::Miles));
        assert_eq!(acct.geocoder_mode, Some(GeocoderMode::Partial));
    }

    #[test]
    fn test_apply_invalid_unit_is_usage_error() {
        let mut acct = account();
        assert!(matches!(
            apply_account_field(&mut acct, "speed_units", "furlongs", now()),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn test_apply_max_devices() {
        let mut acct = account();
        apply_account_field(&mut acct, "max_devices", "25", now()).unwrap();
        assert_eq!(acct.max_devices, Some(25));
        apply_account_field(&mut acct, "max_devices", "none", now()).unwrap();
        assert_eq!(acct.max_devices, None);
    }

    #[test]
    fn test_apply_manager_id() {
        let mut acct = account();
        apply_account_field(&mut acct, "manager_id", "mgr1", now()).unwrap();
        assert_eq!(acct.manager_id, Some("mgr1".to_string()));
        apply_account_field(&mut acct, "manager_id", "", now()).unwrap();
        assert_eq!(acct.manager_id, None);
    }

    #[test]
    fn test_apply_expire_days() {
        let mut acct = account();
        apply_account_field(&mut acct, "expire_days", "30", now()).unwrap();
        assert_eq!(acct.expiration_at, Some(now() + Duration::days(30)));
        apply_account_field(&mut acct, "expire_days", "never", now()).unwrap();
        assert_eq!(acct.expiration_at, None);
    }

    #[test]
    fn test_apply_invalid_email_is_usage_error() {
        let mut acct = account();
        assert!(matches!(
            apply_account_field(&mut acct, "contact_email", "nope", now()),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn test_apply_unknown_field_is_usage_error() {
        let mut acct = account();
        assert!(matches!(
            apply_account_field(&mut acct, "favorite_color", "blue", now()),
            Err(CommandError::Usage(_))
        ));
    }
}
