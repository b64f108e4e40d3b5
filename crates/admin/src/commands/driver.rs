//! Driver administration commands.

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use std::str::FromStr;
use tracing::info;

use domain::models::{Driver, DutyStatus};
use domain::services::provisioning::build_driver;

use super::account::require_account;
use super::{parse_bool, parse_set_args, AdminContext, CommandError};

#[derive(Debug, Subcommand)]
pub enum DriverCommand {
    /// Create a new driver under an account
    Create {
        account_id: String,
        driver_id: String,
    },
    /// Edit driver fields
    Edit {
        account_id: String,
        driver_id: String,
        /// Field assignment, repeatable: --set field=value
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
    /// Delete a driver
    Delete {
        account_id: String,
        driver_id: String,
    },
    /// List drivers under an account
    List { account_id: String },
    /// Set a driver's duty status
    SetDutyStatus {
        account_id: String,
        driver_id: String,
        /// Duty status: off_duty, sleeping, driving, on_duty (or FMCSA
        /// abbreviations off/sb/d/on)
        status: String,
    },
}

pub async fn run(ctx: &AdminContext, command: DriverCommand) -> Result<(), CommandError> {
    match command {
        DriverCommand::Create {
            account_id,
            driver_id,
        } => create(ctx, &account_id, &driver_id).await,
        DriverCommand::Edit {
            account_id,
            driver_id,
            set,
        } => edit(ctx, &account_id, &driver_id, &set).await,
        DriverCommand::Delete {
            account_id,
            driver_id,
        } => delete(ctx, &account_id, &driver_id).await,
        DriverCommand::List { account_id } => list(ctx, &account_id).await,
        DriverCommand::SetDutyStatus {
            account_id,
            driver_id,
            status,
        } => set_duty_status(ctx, &account_id, &driver_id, &status).await,
    }
}

async fn require_driver(
    ctx: &AdminContext,
    account_id: &str,
    driver_id: &str,
) -> Result<Driver, CommandError> {
    match ctx.drivers.find_by_id(account_id, driver_id).await? {
        Some(entity) => Ok(entity.into()),
        None => Err(CommandError::Precondition(format!(
            "Driver {:?} does not exist under account {:?}",
            driver_id, account_id
        ))),
    }
}

async fn create(
    ctx: &AdminContext,
    account_id: &str,
    raw_driver_id: &str,
) -> Result<(), CommandError> {
    require_account(ctx, account_id).await?;

    let now = Utc::now();
    let driver = build_driver(account_id, raw_driver_id, now)
        .map_err(|e| CommandError::Usage(e.to_string()))?;

    if ctx.drivers.exists(account_id, &driver.driver_id).await? {
        return Err(CommandError::Precondition(format!(
            "Driver {:?} already exists under account {:?}",
            driver.driver_id, account_id
        )));
    }

    ctx.drivers.insert(&driver).await?;
    info!(account_id, driver_id = %driver.driver_id, "driver created");
    println!("Created driver {}/{}", account_id, driver.driver_id);
    Ok(())
}

async fn edit(
    ctx: &AdminContext,
    account_id: &str,
    driver_id: &str,
    set: &[String],
) -> Result<(), CommandError> {
    let mut driver = require_driver(ctx, account_id, driver_id).await?;
    let assignments = parse_set_args(set)?;
    if assignments.is_empty() {
        return Err(CommandError::Usage(
            "No --set field=value assignments given".to_string(),
        ));
    }

    let was_elog_enabled = driver.elog_enabled;
    for (field, value) in &assignments {
        apply_driver_field(&mut driver, field, value)?;
    }

    ctx.drivers.save(&driver).await?;

    // Notify the ELog integration when recording is toggled
    if driver.elog_enabled != was_elog_enabled {
        if let Some(provider) = ctx.providers.elog(&ctx.tenant.elog_provider) {
            provider
                .set_driver_enabled(account_id, driver_id, driver.elog_enabled)
                .await
                .map_err(|e| CommandError::Operation(e.to_string()))?;
        }
    }

    info!(account_id, driver_id, "driver updated");
    println!("Updated driver {}/{}", account_id, driver_id);
    Ok(())
}

/// Parses a `YYYY-MM-DD` field value into a day number; empty clears it.
fn parse_day_field(field: &str, value: &str) -> Result<Option<i32>, CommandError> {
    if value.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CommandError::Usage(format!("Invalid date for {}: {:?} (expected YYYY-MM-DD)", field, value))
    })?;
    Ok(Some(shared::time::day_number_from_date(date)))
}

fn apply_driver_field(driver: &mut Driver, field: &str, value: &str) -> Result<(), CommandError> {
    let usage = |e: String| CommandError::Usage(e);
    match field {
        "description" => driver.description = value.to_string(),
        "display_name" => driver.display_name = value.to_string(),
        "notes" => driver.notes = value.to_string(),
        "contact_phone" => driver.contact_phone = value.to_string(),
        "contact_email" => {
            shared::validation::validate_contact_email(value)
                .map_err(|e| usage(e.to_string()))?;
            driver.contact_email = value.to_string();
        }
        "license_type" => driver.license_type = value.to_string(),
        "license_number" => driver.license_number = value.to_string(),
        "license_expire" => driver.license_expire_day = parse_day_field(field, value)?,
        "birthdate" => driver.birthdate_day = parse_day_field(field, value)?,
        "badge_id" => driver.badge_id = value.to_string(),
        "card_id" => driver.card_id = value.to_string(),
        "address" => driver.address = value.to_string(),
        "device_id" => {
            driver.device_id = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        }
        "elog_enabled" => driver.elog_enabled = parse_bool(field, value)?,
        _ => return Err(usage(format!("Unknown driver field: {:?}", field))),
    }
    Ok(())
}

async fn delete(
    ctx: &AdminContext,
    account_id: &str,
    driver_id: &str,
) -> Result<(), CommandError> {
    if !ctx.drivers.delete(account_id, driver_id).await? {
        return Err(CommandError::Precondition(format!(
            "Driver {:?} does not exist under account {:?}",
            driver_id, account_id
        )));
    }
    info!(account_id, driver_id, "driver deleted");
    println!("Deleted driver {}/{}", account_id, driver_id);
    Ok(())
}

async fn list(ctx: &AdminContext, account_id: &str) -> Result<(), CommandError> {
    require_account(ctx, account_id).await?;
    let now = Utc::now();
    let drivers = ctx.drivers.list_for_account(account_id).await?;
    for entity in &drivers {
        let driver: Driver = entity.clone().into();
        let license = if driver.is_license_expired(now) {
            "license expired"
        } else {
            ""
        };
        println!(
            "{:<24} {:<10} {:<20} {}",
            driver.driver_id,
            driver.duty_status.as_str(),
            driver.description,
            license
        );
    }
    println!("{} driver(s) under account {}", drivers.len(), account_id);
    Ok(())
}

async fn set_duty_status(
    ctx: &AdminContext,
    account_id: &str,
    driver_id: &str,
    status: &str,
) -> Result<(), CommandError> {
    let driver = require_driver(ctx, account_id, driver_id).await?;
    let status = DutyStatus::from_str(status).map_err(CommandError::Usage)?;

    ctx.drivers
        .update_duty_status(account_id, driver_id, status)
        .await?;

    // Forward the change to the ELog integration when the driver records
    // hours of service
    if driver.elog_enabled {
        if let Some(provider) = ctx.providers.elog(&ctx.tenant.elog_provider) {
            let now = Utc::now();
            provider
                .record_duty_status(account_id, driver_id, status, now)
                .await
                .map_err(|e| CommandError::Operation(e.to_string()))?;
            if ctx.drivers.capabilities().driver_elog {
                let state = domain::models::ElogState::new(now.timestamp(), status.is_on_duty());
                ctx.drivers
                    .update_elog_state(account_id, driver_id, true, Some(state))
                    .await?;
            }
        }
    }

    info!(account_id, driver_id, status = %status, "duty status updated");
    println!(
        "Duty status for {}/{} set to {}",
        account_id, driver_id, status
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn driver() -> Driver {
        Driver::new("acme", "jsmith", Utc.timestamp_opt(0, 0).unwrap())
    }

    #[test]
    fn test_apply_license_fields() {
        let mut d = driver();
        apply_driver_field(&mut d, "license_type", "CDL-A").unwrap();
        apply_driver_field(&mut d, "license_number", "D1234567").unwrap();
        apply_driver_field(&mut d, "license_expire", "2030-06-15").unwrap();
        assert_eq!(d.license_type, "CDL-A");
        assert_eq!(
            d.license_expire_day,
            Some(shared::time::day_number_from_date(
                NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
            ))
        );
    }

    #[test]
    fn test_apply_license_expire_clears_on_empty() {
        let mut d = driver();
        d.license_expire_day = Some(20000);
        apply_driver_field(&mut d, "license_expire", "").unwrap();
        assert_eq!(d.license_expire_day, None);
    }

    #[test]
    fn test_apply_invalid_date_is_usage_error() {
        let mut d = driver();
        assert!(matches!(
            apply_driver_field(&mut d, "birthdate", "15/06/1985"),
            Err(CommandError::Usage(_))
        ));
    }

    #[test]
    fn test_apply_device_link() {
        let mut d = driver();
        apply_driver_field(&mut d, "device_id", "truck-17").unwrap();
        assert_eq!(d.device_id, Some("truck-17".to_string()));
        apply_driver_field(&mut d, "device_id", "").unwrap();
        assert_eq!(d.device_id, None);
    }

    #[test]
    fn test_apply_elog_enabled() {
        let mut d = driver();
        apply_driver_field(&mut d, "elog_enabled", "true").unwrap();
        assert!(d.elog_enabled);
    }

    #[test]
    fn test_apply_unknown_field_is_usage_error() {
        let mut d = driver();
        assert!(matches!(
            apply_driver_field(&mut d, "truck_color", "red"),
            Err(CommandError::Usage(_))
        ));
    }
}
