//! FleetTrack administration tool.
//!
//! Command groups: `account`, `user`, `driver`. Exit codes: 0 on success,
//! 1 for usage/validation errors, 98 for not-found/already-exists
//! preconditions, 99 for database or operational failures.

use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::account::AccountCommand;
use commands::driver::DriverCommand;
use commands::user::UserCommand;
use commands::{AdminContext, CommandError, EXIT_USAGE};
use domain::services::password_policy::{GeneralPasswordHandler, PasswordHandlerRegistry};
use domain::services::providers::ProviderRegistry;
use persistence::repositories::{
    AccountRepository, AuditRepository, DeviceRepository, DriverRepository, EventRepository,
    GroupListRepository, UserRepository,
};
use persistence::schema::SchemaCapabilities;

#[derive(Parser)]
#[command(name = "fleettrack-admin", about = "FleetTrack administration tool", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Account administration
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },
    /// User administration
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Driver administration
    Driver {
        #[command(subcommand)]
        command: DriverCommand,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = match config::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    init_tracing(&config.logging);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(logging: &config::LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli, config: config::Config) -> Result<(), CommandError> {
    let pool = persistence::db::create_pool(&config.database_config())
        .await
        .map_err(CommandError::Database)?;

    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await
        .map_err(|e| CommandError::Operation(format!("Migration failed: {}", e)))?;

    let capabilities = SchemaCapabilities::detect(&pool)
        .await
        .map_err(CommandError::Database)?;

    let encoding = config.password.encoding().map_err(CommandError::Usage)?;
    let handler = GeneralPasswordHandler::new("default", encoding, config.password.policy());
    let mut passwords = PasswordHandlerRegistry::new(Arc::new(handler));
    let default_handler = passwords.default_handler();
    passwords.register(config.tenant.label_name.clone(), default_handler);

    let ctx = AdminContext {
        accounts: AccountRepository::new(pool.clone()),
        users: UserRepository::new(pool.clone()),
        drivers: DriverRepository::new(pool.clone(), capabilities),
        groups: GroupListRepository::new(pool.clone()),
        audit: AuditRepository::new(pool.clone()),
        events: EventRepository::new(pool.clone()),
        devices: DeviceRepository::new(pool),
        passwords,
        providers: ProviderRegistry::new(),
        tenant: config.tenant,
    };

    match cli.command {
        Commands::Account { command } => commands::account::run(&ctx, command).await,
        Commands::User { command } => commands::user::run(&ctx, command).await,
        Commands::Driver { command } => commands::driver::run(&ctx, command).await,
    }
}
