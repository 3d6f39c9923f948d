//! Twinkle CLI - migrations and catalog administration.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! twinkle migrate
//!
//! # Create a dashboard account (the email must also be allow-listed)
//! twinkle account create -e owner@example.com -p 'a long passphrase'
//!
//! # Manage the admin allow-list stored in the settings table
//! twinkle allow-list add owner@example.com
//! twinkle allow-list remove former@example.com
//! twinkle allow-list show
//!
//! # Load products from YAML
//! twinkle seed data/seed-products.yaml
//! ```
//!
//! Every command reads `DATABASE_URL` (or `--database-url`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "twinkle")]
#[command(author, version, about = "Twinkle CLI tools")]
struct Cli {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Manage dashboard accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Manage the admin allow-list
    AllowList {
        #[command(subcommand)]
        action: AllowListAction,
    },
    /// Insert products from a YAML file
    Seed {
        /// Path to a YAML list of products
        file: std::path::PathBuf,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create an account with a password
    Create {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 12 characters)
        #[arg(short, long, env = "TWINKLE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum AllowListAction {
    /// Allow an email to use the dashboard
    Add { email: String },
    /// Revoke an email's dashboard access
    Remove { email: String },
    /// Print the current list
    Show,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "twinkle_cli=info,twinkle_admin=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let database_url = cli
        .database_url
        .map(SecretString::from)
        .ok_or(CliError::MissingEnvVar("DATABASE_URL"))?;
    let pool = twinkle_catalog::db::create_pool(&database_url).await?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&pool).await?,
        Commands::Account { action } => match action {
            AccountAction::Create { email, password } => {
                commands::account::create(&pool, &email, &password).await?;
            }
        },
        Commands::AllowList { action } => match action {
            AllowListAction::Add { email } => commands::allow_list::add(&pool, &email).await?,
            AllowListAction::Remove { email } => {
                commands::allow_list::remove(&pool, &email).await?;
            }
            AllowListAction::Show => commands::allow_list::show(&pool).await?,
        },
        Commands::Seed { file } => commands::seed::run(&pool, &file).await?,
    }
    Ok(())
}
