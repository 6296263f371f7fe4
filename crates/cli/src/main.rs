//! Copperline CLI - migrations, seeding and the scheduled-job runner.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cpl-cli migrate
//!
//! # Seed demo data (built-in fixture, or a YAML file)
//! cpl-cli seed
//! cpl-cli seed --file my-fixture.yaml
//!
//! # Run one scheduled job and exit
//! cpl-cli job heartbeat
//! cpl-cli job low-stock
//! cpl-cli job order-reminders
//! cpl-cli job report
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with demo data
//! - `job` - Run one scheduled job
//!
//! The `job` subcommands are built to sit behind cron or a systemd timer:
//! each run is a fresh process that performs its work once and exits with
//! a status the scheduler can act on.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cpl-cli")]
#[command(author, version, about = "Copperline CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with demo data
    Seed {
        /// Path to a YAML fixture (defaults to the built-in fixture)
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Run one scheduled job
    Job {
        #[command(subcommand)]
        name: JobName,
    },
}

#[derive(Subcommand)]
enum JobName {
    /// Append a liveness line, probing the API with `hello`
    Heartbeat,
    /// Restock products that have fallen below ten units
    LowStock,
    /// Log orders placed within the last seven days
    OrderReminders,
    /// Generate the customers/orders/revenue report
    Report,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::run(file.as_deref()).await?,
        Commands::Job { name } => match name {
            JobName::Heartbeat => commands::job::run_heartbeat().await?,
            JobName::LowStock => commands::job::run_low_stock().await?,
            JobName::OrderReminders => commands::job::run_order_reminders().await?,
            JobName::Report => commands::job::run_report().await?,
        },
    }
    Ok(())
}
