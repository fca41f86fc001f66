//! Record Console CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the console schema and collection tables
//! rc-cli migrate
//!
//! # Clear and regenerate sample data (100 records per collection)
//! rc-cli seed --count 100
//!
//! # Record counts per collection
//! rc-cli stats
//!
//! # Run a store-native query, one JSON row per line
//! rc-cli query "SELECT key, doc->>'name' AS name FROM console.users LIMIT 5"
//! ```
//!
//! All commands read `CONSOLE_DATABASE_URL` (or `DATABASE_URL`) from the
//! environment or a `.env` file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use record_console_admin::seed::DEFAULT_SEED_COUNT;

mod commands;

#[derive(Parser)]
#[command(name = "rc-cli")]
#[command(author, version, about = "Record Console CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Clear every collection and regenerate sample data
    Seed {
        /// Records per collection
        #[arg(short, long, default_value_t = DEFAULT_SEED_COUNT)]
        count: usize,
    },
    /// Show record counts per collection
    Stats,
    /// Run a store-native query and print rows as JSON lines
    Query {
        /// Query text
        text: String,
    },
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
        Commands::Seed { count } => commands::seed::run(count).await?,
        Commands::Stats => commands::stats::run().await?,
        Commands::Query { text } => commands::query::run(&text).await?,
    }
    Ok(())
}
