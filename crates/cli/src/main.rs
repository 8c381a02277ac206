//! Laundry Desk CLI - read-only and pricing access to the laundry backend.
//!
//! # Usage
//!
//! ```bash
//! # Estimate the price of 3 shirts
//! laundry-cli price Shirt 3
//!
//! # Look up an order
//! laundry-cli track 6650a1f2c3
//!
//! # Orders of a user for March 2025
//! laundry-cli history u1 --month 3 --year 2025
//!
//! # Admin statistics
//! laundry-cli summary
//! ```
//!
//! # Environment Variables
//!
//! - `LAUNDRY_API_URL` - Backend origin (default `http://127.0.0.1:8000`)
//! - `LAUNDRY_API_TIMEOUT_SECS` - Optional request timeout

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use clap::{Parser, Subcommand};
use laundry_web::api::LaundryClient;
use laundry_web::config::ApiConfig;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "laundry-cli")]
#[command(author, version, about = "Laundry Desk CLI tools")]
struct Cli {
    /// Laundry backend URL
    #[arg(long, env = "LAUNDRY_API_URL", default_value = "http://127.0.0.1:8000", global = true)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "LAUNDRY_API_TIMEOUT_SECS", global = true)]
    timeout: Option<u64>,

    /// Print raw JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the price of an item
    Price {
        /// Item type, e.g. `Shirt`
        item_type: String,
        /// Number of pieces
        quantity: u32,
    },
    /// Look up an order by ID
    Track {
        /// Order ID
        order_id: String,
    },
    /// List a user's orders, optionally for one month
    History {
        /// User ID
        user_id: String,
        /// Month (1-12)
        #[arg(short, long)]
        month: Option<String>,
        /// Year
        #[arg(short, long)]
        year: Option<String>,
    },
    /// Show admin statistics and orders per month
    Summary,
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads environment defaults
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "laundry_cli=info,laundry_web=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = ApiConfig::from_url(&cli.api_url, cli.timeout.map(Duration::from_secs))?;
    let client = LaundryClient::new(&config)?;
    let output = commands::Output::new(cli.json);

    match cli.command {
        Commands::Price {
            item_type,
            quantity,
        } => commands::price::estimate(&client, &output, &item_type, quantity).await,
        Commands::Track { order_id } => commands::track::lookup(&client, &output, &order_id).await,
        Commands::History {
            user_id,
            month,
            year,
        } => {
            commands::history::list(&client, &output, &user_id, month.as_deref(), year.as_deref())
                .await
        }
        Commands::Summary => commands::summary::show(&client, &output).await,
    }
}
