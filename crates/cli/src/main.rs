//! Printavo agent CLI - smoke tests for the service and the Printavo API.
//!
//! # Usage
//!
//! ```bash
//! # Ask the running service a question
//! pa-cli query "Show me recent orders"
//!
//! # Include completed orders and quotes
//! pa-cli query "Orders for Acme" --include-completed --include-quotes
//!
//! # Check the service is up
//! pa-cli health --url http://localhost:8000
//!
//! # Call Printavo directly (credentials from the environment)
//! pa-cli orders "tees"
//! pa-cli order 1234
//! pa-cli statuses
//! ```
//!
//! # Commands
//!
//! - `query` - POST a query to `/api/agent`
//! - `health` - GET `/api/health`
//! - `orders`, `order`, `statuses` - Printavo adapter calls, no agent involved

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

/// Default service URL.
const DEFAULT_URL: &str = "http://localhost:8000";

#[derive(Parser)]
#[command(name = "pa-cli")]
#[command(author, version, about = "Printavo agent CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a natural-language query to the agent service
    Query {
        /// The question to ask
        text: String,

        /// Include completed orders
        #[arg(long)]
        include_completed: bool,

        /// Include quotes
        #[arg(long)]
        include_quotes: bool,

        /// Service base URL
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
    },
    /// Check the agent service health endpoint
    Health {
        /// Service base URL
        #[arg(long, default_value = DEFAULT_URL)]
        url: String,
    },
    /// Search Printavo orders directly
    Orders {
        /// Free-text search
        #[arg(default_value = "")]
        text: String,

        /// Include completed orders
        #[arg(long)]
        include_completed: bool,

        /// Include quotes
        #[arg(long)]
        include_quotes: bool,
    },
    /// Look up one Printavo order by visual ID
    Order {
        /// The order's visual ID
        visual_id: String,
    },
    /// List Printavo statuses
    Statuses,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Query {
            text,
            include_completed,
            include_quotes,
            url,
        } => commands::service::query(&url, &text, !include_completed, !include_quotes).await?,
        Commands::Health { url } => commands::service::health(&url).await?,
        Commands::Orders {
            text,
            include_completed,
            include_quotes,
        } => commands::printavo::orders(&text, !include_completed, !include_quotes).await?,
        Commands::Order { visual_id } => commands::printavo::order(&visual_id).await?,
        Commands::Statuses => commands::printavo::statuses().await?,
    }
    Ok(())
}
