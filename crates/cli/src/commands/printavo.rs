//! Direct Printavo API commands (no agent, no model calls).
//!
//! # Environment Variables
//!
//! - `PRINTAVO_EMAIL` - Printavo account email
//! - `PRINTAVO_TOKEN` - Printavo API token
//! - `PRINTAVO_API_URL` - Printavo API base URL (optional)

use printavo_agent::config::PrintavoConfig;
use printavo_agent::printavo::{DEFAULT_PAGE_SIZE, PrintavoClient};

use super::{CliError, print_json};

fn client() -> Result<PrintavoClient, CliError> {
    let config = PrintavoConfig::from_env()?;
    tracing::info!(endpoint = %config.graphql_endpoint(), "Using Printavo API");
    Ok(PrintavoClient::new(&config))
}

/// Search orders and print the normalized records.
pub async fn orders(text: &str, exclude_completed: bool, exclude_quotes: bool) -> Result<(), CliError> {
    let orders = client()?
        .search_orders(text, exclude_completed, exclude_quotes, DEFAULT_PAGE_SIZE)
        .await?;

    tracing::info!(count = orders.len(), "Orders retrieved");
    print_json(&orders)
}

/// Look up one order by visual ID and print it (or `null`).
pub async fn order(visual_id: &str) -> Result<(), CliError> {
    let order = client()?.get_order_by_visual_id(visual_id).await?;

    if order.is_none() {
        tracing::warn!(visual_id, "No order found");
    }
    print_json(&order)
}

/// List statuses and print them.
pub async fn statuses() -> Result<(), CliError> {
    let statuses = client()?.list_statuses().await?;

    tracing::info!(count = statuses.len(), "Statuses retrieved");
    print_json(&statuses)
}
