//! Printavo GraphQL API adapter.
//!
//! # Architecture
//!
//! - Hand-written GraphQL documents implementing `graphql_client::GraphQLQuery`
//! - Direct API calls to Printavo (no caching, no local sync)
//! - Two upstream node shapes (`orders` listing vs `invoices` lookup) normalized
//!   into [`Order`](printavo_agent_core::Order) by one conversion per shape
//! - Read-only: no mutations are defined
//!
//! # Example
//!
//! ```rust,ignore
//! use printavo_agent::printavo::PrintavoClient;
//!
//! let client = PrintavoClient::new(&config.printavo);
//!
//! // Open orders matching "tees", excluding completed orders and quotes
//! let orders = client.search_orders("tees", true, true, 10).await?;
//!
//! // A single order by its visual ID
//! let order = client.get_order_by_visual_id("1234").await?;
//! ```

mod client;
mod conversions;
pub mod queries;

pub use client::{DEFAULT_PAGE_SIZE, PrintavoClient, build_search_query};

use async_trait::async_trait;
use printavo_agent_core::{Order, Status};
use thiserror::Error;

/// Errors that can occur when talking to the Printavo API.
///
/// Every variant is an upstream failure: callers either get a complete,
/// normalized result or one of these.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Printavo answered with a non-success status code.
    #[error("Printavo returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response carried neither data nor errors.
    #[error("No data in response")]
    MissingData,

    /// A field could not be normalized (e.g. a non-numeric total).
    #[error("Invalid {field}: {value}")]
    Normalize {
        /// Field that failed.
        field: &'static str,
        /// Offending raw value.
        value: String,
    },

    /// Rate limited by Printavo.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// A GraphQL error returned by the Printavo API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone, Copy)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i32,
    /// Column number (1-indexed).
    pub column: i32,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(error: graphql_client::Error) -> Self {
        Self {
            message: error.message,
            locations: error
                .locations
                .unwrap_or_default()
                .into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: l.line,
                    column: l.column,
                })
                .collect(),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Read-only order data source.
///
/// Implemented by [`PrintavoClient`]; the agent's tools depend on this trait
/// so the upstream API can be replaced in tests.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Search orders by free text, optionally excluding completed orders and quotes.
    async fn search_orders(
        &self,
        query: &str,
        exclude_completed: bool,
        exclude_quotes: bool,
        page_size: i64,
    ) -> Result<Vec<Order>, UpstreamError>;

    /// Look up a single order by its visual ID. `None` when nothing matches.
    async fn get_order_by_visual_id(&self, visual_id: &str)
    -> Result<Option<Order>, UpstreamError>;

    /// List every status defined on the account.
    async fn list_statuses(&self) -> Result<Vec<Status>, UpstreamError>;
}
