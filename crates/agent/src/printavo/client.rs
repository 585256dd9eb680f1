//! Printavo GraphQL client.

use std::sync::Arc;

use async_trait::async_trait;
use graphql_client::GraphQLQuery;
use printavo_agent_core::{Order, Status};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};

use super::conversions::{convert_status, order_from_invoice, order_from_listing};
use super::queries::{
    GetOrderByVisualId, GetStatuses, SearchOrders, get_order_by_visual_id, get_statuses,
    search_orders,
};
use super::{GraphQLError, OrderSource, UpstreamError};
use crate::config::PrintavoConfig;

/// Number of orders requested when the caller does not choose.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Search token excluding completed orders.
const EXCLUDE_COMPLETED_TOKEN: &str = "-status:completed";

/// Search token excluding quotes.
const EXCLUDE_QUOTES_TOKEN: &str = "-status:quote";

/// Default retry delay when Printavo omits `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Build the composite search string sent to Printavo.
///
/// Filter tokens are appended to the free text, then the whole string is
/// trimmed, so an empty query with both filters yields just the tokens.
#[must_use]
pub fn build_search_query(query: &str, exclude_completed: bool, exclude_quotes: bool) -> String {
    let mut search = query.to_string();
    if exclude_completed {
        search.push(' ');
        search.push_str(EXCLUDE_COMPLETED_TOKEN);
    }
    if exclude_quotes {
        search.push(' ');
        search.push_str(EXCLUDE_QUOTES_TOKEN);
    }
    search.trim().to_string()
}

/// Client for the Printavo GraphQL API.
///
/// Cheap to clone; all clones share one HTTP connection pool.
#[derive(Clone)]
pub struct PrintavoClient {
    inner: Arc<PrintavoClientInner>,
}

struct PrintavoClientInner {
    client: reqwest::Client,
    endpoint: String,
    email: String,
    token: SecretString,
}

impl std::fmt::Debug for PrintavoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintavoClient")
            .field("endpoint", &self.inner.endpoint)
            .field("email", &self.inner.email)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl PrintavoClient {
    /// Create a new Printavo client.
    #[must_use]
    pub fn new(config: &PrintavoConfig) -> Self {
        Self {
            inner: Arc::new(PrintavoClientInner {
                client: reqwest::Client::new(),
                endpoint: config.graphql_endpoint(),
                email: config.email.clone(),
                token: config.token.clone(),
            }),
        }
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL query.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, UpstreamError> {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("Content-Type", "application/json")
            .header("email", &self.inner.email)
            .header("token", self.inner.token.expose_secret())
            .json(&body)
            .send()
            .await?;

        // Check for rate limiting
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(UpstreamError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(UpstreamError::Unauthorized(
                "Invalid Printavo email or token".to_string(),
            ));
        }

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let graphql_response: graphql_client::Response<Q::ResponseData> =
            serde_json::from_str(&text)?;

        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            return Err(UpstreamError::GraphQL(
                errors.into_iter().map(GraphQLError::from).collect(),
            ));
        }

        graphql_response.data.ok_or(UpstreamError::MissingData)
    }

    // =========================================================================
    // Order methods
    // =========================================================================

    /// Search orders by free text.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError` on transport failure, a non-success status,
    /// GraphQL errors, or a record that cannot be normalized.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn search_orders(
        &self,
        query: &str,
        exclude_completed: bool,
        exclude_quotes: bool,
        page_size: i64,
    ) -> Result<Vec<Order>, UpstreamError> {
        let search = build_search_query(query, exclude_completed, exclude_quotes);
        debug!(search = %search, "Searching Printavo orders");

        self.execute::<SearchOrders>(search_orders::Variables {
            query: search,
            first: page_size,
        })
        .await
        .and_then(|data| {
            data.orders
                .map(|c| c.into_nodes().map(order_from_listing).collect())
                .unwrap_or_else(|| Ok(Vec::new()))
        })
        .inspect_err(|e| error!(operation = "search_orders", error = %e, "Printavo query failed"))
    }

    /// Look up a single order by its visual ID.
    ///
    /// Returns `Ok(None)` when no invoice matches.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError` on transport failure, a non-success status,
    /// GraphQL errors, or a record that cannot be normalized.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn get_order_by_visual_id(
        &self,
        visual_id: &str,
    ) -> Result<Option<Order>, UpstreamError> {
        let visual_id = visual_id.trim();

        self.execute::<GetOrderByVisualId>(get_order_by_visual_id::Variables {
            query: visual_id.to_string(),
        })
        .await
        .and_then(|data| {
            data.invoices
                .and_then(|c| c.into_nodes().next())
                .map(order_from_invoice)
                .transpose()
        })
        .inspect_err(|e| {
            error!(operation = "get_order_by_visual_id", error = %e, "Printavo query failed");
        })
    }

    /// List all statuses defined on the account.
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError` on transport failure, a non-success status,
    /// or GraphQL errors.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn list_statuses(&self) -> Result<Vec<Status>, UpstreamError> {
        let data = self
            .execute::<GetStatuses>(get_statuses::Variables {})
            .await
            .inspect_err(|e| error!(operation = "list_statuses", error = %e, "Printavo query failed"))?;

        Ok(data
            .statuses
            .map(|c| c.into_nodes().map(convert_status).collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl OrderSource for PrintavoClient {
    async fn search_orders(
        &self,
        query: &str,
        exclude_completed: bool,
        exclude_quotes: bool,
        page_size: i64,
    ) -> Result<Vec<Order>, UpstreamError> {
        Self::search_orders(self, query, exclude_completed, exclude_quotes, page_size).await
    }

    async fn get_order_by_visual_id(
        &self,
        visual_id: &str,
    ) -> Result<Option<Order>, UpstreamError> {
        Self::get_order_by_visual_id(self, visual_id).await
    }

    async fn list_statuses(&self) -> Result<Vec<Status>, UpstreamError> {
        Self::list_statuses(self).await
    }
}
