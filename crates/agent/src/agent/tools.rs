//! Printavo tool definitions and executor for model tool calls.
//!
//! Tools never fail the run: upstream errors come back to the model as JSON
//! values carrying an `error` key.

use std::sync::Arc;

use async_trait::async_trait;
use printavo_agent_core::{Order, Status};
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use crate::llm::{ToolDefinition, ToolInvoker};
use crate::printavo::{DEFAULT_PAGE_SIZE, OrderSource};

/// Get the list of Printavo tools available to the model.
#[must_use]
pub fn printavo_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_orders".to_string(),
            description: "Search Printavo orders. Returns order summaries including visual ID, \
                date, status, customer, and total. Completed orders and quotes are excluded \
                unless the flags are set to false."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Free-text search (customer name, order nickname, etc.). Empty for recent orders."
                    },
                    "exclude_completed": {
                        "type": "boolean",
                        "description": "Exclude completed orders (default true)"
                    },
                    "exclude_quotes": {
                        "type": "boolean",
                        "description": "Exclude quotes (default true)"
                    }
                }
            }),
        },
        ToolDefinition {
            name: "get_order_by_visual_id".to_string(),
            description: "Get a single order by its visual ID, the short number shown to \
                customers (e.g., '1234')."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "visual_id": {
                        "type": "string",
                        "description": "The order's visual ID"
                    }
                },
                "required": ["visual_id"]
            }),
        },
        ToolDefinition {
            name: "get_statuses".to_string(),
            description: "List every order status defined in Printavo, with its ID and color."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

/// Executes Printavo tools against an [`OrderSource`].
#[derive(Clone)]
pub struct ToolExecutor {
    source: Arc<dyn OrderSource>,
}

impl ToolExecutor {
    /// Create a new tool executor.
    #[must_use]
    pub fn new(source: Arc<dyn OrderSource>) -> Self {
        Self { source }
    }

    async fn get_orders(&self, input: &Value) -> Value {
        let query = input["query"].as_str().unwrap_or("");
        let exclude_completed = input["exclude_completed"].as_bool().unwrap_or(true);
        let exclude_quotes = input["exclude_quotes"].as_bool().unwrap_or(true);

        match self
            .source
            .search_orders(query, exclude_completed, exclude_quotes, DEFAULT_PAGE_SIZE)
            .await
        {
            Ok(orders) => Value::Array(orders.iter().map(summarize_order).collect()),
            Err(e) => {
                warn!(tool = "get_orders", error = %e, "Tool call failed");
                json!([{ "error": format!("Failed to retrieve orders: {e}") }])
            }
        }
    }

    async fn get_order_by_visual_id(&self, input: &Value) -> Value {
        // Models sometimes send the visual ID as a bare number
        let Some(visual_id) = input["visual_id"]
            .as_str()
            .map(|v| v.trim().to_string())
            .or_else(|| input["visual_id"].as_u64().map(|n| n.to_string()))
            .filter(|v| !v.is_empty())
        else {
            warn!(tool = "get_order_by_visual_id", "Missing visual_id argument");
            return json!({ "error": "Missing required field: visual_id" });
        };

        match self.source.get_order_by_visual_id(&visual_id).await {
            Ok(Some(order)) => summarize_order(&order),
            Ok(None) => json!({ "error": format!("No order found with visual ID: {visual_id}") }),
            Err(e) => {
                warn!(
                    tool = "get_order_by_visual_id",
                    visual_id = %visual_id,
                    error = %e,
                    "Tool call failed"
                );
                json!({ "error": format!("Failed to retrieve order: {e}") })
            }
        }
    }

    async fn get_statuses(&self) -> Value {
        match self.source.list_statuses().await {
            Ok(statuses) => Value::Array(statuses.iter().map(summarize_status).collect()),
            Err(e) => {
                warn!(tool = "get_statuses", error = %e, "Tool call failed");
                json!([{ "error": format!("Failed to retrieve statuses: {e}") }])
            }
        }
    }
}

#[async_trait]
impl ToolInvoker for ToolExecutor {
    #[instrument(skip(self, arguments))]
    async fn invoke(&self, name: &str, arguments: &Value) -> Value {
        match name {
            "get_orders" => self.get_orders(arguments).await,
            "get_order_by_visual_id" => self.get_order_by_visual_id(arguments).await,
            "get_statuses" => self.get_statuses().await,
            _ => {
                warn!(tool = %name, "Unknown tool requested");
                json!({ "error": format!("Unknown tool: {name}") })
            }
        }
    }
}

/// Compact order view handed to the model.
fn summarize_order(order: &Order) -> Value {
    json!({
        "id": order.id,
        "name": order.name,
        "visualId": order.visual_id,
        "date": order.created_at,
        "status": order.status.name,
        "customer": order.customer_name(),
        "total": order.total.to_f64().unwrap_or_default(),
    })
}

fn summarize_status(status: &Status) -> Value {
    json!({
        "id": status.id,
        "name": status.name,
        "color": status.color,
    })
}
