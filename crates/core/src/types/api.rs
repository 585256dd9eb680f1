//! Request and response envelopes for the agent HTTP API.
//!
//! Shared by the service (which produces them) and the CLI (which consumes
//! them), so both sides agree on the wire shape.

use serde::{Deserialize, Serialize};

use super::usage::TokenUsage;

const fn default_true() -> bool {
    true
}

/// Body of `POST /api/agent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRequest {
    /// The natural-language query to process.
    pub query: String,
    /// Whether completed orders should be excluded.
    #[serde(default = "default_true")]
    pub exclude_completed: bool,
    /// Whether quotes should be excluded.
    #[serde(default = "default_true")]
    pub exclude_quotes: bool,
}

/// Envelope returned by `POST /api/agent`.
///
/// Exactly one of `error` and `data` is set. Both are always serialized
/// (as `null` when unset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Whether the query was answered.
    pub success: bool,
    /// Error message when the query failed.
    pub error: Option<String>,
    /// Agent output when the query succeeded.
    pub data: Option<AgentResponseData>,
}

/// Successful agent output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponseData {
    /// The agent's final answer.
    pub response: String,
    /// Wall-clock processing time in seconds.
    pub elapsed_time: f64,
    /// Token usage, when the provider reported it.
    pub usage: Option<TokenUsage>,
}

impl AgentResponse {
    /// Build a successful envelope.
    #[must_use]
    pub const fn success(data: AgentResponseData) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    /// Build a failed envelope.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            data: None,
        }
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Service version.
    pub version: String,
    /// `"development"` or `"production"`.
    pub environment: String,
    /// Name of the agent answering queries.
    pub agent: String,
}
