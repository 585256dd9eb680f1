//! Order agent orchestration.
//!
//! The [`OrderAgent`] owns one immutable [`AgentDefinition`] built at startup
//! and answers each query independently:
//!
//! 1. Augment the query with the caller's filter preferences
//! 2. Run the agent (the runtime calls Printavo tools as the model asks)
//! 3. Shape the result (or the failure) into an [`AgentOutcome`]

mod prompt;
mod tools;

pub use prompt::{augment_query, render_instructions};
pub use tools::{ToolExecutor, printavo_tools};

use std::sync::Arc;
use std::time::Instant;

use printavo_agent_core::{AgentResponse, AgentResponseData, TokenUsage};
use tracing::{error, info, instrument};

use crate::llm::{AgentDefinition, AgentRuntime, ToolInvoker};
use crate::printavo::OrderSource;

/// Name the agent reports in health checks.
pub const AGENT_NAME: &str = "PrintavoAgent";

/// Result of one [`OrderAgent::process_query`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    /// The model produced a final answer.
    Success {
        /// Final answer text.
        response: String,
        /// Token usage, when the provider reported it.
        usage: Option<TokenUsage>,
        /// Wall-clock seconds spent on the query.
        elapsed_seconds: f64,
    },
    /// The run failed; the query was not answered.
    Failure {
        /// User-visible error message.
        error: String,
        /// Wall-clock seconds spent before failing.
        elapsed_seconds: f64,
    },
}

impl AgentOutcome {
    /// Seconds spent on the query.
    #[must_use]
    pub const fn elapsed_seconds(&self) -> f64 {
        match self {
            Self::Success {
                elapsed_seconds, ..
            }
            | Self::Failure {
                elapsed_seconds, ..
            } => *elapsed_seconds,
        }
    }
}

impl From<AgentOutcome> for AgentResponse {
    fn from(outcome: AgentOutcome) -> Self {
        match outcome {
            AgentOutcome::Success {
                response,
                usage,
                elapsed_seconds,
            } => Self::success(AgentResponseData {
                response,
                elapsed_time: elapsed_seconds,
                usage,
            }),
            AgentOutcome::Failure { error, .. } => Self::failure(error),
        }
    }
}

/// Answers natural-language questions about Printavo orders.
///
/// Cheap to clone; the definition and collaborators are shared.
#[derive(Clone)]
pub struct OrderAgent {
    definition: Arc<AgentDefinition>,
    runtime: Arc<dyn AgentRuntime>,
    tools: Arc<dyn ToolInvoker>,
}

impl OrderAgent {
    /// Build the Printavo agent over an order source.
    #[must_use]
    pub fn new(model: &str, runtime: Arc<dyn AgentRuntime>, source: Arc<dyn OrderSource>) -> Self {
        let definition = AgentDefinition {
            name: AGENT_NAME.to_string(),
            instructions: render_instructions(),
            model: model.to_string(),
            tools: printavo_tools(),
        };
        Self::from_parts(definition, runtime, Arc::new(ToolExecutor::new(source)))
    }

    /// Assemble an agent from an explicit definition and tool invoker.
    #[must_use]
    pub fn from_parts(
        definition: AgentDefinition,
        runtime: Arc<dyn AgentRuntime>,
        tools: Arc<dyn ToolInvoker>,
    ) -> Self {
        Self {
            definition: Arc::new(definition),
            runtime,
            tools,
        }
    }

    /// The agent definition.
    #[must_use]
    pub fn definition(&self) -> &AgentDefinition {
        &self.definition
    }

    /// Agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Answer one query. Never fails: errors become [`AgentOutcome::Failure`].
    #[instrument(
        skip(self, query),
        fields(agent = %self.definition.name, query_len = query.len())
    )]
    pub async fn process_query(
        &self,
        query: &str,
        exclude_completed: bool,
        exclude_quotes: bool,
    ) -> AgentOutcome {
        let started = Instant::now();
        let prompt = augment_query(query, exclude_completed, exclude_quotes);

        let result = self
            .runtime
            .run(&self.definition, self.tools.as_ref(), &prompt)
            .await;
        let elapsed_seconds = started.elapsed().as_secs_f64();

        match result {
            Ok(output) => {
                info!(
                    elapsed_seconds,
                    total_tokens = output.usage.map(|u| u.total_tokens),
                    "Query processed"
                );
                AgentOutcome::Success {
                    response: output.final_output,
                    usage: output.usage,
                    elapsed_seconds,
                }
            }
            Err(e) => {
                error!(error = %e, elapsed_seconds, "Failed to process query");
                AgentOutcome::Failure {
                    error: format!("Failed to process query: {e}"),
                    elapsed_seconds,
                }
            }
        }
    }
}
