//! Language-model integration.
//!
//! # Layers
//!
//! - [`AgentRuntime`]: runs an [`AgentDefinition`] against one user input and
//!   returns the final answer. The orchestrator only sees this trait.
//! - [`ToolLoopRuntime`]: the production runtime. Calls a [`ChatModel`],
//!   dispatches requested tool calls to a [`ToolInvoker`], and loops until the
//!   model answers.
//! - [`OpenAiClient`]: [`ChatModel`] over the `OpenAI` Chat Completions API.

mod client;
mod error;
mod runtime;
pub mod types;

pub use client::OpenAiClient;
pub use error::{ApiError, ApiErrorResponse, LlmError};
pub use runtime::{MAX_TURNS, ToolLoopRuntime};

use async_trait::async_trait;
use printavo_agent_core::TokenUsage;
use serde_json::Value;

use types::{ChatCompletionRequest, ChatCompletionResponse, ChatTool, FunctionDefinition};

/// A tool the model may call.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    /// Function name.
    pub name: String,
    /// What the tool does, shown to the model.
    pub description: String,
    /// JSON Schema for the arguments.
    pub parameters: Value,
}

impl ToolDefinition {
    fn to_chat_tool(&self) -> ChatTool {
        ChatTool {
            tool_type: "function",
            function: FunctionDefinition {
                name: self.name.clone(),
                description: self.description.clone(),
                parameters: self.parameters.clone(),
            },
        }
    }
}

/// Everything the runtime needs to know about an agent.
#[derive(Debug, Clone)]
pub struct AgentDefinition {
    /// Agent name (reported by the health endpoint).
    pub name: String,
    /// System instructions.
    pub instructions: String,
    /// Model ID.
    pub model: String,
    /// Tools the agent may call.
    pub tools: Vec<ToolDefinition>,
}

/// Final result of one agent run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// The model's final answer.
    pub final_output: String,
    /// Usage summed over every model turn, if any turn reported it.
    pub usage: Option<TokenUsage>,
}

/// Executes tool calls on behalf of the model.
///
/// Implementations never fail: errors are reported inside the returned JSON
/// value so the model can read them.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Run the named tool with the given JSON arguments.
    async fn invoke(&self, name: &str, arguments: &Value) -> Value;
}

/// Runs an agent to completion.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Run `agent` on `input`, letting it call tools through `tools`.
    async fn run(
        &self,
        agent: &AgentDefinition,
        tools: &dyn ToolInvoker,
        input: &str,
    ) -> Result<RunOutput, LlmError>;
}

/// A single chat completion call.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one request and return the provider's response.
    async fn complete(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError>;
}
