//! Tool-calling loop over a chat model.

use async_trait::async_trait;
use printavo_agent_core::TokenUsage;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

use super::types::{ChatCompletionRequest, ChatMessage, ChatTool, ToolCall};
use super::{AgentDefinition, AgentRuntime, ChatModel, LlmError, RunOutput, ToolInvoker};

/// Maximum number of model turns in one run.
pub const MAX_TURNS: usize = 10;

/// Production [`AgentRuntime`]: alternates model calls and tool calls until
/// the model answers without requesting tools.
#[derive(Debug, Clone)]
pub struct ToolLoopRuntime<M> {
    model: M,
}

impl<M: ChatModel> ToolLoopRuntime<M> {
    /// Wrap a chat model.
    #[must_use]
    pub const fn new(model: M) -> Self {
        Self { model }
    }
}

#[async_trait]
impl<M: ChatModel> AgentRuntime for ToolLoopRuntime<M> {
    #[instrument(skip_all, fields(agent = %agent.name, model = %agent.model))]
    async fn run(
        &self,
        agent: &AgentDefinition,
        tools: &dyn ToolInvoker,
        input: &str,
    ) -> Result<RunOutput, LlmError> {
        let chat_tools: Vec<ChatTool> = agent.tools.iter().map(|t| t.to_chat_tool()).collect();
        let mut messages = vec![
            ChatMessage::System {
                content: agent.instructions.clone(),
            },
            ChatMessage::User {
                content: input.to_string(),
            },
        ];
        let mut usage: Option<TokenUsage> = None;

        for turn in 1..=MAX_TURNS {
            let response = self
                .model
                .complete(ChatCompletionRequest {
                    model: agent.model.clone(),
                    messages: messages.clone(),
                    tools: chat_tools.clone(),
                })
                .await?;

            if let Some(turn_usage) = response.usage {
                let turn_usage = TokenUsage::from(turn_usage);
                usage = Some(usage.map_or(turn_usage, |u| u.combine(turn_usage)));
            }

            let choice = response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| LlmError::Parse("Response contained no choices".to_string()))?;

            info!(
                turn,
                finish_reason = ?choice.finish_reason,
                "Model response received"
            );

            let tool_calls = choice.message.tool_calls.unwrap_or_default();
            if tool_calls.is_empty() {
                return Ok(RunOutput {
                    final_output: choice.message.content.unwrap_or_default(),
                    usage,
                });
            }

            // Results of a final-turn tool call could never reach the model
            if turn == MAX_TURNS {
                break;
            }

            messages.push(ChatMessage::Assistant {
                content: choice.message.content,
                tool_calls: tool_calls.clone(),
            });

            for call in tool_calls {
                let result = dispatch(tools, &call).await;
                messages.push(ChatMessage::Tool {
                    tool_call_id: call.id,
                    content: result.to_string(),
                });
            }
        }

        warn!(max_turns = MAX_TURNS, "Too many model turns, stopping");
        Err(LlmError::MaxTurnsExceeded(MAX_TURNS))
    }
}

/// Run one tool call. Unparseable arguments go back to the model as an error.
async fn dispatch(tools: &dyn ToolInvoker, call: &ToolCall) -> Value {
    let raw = call.function.arguments.trim();
    let parsed = if raw.is_empty() {
        Ok(json!({}))
    } else {
        serde_json::from_str::<Value>(raw)
    };

    match parsed {
        Ok(arguments) => {
            debug!(tool = %call.function.name, "Executing tool");
            tools.invoke(&call.function.name, &arguments).await
        }
        Err(e) => {
            warn!(tool = %call.function.name, error = %e, "Malformed tool arguments");
            json!({ "error": format!("Invalid arguments for {}: {e}", call.function.name) })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::llm::ToolDefinition;
    use crate::llm::types::ChatCompletionResponse;

    /// Chat model that replays queued responses and records requests.
    struct ScriptedModel {
        responses: Mutex<VecDeque<ChatCompletionResponse>>,
        requests: Mutex<Vec<ChatCompletionRequest>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Value>) -> Self {
            Self {
                responses: Mutex::new(
                    responses
                        .into_iter()
                        .map(|v| serde_json::from_value(v).unwrap())
                        .collect(),
                ),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ChatCompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(
            &self,
            request: ChatCompletionRequest,
        ) -> Result<ChatCompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::Parse("script exhausted".to_string()))
        }
    }

    /// Tool invoker that echoes its input and records calls.
    #[derive(Default)]
    struct EchoTools {
        calls: Mutex<Vec<(String, Value)>>,
    }

    #[async_trait]
    impl ToolInvoker for EchoTools {
        async fn invoke(&self, name: &str, arguments: &Value) -> Value {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), arguments.clone()));
            json!({ "tool": name, "echo": arguments })
        }
    }

    fn agent() -> AgentDefinition {
        AgentDefinition {
            name: "TestAgent".to_string(),
            instructions: "You help with orders.".to_string(),
            model: "gpt-4o".to_string(),
            tools: vec![ToolDefinition {
                name: "get_statuses".to_string(),
                description: "List statuses".to_string(),
                parameters: json!({"type": "object", "properties": {}}),
            }],
        }
    }

    fn final_answer(text: &str, usage: Option<(u32, u32)>) -> Value {
        let mut response = json!({
            "choices": [{
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        });
        if let Some((prompt, completion)) = usage {
            response["usage"] = json!({
                "prompt_tokens": prompt,
                "completion_tokens": completion,
                "total_tokens": prompt + completion
            });
        }
        response
    }

    fn tool_request(id: &str, name: &str, arguments: &str, usage: (u32, u32)) -> Value {
        json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": id,
                        "type": "function",
                        "function": {"name": name, "arguments": arguments}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {
                "prompt_tokens": usage.0,
                "completion_tokens": usage.1,
                "total_tokens": usage.0 + usage.1
            }
        })
    }

    #[tokio::test]
    async fn test_direct_answer_single_turn() {
        let model = ScriptedModel::new(vec![final_answer("Hello!", Some((100, 50)))]);
        let runtime = ToolLoopRuntime::new(model);
        let tools = EchoTools::default();

        let output = runtime.run(&agent(), &tools, "hi").await.unwrap();

        assert_eq!(output.final_output, "Hello!");
        assert_eq!(output.usage.unwrap().total_tokens, 150);
        assert!(tools.calls.lock().unwrap().is_empty());

        let requests = runtime.model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].messages[0],
            ChatMessage::System {
                content: "You help with orders.".to_string()
            }
        );
        assert_eq!(
            requests[0].messages[1],
            ChatMessage::User {
                content: "hi".to_string()
            }
        );
        assert_eq!(requests[0].tools.len(), 1);
    }

    #[tokio::test]
    async fn test_tool_call_result_fed_back_to_model() {
        let model = ScriptedModel::new(vec![
            tool_request("call_1", "get_statuses", "{}", (40, 10)),
            final_answer("There are 3 statuses.", Some((60, 20))),
        ]);
        let runtime = ToolLoopRuntime::new(model);
        let tools = EchoTools::default();

        let output = runtime.run(&agent(), &tools, "statuses?").await.unwrap();

        assert_eq!(output.final_output, "There are 3 statuses.");
        let usage = output.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 100);
        assert_eq!(usage.completion_tokens, 30);
        assert_eq!(usage.total_tokens, 130);

        let calls = tools.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![("get_statuses".to_string(), json!({}))]);

        let requests = runtime.model.requests();
        assert_eq!(requests.len(), 2);
        let second = &requests[1].messages;
        assert_eq!(second.len(), 4);
        assert!(matches!(&second[2], ChatMessage::Assistant { tool_calls, .. } if tool_calls.len() == 1));
        match &second[3] {
            ChatMessage::Tool {
                tool_call_id,
                content,
            } => {
                assert_eq!(tool_call_id, "call_1");
                let value: Value = serde_json::from_str(content).unwrap();
                assert_eq!(value["tool"], "get_statuses");
            }
            other => panic!("expected tool message, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_arguments_reported_in_band() {
        let model = ScriptedModel::new(vec![
            tool_request("call_1", "get_statuses", "{not json", (1, 1)),
            final_answer("Sorry.", None),
        ]);
        let runtime = ToolLoopRuntime::new(model);
        let tools = EchoTools::default();

        let output = runtime.run(&agent(), &tools, "x").await.unwrap();

        assert_eq!(output.final_output, "Sorry.");
        assert!(tools.calls.lock().unwrap().is_empty());

        let requests = runtime.model.requests();
        match &requests[1].messages[3] {
            ChatMessage::Tool { content, .. } => {
                assert!(content.contains("Invalid arguments for get_statuses"));
            }
            other => panic!("expected tool message, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_usage_absent_when_never_reported() {
        let model = ScriptedModel::new(vec![final_answer("ok", None)]);
        let runtime = ToolLoopRuntime::new(model);

        let output = runtime
            .run(&agent(), &EchoTools::default(), "x")
            .await
            .unwrap();

        assert!(output.usage.is_none());
    }

    #[tokio::test]
    async fn test_turn_limit_exceeded() {
        let script = (0..MAX_TURNS)
            .map(|i| tool_request(&format!("call_{i}"), "get_statuses", "", (1, 1)))
            .collect();
        let model = ScriptedModel::new(script);
        let runtime = ToolLoopRuntime::new(model);
        let tools = EchoTools::default();

        let err = runtime.run(&agent(), &tools, "loop").await.unwrap_err();

        assert!(matches!(err, LlmError::MaxTurnsExceeded(MAX_TURNS)));
        assert_eq!(runtime.model.requests().len(), MAX_TURNS);
        // The last turn's tool request is not executed
        assert_eq!(tools.calls.lock().unwrap().len(), MAX_TURNS - 1);
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let model = ScriptedModel::new(vec![]);
        let runtime = ToolLoopRuntime::new(model);

        let err = runtime
            .run(&agent(), &EchoTools::default(), "x")
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_is_parse_error() {
        let model = ScriptedModel::new(vec![json!({"choices": []})]);
        let runtime = ToolLoopRuntime::new(model);

        let err = runtime
            .run(&agent(), &EchoTools::default(), "x")
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Parse(ref m) if m == "Response contained no choices"));
    }
}
