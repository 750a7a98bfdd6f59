//! Bridge from rig's `CompletionModel` to our `LlmProvider`.

use std::time::Duration;

use async_trait::async_trait;
use rig::completion::{AssistantContent, CompletionError, CompletionModel, Message};
use tracing::debug;

use crate::error::LlmError;
use crate::llm::provider::{ChatMessage, CompletionRequest, CompletionResponse, LlmProvider, Role};

/// Used when a request does not set `max_tokens`; Anthropic requires one.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Wraps any rig completion model behind the `LlmProvider` trait.
pub struct RigAdapter<M> {
    model: M,
    model_name: String,
    provider: &'static str,
    timeout: Duration,
}

impl<M: CompletionModel> RigAdapter<M> {
    pub fn new(model: M, model_name: &str, provider: &'static str, timeout: Duration) -> Self {
        Self {
            model,
            model_name: model_name.to_string(),
            provider,
            timeout,
        }
    }
}

/// A request in rig's shape: preamble, prior turns, final prompt.
#[derive(Debug, PartialEq)]
struct RigParts {
    preamble: Option<String>,
    history: Vec<ChatMessage>,
    prompt: String,
}

/// System turns become the preamble; the last user turn is the prompt.
fn split_messages(messages: &[ChatMessage]) -> Option<RigParts> {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let mut turns: Vec<ChatMessage> = messages
        .iter()
        .filter(|m| m.role != Role::System)
        .cloned()
        .collect();
    let prompt = match turns.pop() {
        Some(last) if last.role == Role::User => last.content,
        _ => return None,
    };

    Some(RigParts {
        preamble: (!system.is_empty()).then(|| system.join("\n\n")),
        history: turns,
        prompt,
    })
}

fn to_rig_message(message: ChatMessage) -> Message {
    match message.role {
        Role::Assistant => Message::assistant(message.content),
        Role::User | Role::System => Message::user(message.content),
    }
}

fn map_completion_error(provider: &str, error: CompletionError) -> LlmError {
    let reason = error.to_string();
    let lowered = reason.to_lowercase();
    if lowered.contains("rate_limit") || lowered.contains("rate limit") || lowered.contains("429") {
        LlmError::RateLimited {
            provider: provider.to_string(),
        }
    } else if lowered.contains("authentication") || lowered.contains("401") {
        LlmError::AuthFailed {
            provider: provider.to_string(),
        }
    } else {
        LlmError::RequestFailed {
            provider: provider.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl<M> LlmProvider for RigAdapter<M>
where
    M: CompletionModel + Send + Sync + 'static,
{
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let parts =
            split_messages(&request.messages).ok_or_else(|| LlmError::RequestFailed {
                provider: self.provider.to_string(),
                reason: "Request must end with a user message".to_string(),
            })?;

        let mut builder = self
            .model
            .completion_request(Message::user(parts.prompt))
            .messages(parts.history.into_iter().map(to_rig_message).collect())
            .max_tokens(u64::from(request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)));
        if let Some(preamble) = parts.preamble {
            builder = builder.preamble(preamble);
        }
        if let Some(temperature) = request.temperature {
            builder = builder.temperature(f64::from(temperature));
        }

        let response = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| LlmError::RequestFailed {
                provider: self.provider.to_string(),
                reason: format!("Request timed out after {:?}", self.timeout),
            })?
            .map_err(|e| map_completion_error(self.provider, e))?;

        let content = response
            .choice
            .iter()
            .find_map(|content| match content {
                AssistantContent::Text(text) => Some(text.text.clone()),
                _ => None,
            })
            .ok_or_else(|| LlmError::InvalidResponse {
                provider: self.provider.to_string(),
                reason: "No text block in response".to_string(),
            })?;

        debug!(
            model = %self.model_name,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Completion received"
        );

        Ok(CompletionResponse {
            content,
            input_tokens: u32::try_from(response.usage.input_tokens).unwrap_or(u32::MAX),
            output_tokens: u32::try_from(response.usage.output_tokens).unwrap_or(u32::MAX),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_turns_become_preamble() {
        let parts = split_messages(&[
            ChatMessage::system("You are Ren."),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello!"),
            ChatMessage::system("Keep it short."),
            ChatMessage::user("how are you?"),
        ])
        .unwrap();

        assert_eq!(
            parts.preamble.as_deref(),
            Some("You are Ren.\n\nKeep it short.")
        );
        assert_eq!(
            parts.history,
            vec![ChatMessage::user("hi"), ChatMessage::assistant("hello!")]
        );
        assert_eq!(parts.prompt, "how are you?");
    }

    #[test]
    fn no_preamble_without_system_turns() {
        let parts = split_messages(&[ChatMessage::user("hi")]).unwrap();
        assert!(parts.preamble.is_none());
        assert!(parts.history.is_empty());
    }

    #[test]
    fn request_must_end_with_user_turn() {
        assert!(split_messages(&[]).is_none());
        assert!(split_messages(&[ChatMessage::system("only system")]).is_none());
        assert!(
            split_messages(&[ChatMessage::user("hi"), ChatMessage::assistant("hey")]).is_none()
        );
    }

    #[test]
    fn provider_errors_map_to_llm_errors() {
        let err = map_completion_error(
            "anthropic",
            CompletionError::ProviderError("rate_limit_error: slow down".into()),
        );
        assert!(matches!(err, LlmError::RateLimited { .. }));

        let err = map_completion_error(
            "anthropic",
            CompletionError::ProviderError("authentication_error: invalid x-api-key".into()),
        );
        assert!(matches!(err, LlmError::AuthFailed { .. }));

        let err = map_completion_error(
            "anthropic",
            CompletionError::ProviderError("overloaded_error".into()),
        );
        assert!(matches!(err, LlmError::RequestFailed { .. }));
    }
}
