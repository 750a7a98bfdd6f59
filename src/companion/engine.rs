//! Companion engine: voices a persona through the LLM.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::LlmError;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider, Role};
use crate::persona::Persona;
use crate::sentiment::SentimentLabel;

use super::prompts::{PROACTIVE_OPENER, build_chat_system_prompt, build_proactive_system_prompt};

/// Generation settings for companion messages.
#[derive(Debug, Clone)]
pub struct CompanionConfig {
    pub chat_max_tokens: u32,
    pub proactive_max_tokens: u32,
    pub temperature: f32,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            chat_max_tokens: 1024,
            proactive_max_tokens: 512,
            temperature: 0.7,
        }
    }
}

pub struct CompanionEngine {
    llm: Arc<dyn LlmProvider>,
    config: CompanionConfig,
}

impl CompanionEngine {
    pub fn new(llm: Arc<dyn LlmProvider>, config: CompanionConfig) -> Self {
        Self { llm, config }
    }

    /// Reply to `user_message` in the persona's voice.
    ///
    /// `history` is the prior conversation, oldest first. System turns in it
    /// are ignored.
    pub async fn reply(
        &self,
        persona: &Persona,
        history: &[ChatMessage],
        user_message: &str,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(build_chat_system_prompt(persona)));
        messages.extend(
            history
                .iter()
                .filter(|m| m.role != Role::System)
                .cloned(),
        );
        messages.push(ChatMessage::user(user_message));

        debug!(
            persona = %persona.name,
            history = history.len(),
            "Generating companion reply"
        );

        let request = CompletionRequest::new(messages)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.chat_max_tokens);

        let response = self.llm.complete(request).await?;
        non_empty(response.content, self.llm.model_name())
    }

    /// Short, unprompted check-in about a flagged post.
    pub async fn proactive_message(
        &self,
        persona: &Persona,
        post: &str,
        platform: &str,
        label: SentimentLabel,
    ) -> Result<String, LlmError> {
        info!(
            persona = %persona.name,
            platform,
            label = %label,
            "Generating proactive message"
        );

        let request = CompletionRequest::new(vec![
            ChatMessage::system(build_proactive_system_prompt(persona, post, platform, label)),
            ChatMessage::user(PROACTIVE_OPENER),
        ])
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.proactive_max_tokens);

        let response = self.llm.complete(request).await?;
        non_empty(response.content, self.llm.model_name())
    }
}

fn non_empty(content: String, provider: &str) -> Result<String, LlmError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(LlmError::InvalidResponse {
            provider: provider.to_string(),
            reason: "empty completion".into(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use uuid::Uuid;

    use super::*;
    use crate::llm::provider::CompletionResponse;
    use crate::persona::PersonaTraits;

    /// Records the last request and answers with a fixed reply.
    struct Recording {
        reply: String,
        last: Mutex<Option<CompletionRequest>>,
    }

    impl Recording {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                last: Mutex::new(None),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmProvider for Recording {
        fn model_name(&self) -> &str {
            "recording"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            *self.last.lock().unwrap() = Some(request);
            Ok(CompletionResponse {
                content: self.reply.clone(),
                input_tokens: 10,
                output_tokens: 5,
            })
        }
    }

    fn persona() -> Persona {
        Persona {
            id: Uuid::new_v4(),
            personality_type: "ISFJ".parse().unwrap(),
            name: "Mei".into(),
            description: "A gentle caretaker".into(),
            emoji: "🍵".into(),
            conversation_style: "Soft and patient.".into(),
            traits: PersonaTraits::default(),
        }
    }

    #[tokio::test]
    async fn reply_sends_system_history_then_user() {
        let llm = Arc::new(Recording::new("  I'm here for you.  "));
        let engine = CompanionEngine::new(llm.clone(), CompanionConfig::default());

        let history = vec![
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello!"),
            ChatMessage::system("stray"),
        ];
        let reply = engine.reply(&persona(), &history, "rough day").await.unwrap();
        assert_eq!(reply, "I'm here for you.");

        let request = llm.last.lock().unwrap().take().unwrap();
        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert!(request.messages[0].content.contains("Mei (ISFJ)"));
        assert_eq!(request.messages[3].content, "rough day");
        assert_eq!(request.max_tokens, Some(1024));
    }

    #[tokio::test]
    async fn proactive_message_mentions_post() {
        let llm = Arc::new(Recording::new("Saw your post. Want to talk?"));
        let engine = CompanionEngine::new(llm.clone(), CompanionConfig::default());

        let msg = engine
            .proactive_message(&persona(), "疲れた", "instagram", SentimentLabel::Negative)
            .await
            .unwrap();
        assert_eq!(msg, "Saw your post. Want to talk?");

        let request = llm.last.lock().unwrap().take().unwrap();
        assert_eq!(request.messages.len(), 2);
        assert!(request.messages[0].content.contains("疲れた"));
        assert_eq!(request.max_tokens, Some(512));
    }

    #[tokio::test]
    async fn empty_completion_is_an_error() {
        let engine = CompanionEngine::new(
            Arc::new(Recording::new("   ")),
            CompanionConfig::default(),
        );
        let err = engine.reply(&persona(), &[], "hey").await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse { .. }));
    }
}
