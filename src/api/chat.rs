//! POST /api/chat

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::llm::provider::ChatMessage;
use crate::persona::PersonaBadge;
use crate::store::{ConversationEntry, EntryKind, EntryRole};

const MAX_MESSAGE_CHARS: usize = 5000;
const DEFAULT_HISTORY: usize = 20;
const MAX_HISTORY: usize = 50;

fn default_history() -> usize {
    DEFAULT_HISTORY
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChatRequest {
    user_id: Uuid,
    character_id: Uuid,
    message: String,
    #[serde(default = "default_history")]
    conversation_limit: usize,
}

impl ChatRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut problems = Vec::new();
        let chars = self.message.chars().count();
        if chars == 0 {
            problems.push("message must not be empty".to_string());
        } else if chars > MAX_MESSAGE_CHARS {
            problems.push(format!("message exceeds {MAX_MESSAGE_CHARS} characters"));
        }
        if !(1..=MAX_HISTORY).contains(&self.conversation_limit) {
            problems.push(format!("conversationLimit must be between 1 and {MAX_HISTORY}"));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ApiError::invalid(problems))
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ChatResponse {
    success: bool,
    response: String,
    message_id: Option<Uuid>,
    character: PersonaBadge,
}

fn to_chat_message(entry: ConversationEntry) -> ChatMessage {
    match entry.role {
        EntryRole::User => ChatMessage::user(entry.content),
        EntryRole::Assistant => ChatMessage::assistant(entry.content),
    }
}

pub(super) async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let persona = state
        .db
        .get_persona(request.character_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Character not found"))?;

    let history: Vec<ChatMessage> = state
        .db
        .recent_conversation(request.user_id, persona.id, request.conversation_limit)
        .await?
        .into_iter()
        .map(to_chat_message)
        .collect();

    let reply = state
        .companion
        .reply(&persona, &history, &request.message)
        .await?;

    let user_entry = ConversationEntry::new(
        request.user_id,
        persona.id,
        EntryRole::User,
        request.message,
        EntryKind::Chat,
    );
    if let Err(e) = state.db.append_conversation_entry(&user_entry).await {
        warn!(user_id = %request.user_id, error = %e, "Failed to save user message");
    }

    let assistant_entry = ConversationEntry::new(
        request.user_id,
        persona.id,
        EntryRole::Assistant,
        reply.clone(),
        EntryKind::Chat,
    );
    let message_id = match state.db.append_conversation_entry(&assistant_entry).await {
        Ok(()) => Some(assistant_entry.id),
        Err(e) => {
            warn!(user_id = %request.user_id, error = %e, "Failed to save AI response");
            None
        }
    };

    info!(
        user_id = %request.user_id,
        persona = %persona.name,
        history = history.len(),
        "Chat reply generated"
    );

    Ok(Json(ChatResponse {
        success: true,
        response: reply,
        message_id,
        character: PersonaBadge::from(&persona),
    }))
}
