//! Unified `Database` trait and the records it persists.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::persona::Persona;
use crate::personality::{Answer, AxisPercentages, AxisScores, PersonalityType};
use crate::sentiment::SentimentLabel;

/// A stored questionnaire submission.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTestResult {
    pub id: Uuid,
    pub user_id: Uuid,
    pub persona_id: Uuid,
    pub personality_type: PersonalityType,
    pub answers: Vec<Answer>,
    pub scores: AxisScores,
    pub percentages: AxisPercentages,
    pub created_at: DateTime<Utc>,
}

/// Who wrote a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryRole {
    User,
    Assistant,
}

impl EntryRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl FromStr for EntryRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// How a conversation entry came about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Chat,
    /// Sent unprompted after a monitored post raised an alert.
    Proactive { triggered_by_post: String },
}

/// One line of the (user, persona) conversation log.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub persona_id: Uuid,
    pub role: EntryRole,
    pub content: String,
    pub kind: EntryKind,
    pub created_at: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn new(
        user_id: Uuid,
        persona_id: Uuid,
        role: EntryRole,
        content: impl Into<String>,
        kind: EntryKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            persona_id,
            role,
            content: content.into(),
            kind,
            created_at: Utc::now(),
        }
    }
}

/// Supported social platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Instagram,
    Facebook,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "twitter" => Ok(Self::Twitter),
            "instagram" => Ok(Self::Instagram),
            "facebook" => Ok(Self::Facebook),
            other => Err(format!("unsupported platform '{other}'")),
        }
    }
}

/// A linked social account. Tokens never leave the store unredacted.
#[derive(Debug)]
pub struct SnsIntegration {
    pub id: Uuid,
    pub user_id: Uuid,
    pub platform: Platform,
    pub platform_user_id: String,
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for connecting (or reconnecting) a social account.
#[derive(Debug)]
pub struct NewSnsIntegration {
    pub user_id: Uuid,
    pub platform: Platform,
    pub platform_user_id: String,
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub token_expires_at: Option<DateTime<Utc>>,
}

/// Dedup record for an analyzed post.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoredPost {
    pub post_id: String,
    pub user_id: Uuid,
    pub integration_id: Uuid,
    pub platform: Platform,
    pub content: String,
    pub score: f64,
    pub label: SentimentLabel,
    pub trigger_alert: bool,
    pub post_created_at: DateTime<Utc>,
    pub analyzed_at: DateTime<Utc>,
}

/// Backend-agnostic persistence for personas, tests, conversations and SNS data.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    // ── Personas ────────────────────────────────────────────────────

    /// Insert or replace a persona, keyed by id.
    async fn upsert_persona(&self, persona: &Persona) -> Result<(), DatabaseError>;

    async fn get_persona(&self, id: Uuid) -> Result<Option<Persona>, DatabaseError>;

    async fn get_persona_by_type(
        &self,
        personality_type: PersonalityType,
    ) -> Result<Option<Persona>, DatabaseError>;

    /// All personas, ordered by type code.
    async fn list_personas(&self) -> Result<Vec<Persona>, DatabaseError>;

    // ── Test results ────────────────────────────────────────────────

    async fn insert_test_result(&self, result: &StoredTestResult) -> Result<(), DatabaseError>;

    /// Most recent submission for a user.
    async fn latest_test_result(
        &self,
        user_id: Uuid,
    ) -> Result<Option<StoredTestResult>, DatabaseError>;

    // ── Conversations ───────────────────────────────────────────────

    async fn append_conversation_entry(
        &self,
        entry: &ConversationEntry,
    ) -> Result<(), DatabaseError>;

    /// The last `limit` entries for (user, persona), oldest first.
    async fn recent_conversation(
        &self,
        user_id: Uuid,
        persona_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ConversationEntry>, DatabaseError>;

    // ── SNS integrations ────────────────────────────────────────────

    /// Create the (user, platform) integration, or update it in place and
    /// reactivate it.
    async fn upsert_sns_integration(
        &self,
        new: NewSnsIntegration,
    ) -> Result<SnsIntegration, DatabaseError>;

    /// Every integration for a user, active or not, newest first.
    async fn list_sns_integrations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SnsIntegration>, DatabaseError>;

    async fn active_sns_integrations(
        &self,
        user_id: Uuid,
        platform: Option<Platform>,
    ) -> Result<Vec<SnsIntegration>, DatabaseError>;

    /// Soft delete. Returns false when no integration matched.
    async fn deactivate_sns_integration(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DatabaseError>;

    // ── Monitored posts ─────────────────────────────────────────────

    async fn get_monitored_post(
        &self,
        post_id: &str,
    ) -> Result<Option<MonitoredPost>, DatabaseError>;

    /// Store an analysis. Returns `false` when the post was already stored,
    /// leaving the existing row untouched.
    async fn insert_monitored_post(&self, post: &MonitoredPost) -> Result<bool, DatabaseError>;
}
