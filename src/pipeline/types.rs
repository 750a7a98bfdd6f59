//! Shared types for the SNS monitoring pipeline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::persona::PersonaBadge;
use crate::sentiment::{SentimentLabel, SnsPost};
use crate::store::{Platform, SnsIntegration};

// ── Fetched posts ───────────────────────────────────────────────────

/// A post pulled from a linked account.
#[derive(Debug, Clone)]
pub struct FetchedPost {
    /// Platform-native post id; the dedup key.
    pub id: String,
    pub integration_id: Uuid,
    pub platform: Platform,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&FetchedPost> for SnsPost {
    fn from(post: &FetchedPost) -> Self {
        SnsPost::new(post.id.clone(), post.content.clone(), post.platform.as_str())
    }
}

/// Where recent posts for an integration come from.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn recent_posts(
        &self,
        integration: &SnsIntegration,
    ) -> Result<Vec<FetchedPost>, PipelineError>;
}

/// Stand-in for real platform APIs: one canned post per integration.
#[derive(Debug, Clone)]
pub struct DemoPostSource {
    content: String,
}

impl DemoPostSource {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl Default for DemoPostSource {
    fn default() -> Self {
        Self::new("なんか最近疲れた...")
    }
}

#[async_trait]
impl PostSource for DemoPostSource {
    async fn recent_posts(
        &self,
        integration: &SnsIntegration,
    ) -> Result<Vec<FetchedPost>, PipelineError> {
        Ok(vec![FetchedPost {
            id: format!("{}_{}", integration.platform, integration.id.simple()),
            integration_id: integration.id,
            platform: integration.platform,
            content: self.content.clone(),
            created_at: Utc::now(),
        }])
    }
}

// ── Check report ────────────────────────────────────────────────────

/// A post that warranted outreach, with the message that was sent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub post_id: String,
    pub platform: Platform,
    pub sentiment: SentimentLabel,
    pub message: String,
    #[serde(rename = "character")]
    pub persona: PersonaBadge,
}

/// Outcome of one monitoring pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    /// Posts fetched, including ones skipped as already analyzed.
    pub checked: usize,
    pub alerts: Vec<Alert>,
}
