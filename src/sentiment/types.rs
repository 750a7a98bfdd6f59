//! Sentiment labels, results, and the post shape fed to the gate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Four-way sentiment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    Concerning,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
            Self::Concerning => "concerning",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    /// Exact lowercase match only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            "concerning" => Ok(Self::Concerning),
            other => Err(format!("unknown sentiment label: '{other}'")),
        }
    }
}

/// Outcome of analyzing one post. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentResult {
    /// -1.0 (very negative) to 1.0 (very positive).
    pub score: f64,
    pub label: SentimentLabel,
    /// Whether the persona should reach out unprompted.
    pub trigger_alert: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub emotions: Vec<String>,
}

/// A social-media post awaiting analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnsPost {
    /// Platform-native post id; the dedup key.
    pub id: String,
    pub content: String,
    pub platform: String,
}

impl SnsPost {
    pub fn new(id: impl Into<String>, content: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            platform: platform.into(),
        }
    }
}
