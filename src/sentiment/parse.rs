//! Extract and validate the structured verdict inside a classifier reply.

use super::types::{SentimentLabel, SentimentResult};

/// Why a classifier reply could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplyParseError {
    #[error("no JSON object found in reply")]
    NoObject,

    #[error("JSON parse error: {0}")]
    Json(String),

    #[error("score is missing or not numeric")]
    InvalidScore,

    #[error("label is missing or not one of positive/neutral/negative/concerning")]
    InvalidLabel,
}

/// Locate the first balanced `{...}` fragment in free text.
///
/// Braces inside JSON strings (including escaped quotes) do not count.
/// Returns `None` when no opening brace exists or it is never closed.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Decode and validate a classifier reply.
///
/// A missing `triggerAlert` reads as false; the score is clamped to [-1, 1].
pub fn parse_sentiment_reply(raw: &str) -> Result<SentimentResult, ReplyParseError> {
    let fragment = first_json_object(raw).ok_or(ReplyParseError::NoObject)?;
    let value: serde_json::Value =
        serde_json::from_str(fragment).map_err(|e| ReplyParseError::Json(e.to_string()))?;

    let score = value
        .get("score")
        .and_then(serde_json::Value::as_f64)
        .filter(|s| s.is_finite())
        .ok_or(ReplyParseError::InvalidScore)?;

    let label: SentimentLabel = value
        .get("label")
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or(ReplyParseError::InvalidLabel)?;

    let trigger_alert = value
        .get("triggerAlert")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);

    let reason = value
        .get("reason")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let emotions = value
        .get("emotions")
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(SentimentResult {
        score: score.clamp(-1.0, 1.0),
        label,
        trigger_alert,
        reason,
        emotions,
    })
}
