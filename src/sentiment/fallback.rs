//! Deterministic keyword heuristic used when the classifier is unavailable.

use super::types::{SentimentLabel, SentimentResult};

/// Expressions of suicidal ideation or self-erasure.
pub const DEFAULT_CONCERNING_KEYWORDS: &[&str] =
    &["死にたい", "消えたい", "自殺", "生きてる意味", "価値がない"];

/// Fatigue, loneliness, wanting to quit, hardship.
pub const DEFAULT_NEGATIVE_KEYWORDS: &[&str] = &[
    "辛い",
    "しんどい",
    "疲れた",
    "消えたい",
    "死にたい",
    "孤独",
    "寂しい",
    "辞めたい",
    "つらい",
];

const CONCERNING_SCORE: f64 = -0.9;
const NEGATIVE_SCORE: f64 = -0.5;

/// Keyword matcher over lowercased post text.
///
/// Concerning keywords are checked first and win over negative ones.
#[derive(Debug, Clone)]
pub struct KeywordFallback {
    concerning: Vec<String>,
    negative: Vec<String>,
}

impl KeywordFallback {
    pub fn new<C, N>(concerning: C, negative: N) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        Self {
            concerning: concerning
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            negative: negative
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn classify(&self, text: &str) -> SentimentResult {
        let lower = text.to_lowercase();

        if self.concerning.iter().any(|k| lower.contains(k.as_str())) {
            return SentimentResult {
                score: CONCERNING_SCORE,
                label: SentimentLabel::Concerning,
                trigger_alert: true,
                reason: Some("serious emotional expression detected".to_string()),
                emotions: vec!["despair".to_string(), "loneliness".to_string()],
            };
        }

        if self.negative.iter().any(|k| lower.contains(k.as_str())) {
            return SentimentResult {
                score: NEGATIVE_SCORE,
                label: SentimentLabel::Negative,
                trigger_alert: true,
                reason: Some("negative emotional expression detected".to_string()),
                emotions: vec!["fatigue".to_string(), "stress".to_string()],
            };
        }

        SentimentResult {
            score: 0.0,
            label: SentimentLabel::Neutral,
            trigger_alert: false,
            reason: None,
            emotions: Vec::new(),
        }
    }
}

impl Default for KeywordFallback {
    fn default() -> Self {
        Self::new(DEFAULT_CONCERNING_KEYWORDS, DEFAULT_NEGATIVE_KEYWORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concerning_keyword_triggers() {
        let result = KeywordFallback::default().classify("もう死にたい");
        assert_eq!(result.label, SentimentLabel::Concerning);
        assert!(result.trigger_alert);
        assert!((result.score - CONCERNING_SCORE).abs() < f64::EPSILON);
        assert_eq!(result.emotions, vec!["despair", "loneliness"]);
        assert_eq!(
            result.reason.as_deref(),
            Some("serious emotional expression detected")
        );
    }

    #[test]
    fn concerning_wins_over_negative() {
        let result = KeywordFallback::default().classify("疲れた。寂しいし、死にたい");
        assert_eq!(result.label, SentimentLabel::Concerning);
        assert!(result.trigger_alert);
    }

    #[test]
    fn negative_keyword_alone() {
        let result = KeywordFallback::default().classify("なんか最近疲れた...");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.trigger_alert);
        assert!((result.score - NEGATIVE_SCORE).abs() < f64::EPSILON);
        assert_eq!(result.emotions, vec!["fatigue", "stress"]);
    }

    #[test]
    fn no_keywords_is_neutral() {
        let result = KeywordFallback::default().classify("今日はカレーを食べた");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert!(!result.trigger_alert);
        assert_eq!(result.score, 0.0);
        assert!(result.reason.is_none());
        assert!(result.emotions.is_empty());
    }

    #[test]
    fn custom_keywords_match_case_insensitively() {
        let fallback = KeywordFallback::new(["Hopeless"], ["TIRED"]);
        assert_eq!(
            fallback.classify("feeling hopeless tonight").label,
            SentimentLabel::Concerning
        );
        assert_eq!(
            fallback.classify("So Tired of everything").label,
            SentimentLabel::Negative
        );
        assert_eq!(fallback.classify("great day!").label, SentimentLabel::Neutral);
    }
}
