//! Sentiment gate: LLM classification with a deterministic keyword fallback.
//!
//! The primary path never surfaces an error to callers. Any provider failure
//! (transport, timeout, unusable reply) is answered by the fallback.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::LlmError;
use crate::llm::provider::{ChatMessage, CompletionRequest, LlmProvider};

use super::fallback::KeywordFallback;
use super::parse::{ReplyParseError, parse_sentiment_reply};
use super::prompts::{build_sentiment_system_prompt, build_sentiment_user_prompt};
use super::types::{SentimentResult, SnsPost};

/// Tuning for the primary classifier call.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Upper bound on one classifier round trip.
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_tokens: 1024,
            temperature: 0.1,
        }
    }
}

/// Why the primary path produced no usable result.
#[derive(Debug, thiserror::Error)]
pub enum ProviderFailure {
    #[error("classifier call failed: {0}")]
    Transport(#[from] LlmError),

    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),

    #[error("classifier reply unusable: {0}")]
    Malformed(#[from] ReplyParseError),
}

/// Result of the primary path alone.
#[derive(Debug)]
pub enum PrimaryOutcome {
    Classified(SentimentResult),
    ProviderFailed(ProviderFailure),
}

/// Analyzes posts; holds no per-call state.
pub struct SentimentAnalyzer {
    classifier: Arc<dyn LlmProvider>,
    fallback: KeywordFallback,
    config: AnalyzerConfig,
}

impl SentimentAnalyzer {
    pub fn new(classifier: Arc<dyn LlmProvider>, config: AnalyzerConfig) -> Self {
        Self {
            classifier,
            fallback: KeywordFallback::default(),
            config,
        }
    }

    /// Replace the default keyword sets.
    pub fn with_fallback(mut self, fallback: KeywordFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Ask the classifier and validate its reply. No fallback here.
    pub async fn classify_primary(&self, text: &str, platform: &str) -> PrimaryOutcome {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(build_sentiment_system_prompt()),
            ChatMessage::user(build_sentiment_user_prompt(text, platform)),
        ])
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens);

        let response =
            match tokio::time::timeout(self.config.timeout, self.classifier.complete(request)).await
            {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => return PrimaryOutcome::ProviderFailed(e.into()),
                Err(_) => {
                    return PrimaryOutcome::ProviderFailed(ProviderFailure::Timeout(
                        self.config.timeout,
                    ));
                }
            };

        match parse_sentiment_reply(&response.content) {
            Ok(result) => PrimaryOutcome::Classified(result),
            Err(e) => {
                debug!(raw_response = %response.content, "Unusable classifier reply");
                PrimaryOutcome::ProviderFailed(e.into())
            }
        }
    }

    /// Keyword heuristic. Pure and total.
    pub fn classify_fallback(&self, text: &str) -> SentimentResult {
        self.fallback.classify(text)
    }

    /// Analyze one post, falling back on any provider failure.
    pub async fn analyze(&self, text: &str, platform: &str) -> SentimentResult {
        match self.classify_primary(text, platform).await {
            PrimaryOutcome::Classified(result) => {
                debug!(
                    platform,
                    label = %result.label,
                    trigger = result.trigger_alert,
                    "Post classified"
                );
                result
            }
            PrimaryOutcome::ProviderFailed(failure) => {
                warn!(
                    platform,
                    error = %failure,
                    "Sentiment classifier failed, using keyword fallback"
                );
                self.classify_fallback(text)
            }
        }
    }

    /// Analyze many posts concurrently.
    ///
    /// A task that dies is dropped from the map; the others are unaffected.
    pub async fn analyze_batch(
        self: &Arc<Self>,
        posts: Vec<SnsPost>,
    ) -> HashMap<String, SentimentResult> {
        let total = posts.len();
        let mut tasks = JoinSet::new();

        for post in posts {
            let analyzer = Arc::clone(self);
            tasks.spawn(async move {
                let result = analyzer.analyze(&post.content, &post.platform).await;
                (post.id, result)
            });
        }

        let mut results = HashMap::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, result)) => {
                    results.insert(id, result);
                }
                Err(e) => {
                    warn!(error = %e, "Post analysis task failed, dropping post");
                }
            }
        }

        info!(analyzed = results.len(), total, "Batch sentiment analysis complete");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::CompletionResponse;
    use crate::sentiment::types::SentimentLabel;

    /// Replies with a fixed body.
    struct FixedReply(String);

    #[async_trait::async_trait]
    impl LlmProvider for FixedReply {
        fn model_name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                content: self.0.clone(),
                input_tokens: 0,
                output_tokens: 0,
            })
        }
    }

    /// Always fails at the transport level.
    struct Unreachable;

    #[async_trait::async_trait]
    impl LlmProvider for Unreachable {
        fn model_name(&self) -> &str {
            "unreachable"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Err(LlmError::RequestFailed {
                provider: "test".into(),
                reason: "connection refused".into(),
            })
        }
    }

    /// Never answers within any reasonable timeout.
    struct Stalled;

    #[async_trait::async_trait]
    impl LlmProvider for Stalled {
        fn model_name(&self) -> &str {
            "stalled"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Err(LlmError::RequestFailed {
                provider: "test".into(),
                reason: "unreachable".into(),
            })
        }
    }

    /// Panics on posts containing "boom", otherwise returns a positive verdict.
    struct Explosive;

    #[async_trait::async_trait]
    impl LlmProvider for Explosive {
        fn model_name(&self) -> &str {
            "explosive"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            if request.messages.iter().any(|m| m.content.contains("boom")) {
                panic!("classifier crashed");
            }
            Ok(CompletionResponse {
                content: r#"{"score": 0.6, "label": "positive", "triggerAlert": false}"#.into(),
                input_tokens: 0,
                output_tokens: 0,
            })
        }
    }

    fn analyzer(provider: impl LlmProvider + 'static) -> SentimentAnalyzer {
        SentimentAnalyzer::new(Arc::new(provider), AnalyzerConfig::default())
    }

    #[tokio::test]
    async fn primary_result_is_used_when_valid() {
        let a = analyzer(FixedReply(
            r#"Sure! {"score": -0.95, "label": "concerning", "triggerAlert": true, "reason": "hopeless", "emotions": ["despair"]}"#.into(),
        ));
        let result = a.analyze("everything is pointless", "twitter").await;
        assert_eq!(result.label, SentimentLabel::Concerning);
        assert!(result.trigger_alert);
        assert_eq!(result.reason.as_deref(), Some("hopeless"));
    }

    #[tokio::test]
    async fn provider_verdict_is_trusted_for_negative_without_trigger() {
        let a = analyzer(FixedReply(
            r#"{"score": -0.4, "label": "negative", "triggerAlert": false}"#.into(),
        ));
        // Fallback would trigger on 疲れた, but the provider answered.
        let result = a.analyze("疲れた", "twitter").await;
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(!result.trigger_alert);
    }

    #[tokio::test]
    async fn primary_outcome_reports_malformed_reply() {
        let a = analyzer(FixedReply("I can't decide.".into()));
        match a.classify_primary("hello", "twitter").await {
            PrimaryOutcome::ProviderFailed(ProviderFailure::Malformed(ReplyParseError::NoObject)) => {}
            other => panic!("expected malformed failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_label_falls_back() {
        let a = analyzer(FixedReply(r#"{"score": -0.5, "label": "sad"}"#.into()));
        let result = a.analyze("なんか最近疲れた...", "twitter").await;
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!((result.score + 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn transport_error_falls_back() {
        let a = analyzer(Unreachable);
        match a.classify_primary("x", "twitter").await {
            PrimaryOutcome::ProviderFailed(ProviderFailure::Transport(_)) => {}
            other => panic!("expected transport failure, got {other:?}"),
        }
        let result = a.analyze("もう死にたい、疲れた", "twitter").await;
        assert_eq!(result.label, SentimentLabel::Concerning);
        assert!(result.trigger_alert);
    }

    #[tokio::test]
    async fn timeout_falls_back() {
        let a = SentimentAnalyzer::new(
            Arc::new(Stalled),
            AnalyzerConfig {
                timeout: Duration::from_millis(50),
                ..AnalyzerConfig::default()
            },
        );
        let result = a.analyze("今日は晴れ", "instagram").await;
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert!(!result.trigger_alert);
        assert_eq!(result.score, 0.0);
    }

    #[tokio::test]
    async fn custom_fallback_keywords() {
        let a = analyzer(Unreachable).with_fallback(KeywordFallback::new(["hopeless"], ["tired"]));
        assert_eq!(
            a.analyze("so tired", "facebook").await.label,
            SentimentLabel::Negative
        );
    }

    #[tokio::test]
    async fn batch_collects_every_post() {
        let a = Arc::new(analyzer(Unreachable));
        let posts = vec![
            SnsPost::new("p1", "死にたい", "twitter"),
            SnsPost::new("p2", "疲れた", "twitter"),
            SnsPost::new("p3", "ランチ美味しかった", "instagram"),
        ];
        let results = a.analyze_batch(posts).await;
        assert_eq!(results.len(), 3);
        assert_eq!(results["p1"].label, SentimentLabel::Concerning);
        assert_eq!(results["p2"].label, SentimentLabel::Negative);
        assert_eq!(results["p3"].label, SentimentLabel::Neutral);
    }

    #[tokio::test]
    async fn batch_drops_only_the_failed_post() {
        let a = Arc::new(analyzer(Explosive));
        let posts = vec![
            SnsPost::new("ok-1", "great day", "twitter"),
            SnsPost::new("bad", "boom", "twitter"),
            SnsPost::new("ok-2", "lovely weather", "instagram"),
            SnsPost::new("ok-3", "new job!", "facebook"),
        ];
        let results = a.analyze_batch(posts).await;
        assert_eq!(results.len(), 3);
        assert!(!results.contains_key("bad"));
        assert!(results.values().all(|r| r.label == SentimentLabel::Positive));
    }

    #[tokio::test]
    async fn empty_batch_is_empty() {
        let a = Arc::new(analyzer(Unreachable));
        assert!(a.analyze_batch(Vec::new()).await.is_empty());
    }
}
