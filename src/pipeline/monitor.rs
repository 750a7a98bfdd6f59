//! SNS monitor: fetch → dedup → analyze → persist → reach out.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::companion::CompanionEngine;
use crate::error::PipelineError;
use crate::persona::{Persona, PersonaBadge};
use crate::sentiment::{SentimentAnalyzer, SentimentResult, SnsPost};
use crate::store::{ConversationEntry, Database, EntryKind, EntryRole, MonitoredPost, Platform};

use super::types::{Alert, CheckReport, FetchedPost, PostSource};

/// Runs one monitoring pass per call; holds no per-user state.
pub struct SnsMonitor {
    db: Arc<dyn Database>,
    analyzer: Arc<SentimentAnalyzer>,
    companion: Arc<CompanionEngine>,
    source: Arc<dyn PostSource>,
}

impl SnsMonitor {
    pub fn new(
        db: Arc<dyn Database>,
        analyzer: Arc<SentimentAnalyzer>,
        companion: Arc<CompanionEngine>,
        source: Arc<dyn PostSource>,
    ) -> Self {
        Self {
            db,
            analyzer,
            companion,
            source,
        }
    }

    /// Check a user's linked accounts, optionally one platform only.
    pub async fn check(
        &self,
        user_id: Uuid,
        platform: Option<Platform>,
    ) -> Result<CheckReport, PipelineError> {
        let integrations = self.db.active_sns_integrations(user_id, platform).await?;
        if integrations.is_empty() {
            debug!(user_id = %user_id, "No active SNS integrations");
            return Ok(CheckReport::default());
        }

        // Fetch from every integration concurrently; one failing source
        // does not sink the others.
        let fetches = join_all(
            integrations
                .iter()
                .map(|integration| self.source.recent_posts(integration)),
        )
        .await;

        let mut fetched = Vec::new();
        for (integration, result) in integrations.iter().zip(fetches) {
            match result {
                Ok(posts) => fetched.extend(posts),
                Err(e) => warn!(
                    integration_id = %integration.id,
                    platform = %integration.platform,
                    error = %e,
                    "Failed to fetch posts"
                ),
            }
        }
        let checked = fetched.len();

        let fresh = self.drop_already_analyzed(fetched).await?;
        if fresh.is_empty() {
            info!(user_id = %user_id, checked, "No new posts to analyze");
            return Ok(CheckReport {
                checked,
                alerts: Vec::new(),
            });
        }

        let results = self
            .analyzer
            .analyze_batch(fresh.iter().map(SnsPost::from).collect())
            .await;

        let mut cached_persona: Option<Option<Persona>> = None;
        let mut alerts = Vec::new();

        for post in &fresh {
            let Some(result) = results.get(&post.id) else {
                continue;
            };

            if !self.record_analysis(user_id, post, result).await {
                debug!(post_id = %post.id, "Post claimed by a concurrent check, skipping");
                continue;
            }

            if !result.trigger_alert {
                continue;
            }

            if cached_persona.is_none() {
                cached_persona = Some(self.current_persona(user_id).await?);
            }
            let Some(Some(persona)) = cached_persona.as_ref() else {
                info!(
                    user_id = %user_id,
                    post_id = %post.id,
                    "Alert raised but user has no persona yet"
                );
                continue;
            };

            if let Some(alert) = self.reach_out(user_id, persona, post, result).await {
                alerts.push(alert);
            }
        }

        info!(
            user_id = %user_id,
            checked,
            analyzed = results.len(),
            alerts = alerts.len(),
            "SNS check complete"
        );
        Ok(CheckReport { checked, alerts })
    }

    /// Remove posts with a stored analysis, and repeats within the batch.
    async fn drop_already_analyzed(
        &self,
        posts: Vec<FetchedPost>,
    ) -> Result<Vec<FetchedPost>, PipelineError> {
        let mut seen = HashSet::new();
        let mut fresh = Vec::with_capacity(posts.len());
        for post in posts {
            if !seen.insert(post.id.clone()) {
                continue;
            }
            if self.db.get_monitored_post(&post.id).await?.is_some() {
                debug!(post_id = %post.id, "Post already analyzed, skipping");
                continue;
            }
            fresh.push(post);
        }
        Ok(fresh)
    }

    /// Persist the analysis. Returns `false` when the post was already stored,
    /// so only the first writer reaches out. A storage failure is logged and
    /// does not block the alert.
    async fn record_analysis(
        &self,
        user_id: Uuid,
        post: &FetchedPost,
        result: &SentimentResult,
    ) -> bool {
        let record = MonitoredPost {
            post_id: post.id.clone(),
            user_id,
            integration_id: post.integration_id,
            platform: post.platform,
            content: post.content.clone(),
            score: result.score,
            label: result.label,
            trigger_alert: result.trigger_alert,
            post_created_at: post.created_at,
            analyzed_at: Utc::now(),
        };
        match self.db.insert_monitored_post(&record).await {
            Ok(inserted) => inserted,
            Err(e) => {
                warn!(post_id = %post.id, error = %e, "Failed to store post analysis");
                true
            }
        }
    }

    /// Persona from the user's most recent test, if any.
    async fn current_persona(&self, user_id: Uuid) -> Result<Option<Persona>, PipelineError> {
        let Some(test) = self.db.latest_test_result(user_id).await? else {
            return Ok(None);
        };
        Ok(self.db.get_persona(test.persona_id).await?)
    }

    async fn reach_out(
        &self,
        user_id: Uuid,
        persona: &Persona,
        post: &FetchedPost,
        result: &SentimentResult,
    ) -> Option<Alert> {
        let message = match self
            .companion
            .proactive_message(persona, &post.content, post.platform.as_str(), result.label)
            .await
        {
            Ok(message) => message,
            Err(e) => {
                let e = PipelineError::Generation(e.to_string());
                warn!(post_id = %post.id, error = %e, "Skipping alert");
                return None;
            }
        };

        let entry = ConversationEntry::new(
            user_id,
            persona.id,
            EntryRole::Assistant,
            message.clone(),
            EntryKind::Proactive {
                triggered_by_post: post.id.clone(),
            },
        );
        if let Err(e) = self.db.append_conversation_entry(&entry).await {
            warn!(post_id = %post.id, error = %e, "Failed to store proactive message");
        }

        info!(
            user_id = %user_id,
            post_id = %post.id,
            label = %result.label,
            persona = %persona.name,
            "Proactive message sent"
        );

        Some(Alert {
            post_id: post.id.clone(),
            platform: post.platform,
            sentiment: result.label,
            message,
            persona: PersonaBadge::from(persona),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use secrecy::SecretString;

    use super::*;
    use crate::companion::CompanionConfig;
    use crate::error::LlmError;
    use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider};
    use crate::persona::seed_default_personas;
    use crate::personality::{Answer, AnswerSet, classify};
    use crate::pipeline::types::DemoPostSource;
    use crate::sentiment::{AnalyzerConfig, SentimentLabel};
    use crate::store::{LibSqlBackend, NewSnsIntegration, SnsIntegration, StoredTestResult};

    /// Answers sentiment prompts with `verdict` and check-in prompts with a
    /// fixed message (or an error).
    struct ScriptedLlm {
        verdict: &'static str,
        fail_generation: bool,
        generations: AtomicUsize,
    }

    impl ScriptedLlm {
        fn new(verdict: &'static str) -> Self {
            Self {
                verdict,
                fail_generation: false,
                generations: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            let is_sentiment = request.messages[0].content.contains("emotional analysis");
            let content = if is_sentiment {
                self.verdict.to_string()
            } else {
                self.generations.fetch_add(1, Ordering::SeqCst);
                if self.fail_generation {
                    return Err(LlmError::RequestFailed {
                        provider: "scripted".into(),
                        reason: "overloaded".into(),
                    });
                }
                "Saw your post. I'm here if you want to talk.".to_string()
            };
            Ok(CompletionResponse {
                content,
                input_tokens: 0,
                output_tokens: 0,
            })
        }
    }

    /// Twitter is down; everything else behaves like the demo source.
    struct TwitterOutage(DemoPostSource);

    #[async_trait]
    impl PostSource for TwitterOutage {
        async fn recent_posts(
            &self,
            integration: &SnsIntegration,
        ) -> Result<Vec<FetchedPost>, PipelineError> {
            if integration.platform == Platform::Twitter {
                return Err(PipelineError::PostFetch {
                    platform: integration.platform.to_string(),
                    reason: "503 Service Unavailable".into(),
                });
            }
            self.0.recent_posts(integration).await
        }
    }

    const NEGATIVE: &str = r#"{"score": -0.6, "label": "negative", "triggerAlert": true, "reason": "fatigue"}"#;
    const NEUTRAL: &str = r#"{"score": 0.0, "label": "neutral", "triggerAlert": false}"#;

    struct Harness {
        db: Arc<LibSqlBackend>,
        llm: Arc<ScriptedLlm>,
        monitor: SnsMonitor,
    }

    async fn harness(llm: ScriptedLlm) -> Harness {
        harness_with_source(llm, Arc::new(DemoPostSource::default())).await
    }

    async fn harness_with_source(llm: ScriptedLlm, source: Arc<dyn PostSource>) -> Harness {
        let db = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        seed_default_personas(db.as_ref()).await.unwrap();
        let llm = Arc::new(llm);
        let analyzer = Arc::new(SentimentAnalyzer::new(
            llm.clone(),
            AnalyzerConfig::default(),
        ));
        let companion = Arc::new(CompanionEngine::new(llm.clone(), CompanionConfig::default()));
        let monitor = SnsMonitor::new(db.clone(), analyzer, companion, source);
        Harness { db, llm, monitor }
    }

    async fn connect(db: &LibSqlBackend, user: Uuid, platform: Platform) {
        db.upsert_sns_integration(NewSnsIntegration {
            user_id: user,
            platform,
            platform_user_id: "me".into(),
            access_token: SecretString::from("token".to_string()),
            refresh_token: None,
            token_expires_at: None,
        })
        .await
        .unwrap();
    }

    async fn take_test(db: &LibSqlBackend, user: Uuid) -> Persona {
        let answers: Vec<Answer> = (1..=60)
            .map(|q| Answer::new(q, if q % 2 == 1 { 5 } else { 1 }))
            .collect();
        let classification = classify(&AnswerSet::new(answers.clone()).unwrap());
        let persona = db
            .get_persona_by_type(classification.personality_type)
            .await
            .unwrap()
            .unwrap();
        db.insert_test_result(&StoredTestResult {
            id: Uuid::new_v4(),
            user_id: user,
            persona_id: persona.id,
            personality_type: classification.personality_type,
            answers,
            scores: classification.scores,
            percentages: classification.percentages,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
        persona
    }

    #[tokio::test]
    async fn no_integrations_yields_empty_report() {
        let h = harness(ScriptedLlm::new(NEGATIVE)).await;
        let report = h.monitor.check(Uuid::new_v4(), None).await.unwrap();
        assert_eq!(report.checked, 0);
        assert!(report.alerts.is_empty());
    }

    #[tokio::test]
    async fn triggered_post_sends_proactive_message_once() {
        let h = harness(ScriptedLlm::new(NEGATIVE)).await;
        let user = Uuid::new_v4();
        connect(&h.db, user, Platform::Twitter).await;
        let persona = take_test(&h.db, user).await;

        let report = h.monitor.check(user, None).await.unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.alerts.len(), 1);
        let alert = &report.alerts[0];
        assert_eq!(alert.platform, Platform::Twitter);
        assert_eq!(alert.sentiment, SentimentLabel::Negative);
        assert_eq!(alert.persona.name, persona.name);

        let stored = h.db.get_monitored_post(&alert.post_id).await.unwrap().unwrap();
        assert!(stored.trigger_alert);

        let log = h.db.recent_conversation(user, persona.id, 10).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].role, EntryRole::Assistant);
        assert_eq!(
            log[0].kind,
            EntryKind::Proactive {
                triggered_by_post: alert.post_id.clone()
            }
        );

        // Same post again: deduplicated, nothing new generated.
        let again = h.monitor.check(user, None).await.unwrap();
        assert_eq!(again.checked, 1);
        assert!(again.alerts.is_empty());
        assert_eq!(h.llm.generations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn calm_post_is_recorded_without_alert() {
        let h = harness(ScriptedLlm::new(NEUTRAL)).await;
        let user = Uuid::new_v4();
        connect(&h.db, user, Platform::Instagram).await;
        take_test(&h.db, user).await;

        let report = h.monitor.check(user, None).await.unwrap();
        assert_eq!(report.checked, 1);
        assert!(report.alerts.is_empty());
        assert_eq!(h.llm.generations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_test_result_means_no_alert() {
        let h = harness(ScriptedLlm::new(NEGATIVE)).await;
        let user = Uuid::new_v4();
        connect(&h.db, user, Platform::Facebook).await;

        let report = h.monitor.check(user, None).await.unwrap();
        assert_eq!(report.checked, 1);
        assert!(report.alerts.is_empty());
    }

    #[tokio::test]
    async fn generation_failure_skips_alert_but_keeps_analysis() {
        let h = harness(ScriptedLlm {
            fail_generation: true,
            ..ScriptedLlm::new(NEGATIVE)
        })
        .await;
        let user = Uuid::new_v4();
        connect(&h.db, user, Platform::Twitter).await;
        let persona = take_test(&h.db, user).await;

        let report = h.monitor.check(user, None).await.unwrap();
        assert!(report.alerts.is_empty());
        assert!(
            h.db.recent_conversation(user, persona.id, 10)
                .await
                .unwrap()
                .is_empty()
        );

        // Analysis was still stored, so the post is not retried.
        let again = h.monitor.check(user, None).await.unwrap();
        assert!(again.alerts.is_empty());
        assert_eq!(h.llm.generations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn platform_filter_limits_integrations() {
        let h = harness(ScriptedLlm::new(NEGATIVE)).await;
        let user = Uuid::new_v4();
        connect(&h.db, user, Platform::Twitter).await;
        connect(&h.db, user, Platform::Instagram).await;
        take_test(&h.db, user).await;

        let report = h
            .monitor
            .check(user, Some(Platform::Instagram))
            .await
            .unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].platform, Platform::Instagram);

        let rest = h.monitor.check(user, None).await.unwrap();
        assert_eq!(rest.checked, 2);
        assert_eq!(rest.alerts.len(), 1);
        assert_eq!(rest.alerts[0].platform, Platform::Twitter);
    }

    #[tokio::test]
    async fn failed_fetch_does_not_block_other_platforms() {
        let h = harness_with_source(
            ScriptedLlm::new(NEGATIVE),
            Arc::new(TwitterOutage(DemoPostSource::default())),
        )
        .await;
        let user = Uuid::new_v4();
        connect(&h.db, user, Platform::Twitter).await;
        connect(&h.db, user, Platform::Facebook).await;
        take_test(&h.db, user).await;

        let report = h.monitor.check(user, None).await.unwrap();
        assert_eq!(report.checked, 1);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].platform, Platform::Facebook);
    }

    #[tokio::test]
    async fn overlapping_checks_reach_out_once() {
        let h = harness(ScriptedLlm::new(NEGATIVE)).await;
        let user = Uuid::new_v4();
        connect(&h.db, user, Platform::Twitter).await;
        take_test(&h.db, user).await;

        let (first, second) = tokio::join!(
            h.monitor.check(user, None),
            h.monitor.check(user, None)
        );
        let alerts = first.unwrap().alerts.len() + second.unwrap().alerts.len();
        assert_eq!(alerts, 1);
        assert_eq!(h.llm.generations.load(Ordering::SeqCst), 1);
    }
}
