//! libSQL implementation of the async `Database` trait.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::persona::{Persona, PersonaTraits};
use crate::personality::PersonalityType;
use crate::sentiment::SentimentLabel;
use crate::store::migrations;
use crate::store::traits::{
    ConversationEntry, Database, EntryKind, EntryRole, MonitoredPost, NewSnsIntegration,
    Platform, SnsIntegration, StoredTestResult,
};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db)?;
        backend.run_migrations().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let backend = Self::from_database(db)?;
        backend.run_migrations().await?;
        Ok(backend)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Fixed-width RFC 3339 so text ordering matches time ordering.
fn ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

fn parse_optional_datetime(s: Option<String>) -> Option<DateTime<Utc>> {
    s.as_deref().map(parse_datetime)
}

fn parse_uuid(s: &str, column: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::Serialization(format!("{column}: {e}")))
}

fn parse_field<T: std::str::FromStr>(s: &str, column: &str) -> Result<T, DatabaseError>
where
    T::Err: std::fmt::Display,
{
    s.parse()
        .map_err(|e: T::Err| DatabaseError::Serialization(format!("{column}: {e}")))
}

fn from_json<T: serde::de::DeserializeOwned>(s: &str, column: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(s).map_err(|e| DatabaseError::Serialization(format!("{column}: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T, column: &str) -> Result<String, DatabaseError> {
    serde_json::to_string(value)
        .map_err(|e| DatabaseError::Serialization(format!("{column}: {e}")))
}

/// Convert `Option<&str>` to libsql Value.
fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

fn row_err(op: &str) -> impl Fn(libsql::Error) -> DatabaseError + '_ {
    move |e| DatabaseError::Query(format!("{op} row parse: {e}"))
}

// ── Row mapping ─────────────────────────────────────────────────────

const PERSONA_COLUMNS: &str =
    "id, mbti_type, name, description, emoji, conversation_style, personality_traits";

const TEST_COLUMNS: &str =
    "id, user_id, persona_id, mbti_type, answers, scores, percentages, created_at";

const ENTRY_COLUMNS: &str =
    "id, user_id, persona_id, role, content, kind, triggered_by_post, created_at";

const INTEGRATION_COLUMNS: &str = "id, user_id, platform, platform_user_id, access_token, \
     refresh_token, token_expires_at, is_active, created_at, updated_at";

const POST_COLUMNS: &str = "post_id, user_id, integration_id, platform, content, \
     sentiment_score, sentiment_label, trigger_alert, post_created_at, analyzed_at";

fn row_to_persona(row: &libsql::Row) -> Result<Persona, DatabaseError> {
    let err = row_err("persona");
    let id: String = row.get(0).map_err(&err)?;
    let code: String = row.get(1).map_err(&err)?;
    let traits: String = row.get(6).map_err(&err)?;
    Ok(Persona {
        id: parse_uuid(&id, "personas.id")?,
        personality_type: parse_field(&code, "personas.mbti_type")?,
        name: row.get(2).map_err(&err)?,
        description: row.get(3).map_err(&err)?,
        emoji: row.get(4).map_err(&err)?,
        conversation_style: row.get(5).map_err(&err)?,
        traits: from_json::<PersonaTraits>(&traits, "personas.personality_traits")?,
    })
}

fn row_to_test(row: &libsql::Row) -> Result<StoredTestResult, DatabaseError> {
    let err = row_err("personality_test");
    let id: String = row.get(0).map_err(&err)?;
    let user_id: String = row.get(1).map_err(&err)?;
    let persona_id: String = row.get(2).map_err(&err)?;
    let code: String = row.get(3).map_err(&err)?;
    let answers: String = row.get(4).map_err(&err)?;
    let scores: String = row.get(5).map_err(&err)?;
    let percentages: String = row.get(6).map_err(&err)?;
    let created_at: String = row.get(7).map_err(&err)?;
    Ok(StoredTestResult {
        id: parse_uuid(&id, "personality_tests.id")?,
        user_id: parse_uuid(&user_id, "personality_tests.user_id")?,
        persona_id: parse_uuid(&persona_id, "personality_tests.persona_id")?,
        personality_type: parse_field(&code, "personality_tests.mbti_type")?,
        answers: from_json(&answers, "personality_tests.answers")?,
        scores: from_json(&scores, "personality_tests.scores")?,
        percentages: from_json(&percentages, "personality_tests.percentages")?,
        created_at: parse_datetime(&created_at),
    })
}

fn row_to_entry(row: &libsql::Row) -> Result<ConversationEntry, DatabaseError> {
    let err = row_err("conversation");
    let id: String = row.get(0).map_err(&err)?;
    let user_id: String = row.get(1).map_err(&err)?;
    let persona_id: String = row.get(2).map_err(&err)?;
    let role: String = row.get(3).map_err(&err)?;
    let kind: String = row.get(5).map_err(&err)?;
    let triggered_by: Option<String> = row.get(6).map_err(&err)?;
    let created_at: String = row.get(7).map_err(&err)?;

    let kind = match (kind.as_str(), triggered_by) {
        ("proactive", Some(post)) => EntryKind::Proactive {
            triggered_by_post: post,
        },
        ("proactive", None) => EntryKind::Proactive {
            triggered_by_post: String::new(),
        },
        _ => EntryKind::Chat,
    };

    Ok(ConversationEntry {
        id: parse_uuid(&id, "conversations.id")?,
        user_id: parse_uuid(&user_id, "conversations.user_id")?,
        persona_id: parse_uuid(&persona_id, "conversations.persona_id")?,
        role: parse_field::<EntryRole>(&role, "conversations.role")?,
        content: row.get(4).map_err(&err)?,
        kind,
        created_at: parse_datetime(&created_at),
    })
}

fn row_to_integration(row: &libsql::Row) -> Result<SnsIntegration, DatabaseError> {
    let err = row_err("sns_integration");
    let id: String = row.get(0).map_err(&err)?;
    let user_id: String = row.get(1).map_err(&err)?;
    let platform: String = row.get(2).map_err(&err)?;
    let access_token: String = row.get(4).map_err(&err)?;
    let refresh_token: Option<String> = row.get(5).map_err(&err)?;
    let expires_at: Option<String> = row.get(6).map_err(&err)?;
    let is_active: i64 = row.get(7).map_err(&err)?;
    let created_at: String = row.get(8).map_err(&err)?;
    let updated_at: String = row.get(9).map_err(&err)?;
    Ok(SnsIntegration {
        id: parse_uuid(&id, "sns_integrations.id")?,
        user_id: parse_uuid(&user_id, "sns_integrations.user_id")?,
        platform: parse_field::<Platform>(&platform, "sns_integrations.platform")?,
        platform_user_id: row.get(3).map_err(&err)?,
        access_token: SecretString::from(access_token),
        refresh_token: refresh_token.map(SecretString::from),
        token_expires_at: parse_optional_datetime(expires_at),
        is_active: is_active != 0,
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

fn row_to_post(row: &libsql::Row) -> Result<MonitoredPost, DatabaseError> {
    let err = row_err("sns_post");
    let user_id: String = row.get(1).map_err(&err)?;
    let integration_id: String = row.get(2).map_err(&err)?;
    let platform: String = row.get(3).map_err(&err)?;
    let label: String = row.get(6).map_err(&err)?;
    let trigger: i64 = row.get(7).map_err(&err)?;
    let post_created_at: String = row.get(8).map_err(&err)?;
    let analyzed_at: String = row.get(9).map_err(&err)?;
    Ok(MonitoredPost {
        post_id: row.get(0).map_err(&err)?,
        user_id: parse_uuid(&user_id, "sns_posts_monitor.user_id")?,
        integration_id: parse_uuid(&integration_id, "sns_posts_monitor.integration_id")?,
        platform: parse_field::<Platform>(&platform, "sns_posts_monitor.platform")?,
        content: row.get(4).map_err(&err)?,
        score: row.get(5).map_err(&err)?,
        label: parse_field::<SentimentLabel>(&label, "sns_posts_monitor.sentiment_label")?,
        trigger_alert: trigger != 0,
        post_created_at: parse_datetime(&post_created_at),
        analyzed_at: parse_datetime(&analyzed_at),
    })
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Personas ────────────────────────────────────────────────────

    async fn upsert_persona(&self, persona: &Persona) -> Result<(), DatabaseError> {
        let traits = to_json(&persona.traits, "personas.personality_traits")?;
        let now = ts(&Utc::now());
        self.conn()
            .execute(
                "INSERT INTO personas (id, mbti_type, name, description, emoji,
                    conversation_style, personality_traits, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                 ON CONFLICT (id) DO UPDATE SET
                    mbti_type = excluded.mbti_type,
                    name = excluded.name,
                    description = excluded.description,
                    emoji = excluded.emoji,
                    conversation_style = excluded.conversation_style,
                    personality_traits = excluded.personality_traits,
                    updated_at = excluded.updated_at",
                params![
                    persona.id.to_string(),
                    persona.personality_type.code(),
                    persona.name.as_str(),
                    persona.description.as_str(),
                    persona.emoji.as_str(),
                    persona.conversation_style.as_str(),
                    traits,
                    now,
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("upsert_persona: {e}")))?;

        debug!(persona_id = %persona.id, mbti_type = %persona.personality_type, "Persona upserted");
        Ok(())
    }

    async fn get_persona(&self, id: Uuid) -> Result<Option<Persona>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {PERSONA_COLUMNS} FROM personas WHERE id = ?1"),
                params![id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_persona: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_persona(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_persona: {e}"))),
        }
    }

    async fn get_persona_by_type(
        &self,
        personality_type: PersonalityType,
    ) -> Result<Option<Persona>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {PERSONA_COLUMNS} FROM personas WHERE mbti_type = ?1"),
                params![personality_type.code()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_persona_by_type: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_persona(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_persona_by_type: {e}"))),
        }
    }

    async fn list_personas(&self) -> Result<Vec<Persona>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {PERSONA_COLUMNS} FROM personas ORDER BY mbti_type"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_personas: {e}")))?;

        let mut personas = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("list_personas: {e}")))?
        {
            personas.push(row_to_persona(&row)?);
        }
        Ok(personas)
    }

    // ── Test results ────────────────────────────────────────────────

    async fn insert_test_result(&self, result: &StoredTestResult) -> Result<(), DatabaseError> {
        let answers = to_json(&result.answers, "personality_tests.answers")?;
        let scores = to_json(&result.scores, "personality_tests.scores")?;
        let percentages = to_json(&result.percentages, "personality_tests.percentages")?;

        self.conn()
            .execute(
                "INSERT INTO personality_tests (id, user_id, persona_id, mbti_type, answers,
                    scores, percentages, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    result.id.to_string(),
                    result.user_id.to_string(),
                    result.persona_id.to_string(),
                    result.personality_type.code(),
                    answers,
                    scores,
                    percentages,
                    ts(&result.created_at),
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("insert_test_result: {e}")))?;

        debug!(test_id = %result.id, user_id = %result.user_id, "Test result stored");
        Ok(())
    }

    async fn latest_test_result(
        &self,
        user_id: Uuid,
    ) -> Result<Option<StoredTestResult>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {TEST_COLUMNS} FROM personality_tests WHERE user_id = ?1
                     ORDER BY created_at DESC, rowid DESC LIMIT 1"
                ),
                params![user_id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("latest_test_result: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_test(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("latest_test_result: {e}"))),
        }
    }

    // ── Conversations ───────────────────────────────────────────────

    async fn append_conversation_entry(
        &self,
        entry: &ConversationEntry,
    ) -> Result<(), DatabaseError> {
        let (kind, triggered_by) = match &entry.kind {
            EntryKind::Chat => ("chat", None),
            EntryKind::Proactive { triggered_by_post } => {
                ("proactive", Some(triggered_by_post.as_str()))
            }
        };

        self.conn()
            .execute(
                "INSERT INTO conversations (id, user_id, persona_id, role, content, kind,
                    triggered_by_post, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    entry.id.to_string(),
                    entry.user_id.to_string(),
                    entry.persona_id.to_string(),
                    entry.role.as_str(),
                    entry.content.as_str(),
                    kind,
                    opt_text(triggered_by),
                    ts(&entry.created_at),
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("append_conversation_entry: {e}")))?;

        Ok(())
    }

    async fn recent_conversation(
        &self,
        user_id: Uuid,
        persona_id: Uuid,
        limit: usize,
    ) -> Result<Vec<ConversationEntry>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM conversations
                     WHERE user_id = ?1 AND persona_id = ?2
                     ORDER BY created_at DESC, rowid DESC LIMIT ?3"
                ),
                params![user_id.to_string(), persona_id.to_string(), limit as i64],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("recent_conversation: {e}")))?;

        let mut entries = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("recent_conversation: {e}")))?
        {
            entries.push(row_to_entry(&row)?);
        }
        entries.reverse();
        Ok(entries)
    }

    // ── SNS integrations ────────────────────────────────────────────

    async fn upsert_sns_integration(
        &self,
        new: NewSnsIntegration,
    ) -> Result<SnsIntegration, DatabaseError> {
        let now = ts(&Utc::now());
        let expires_at = new.token_expires_at.as_ref().map(ts);

        self.conn()
            .execute(
                "INSERT INTO sns_integrations (id, user_id, platform, platform_user_id,
                    access_token, refresh_token, token_expires_at, is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)
                 ON CONFLICT (user_id, platform) DO UPDATE SET
                    platform_user_id = excluded.platform_user_id,
                    access_token = excluded.access_token,
                    refresh_token = excluded.refresh_token,
                    token_expires_at = excluded.token_expires_at,
                    is_active = 1,
                    updated_at = excluded.updated_at",
                params![
                    Uuid::new_v4().to_string(),
                    new.user_id.to_string(),
                    new.platform.as_str(),
                    new.platform_user_id.as_str(),
                    new.access_token.expose_secret(),
                    opt_text(new.refresh_token.as_ref().map(|t| t.expose_secret())),
                    opt_text(expires_at.as_deref()),
                    now,
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("upsert_sns_integration: {e}")))?;

        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {INTEGRATION_COLUMNS} FROM sns_integrations
                     WHERE user_id = ?1 AND platform = ?2"
                ),
                params![new.user_id.to_string(), new.platform.as_str()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("upsert_sns_integration: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("upsert_sns_integration: {e}")))?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "sns_integration".into(),
                id: format!("{}/{}", new.user_id, new.platform),
            })?;

        let integration = row_to_integration(&row)?;
        info!(
            integration_id = %integration.id,
            user_id = %integration.user_id,
            platform = %integration.platform,
            "SNS integration saved"
        );
        Ok(integration)
    }

    async fn list_sns_integrations(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SnsIntegration>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {INTEGRATION_COLUMNS} FROM sns_integrations
                     WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC"
                ),
                params![user_id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_sns_integrations: {e}")))?;

        let mut integrations = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("list_sns_integrations: {e}")))?
        {
            integrations.push(row_to_integration(&row)?);
        }
        Ok(integrations)
    }

    async fn active_sns_integrations(
        &self,
        user_id: Uuid,
        platform: Option<Platform>,
    ) -> Result<Vec<SnsIntegration>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {INTEGRATION_COLUMNS} FROM sns_integrations
                     WHERE user_id = ?1 AND is_active = 1 AND (?2 IS NULL OR platform = ?2)
                     ORDER BY created_at ASC, rowid ASC"
                ),
                params![
                    user_id.to_string(),
                    opt_text(platform.as_ref().map(Platform::as_str))
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("active_sns_integrations: {e}")))?;

        let mut integrations = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("active_sns_integrations: {e}")))?
        {
            integrations.push(row_to_integration(&row)?);
        }
        Ok(integrations)
    }

    async fn deactivate_sns_integration(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let changed = self
            .conn()
            .execute(
                "UPDATE sns_integrations SET is_active = 0, updated_at = ?3
                 WHERE id = ?1 AND user_id = ?2",
                params![id.to_string(), user_id.to_string(), ts(&Utc::now())],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("deactivate_sns_integration: {e}")))?;

        if changed > 0 {
            info!(integration_id = %id, user_id = %user_id, "SNS integration deactivated");
        }
        Ok(changed > 0)
    }

    // ── Monitored posts ─────────────────────────────────────────────

    async fn get_monitored_post(
        &self,
        post_id: &str,
    ) -> Result<Option<MonitoredPost>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {POST_COLUMNS} FROM sns_posts_monitor WHERE post_id = ?1"),
                params![post_id],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_monitored_post: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_post(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_monitored_post: {e}"))),
        }
    }

    async fn insert_monitored_post(&self, post: &MonitoredPost) -> Result<bool, DatabaseError> {
        let inserted = self
            .conn()
            .execute(
                "INSERT INTO sns_posts_monitor (post_id, user_id, integration_id, platform,
                    content, sentiment_score, sentiment_label, trigger_alert,
                    post_created_at, analyzed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(post_id) DO NOTHING",
                params![
                    post.post_id.as_str(),
                    post.user_id.to_string(),
                    post.integration_id.to_string(),
                    post.platform.as_str(),
                    post.content.as_str(),
                    post.score,
                    post.label.as_str(),
                    post.trigger_alert as i64,
                    ts(&post.post_created_at),
                    ts(&post.analyzed_at),
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("insert_monitored_post: {e}")))?
            > 0;

        if inserted {
            debug!(post_id = %post.post_id, label = %post.label, "Monitored post stored");
        } else {
            debug!(post_id = %post.post_id, "Monitored post already stored");
        }
        Ok(inserted)
    }
}
