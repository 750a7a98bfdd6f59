//! SNS account linking and monitoring endpoints.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::pipeline::CheckReport;
use crate::store::{NewSnsIntegration, Platform, SnsIntegration};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ConnectRequest {
    user_id: Uuid,
    platform: Platform,
    platform_user_id: String,
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Token lifetime in seconds.
    #[serde(default)]
    expires_in: Option<i64>,
}

impl ConnectRequest {
    fn into_new_integration(self, now: DateTime<Utc>) -> Result<NewSnsIntegration, ApiError> {
        let mut problems = Vec::new();
        if self.platform_user_id.trim().is_empty() {
            problems.push("platformUserId must not be empty");
        }
        if self.access_token.is_empty() {
            problems.push("accessToken must not be empty");
        }
        if matches!(self.expires_in, Some(secs) if secs <= 0) {
            problems.push("expiresIn must be a positive number of seconds");
        }
        if !problems.is_empty() {
            return Err(ApiError::invalid(problems));
        }

        Ok(NewSnsIntegration {
            user_id: self.user_id,
            platform: self.platform,
            platform_user_id: self.platform_user_id,
            access_token: SecretString::from(self.access_token),
            refresh_token: self.refresh_token.map(SecretString::from),
            token_expires_at: self
                .expires_in
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| now.checked_add_signed(lifetime)),
        })
    }
}

/// Public view of an integration. Tokens are never included.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IntegrationView {
    id: Uuid,
    platform: Platform,
    platform_user_id: String,
    is_active: bool,
    token_expires_at: Option<DateTime<Utc>>,
    connected_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SnsIntegration> for IntegrationView {
    fn from(i: SnsIntegration) -> Self {
        Self {
            id: i.id,
            platform: i.platform,
            platform_user_id: i.platform_user_id,
            is_active: i.is_active,
            token_expires_at: i.token_expires_at,
            connected_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

/// POST /api/sns/connect
pub(super) async fn connect(
    State(state): State<AppState>,
    payload: Result<Json<ConnectRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    let platform = request.platform;
    let new = request.into_new_integration(Utc::now())?;

    let integration = state
        .db
        .upsert_sns_integration(new)
        .await
        .map_err(|e| ApiError::internal("Failed to save SNS integration", e))?;

    Ok(Json(json!({
        "success": true,
        "integration": IntegrationView::from(integration),
        "message": format!("Connected {platform} account"),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserQuery {
    user_id: Uuid,
}

/// GET /api/sns/connect?userId=
pub(super) async fn list(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let integrations: Vec<IntegrationView> = state
        .db
        .list_sns_integrations(query.user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch integrations", e))?
        .into_iter()
        .map(IntegrationView::from)
        .collect();

    Ok(Json(json!({
        "success": true,
        "integrations": integrations,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DisconnectQuery {
    integration_id: Uuid,
    user_id: Uuid,
}

/// DELETE /api/sns/connect?integrationId=&userId=
pub(super) async fn disconnect(
    State(state): State<AppState>,
    query: Result<Query<DisconnectQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let deactivated = state
        .db
        .deactivate_sns_integration(query.integration_id, query.user_id)
        .await
        .map_err(|e| ApiError::internal("Failed to disconnect integration", e))?;

    if !deactivated {
        return Err(ApiError::not_found("Integration not found"));
    }
    Ok(Json(json!({
        "success": true,
        "message": "SNS integration disconnected",
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CheckQuery {
    user_id: Uuid,
    #[serde(default)]
    platform: Option<Platform>,
}

#[derive(Debug, Serialize)]
pub(super) struct CheckResponse {
    success: bool,
    #[serde(flatten)]
    report: CheckReport,
    message: String,
}

/// GET /api/sns/check?userId=&platform=
pub(super) async fn check(
    State(state): State<AppState>,
    query: Result<Query<CheckQuery>, QueryRejection>,
) -> Result<Json<CheckResponse>, ApiError> {
    let Query(query) = query?;
    let report = state.monitor.check(query.user_id, query.platform).await?;

    let message = match report.alerts.len() {
        0 => "No concerning posts detected".to_string(),
        n => format!("{n} alert(s) detected"),
    };
    Ok(Json(CheckResponse {
        success: true,
        report,
        message,
    }))
}
