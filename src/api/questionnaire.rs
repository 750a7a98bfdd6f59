//! POST /api/test/submit

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::persona::Persona;
use crate::personality::{Answer, AnswerSet, AxisPercentages, PersonalityType, classify};
use crate::store::StoredTestResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubmitRequest {
    user_id: Uuid,
    answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubmitResponse {
    success: bool,
    test_id: Uuid,
    mbti_type: PersonalityType,
    scores: AxisPercentages,
    character: Persona,
}

pub(super) async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(request) = payload?;

    let answer_set = AnswerSet::new(request.answers.clone())?;
    let classification = classify(&answer_set);
    let personality_type = classification.personality_type;

    let persona = state
        .db
        .get_persona_by_type(personality_type)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Character not found for MBTI type {personality_type}"))
        })?;

    let result = StoredTestResult {
        id: Uuid::new_v4(),
        user_id: request.user_id,
        persona_id: persona.id,
        personality_type,
        answers: request.answers,
        scores: classification.scores,
        percentages: classification.percentages,
        created_at: Utc::now(),
    };
    state
        .db
        .insert_test_result(&result)
        .await
        .map_err(|e| ApiError::internal("Failed to save test result", e))?;

    info!(
        user_id = %request.user_id,
        test_id = %result.id,
        mbti_type = %personality_type,
        "Personality test submitted"
    );

    Ok(Json(SubmitResponse {
        success: true,
        test_id: result.id,
        mbti_type: personality_type,
        scores: classification.percentages,
        character: persona,
    }))
}
