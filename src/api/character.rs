//! GET /api/character/{type}

use axum::Json;
use axum::extract::{Path, State};

use super::{ApiError, AppState};
use crate::persona::Persona;
use crate::personality::PersonalityType;

pub(super) async fn get_character(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Persona>, ApiError> {
    let personality_type: PersonalityType = code.parse()?;
    let persona = state
        .db
        .get_persona_by_type(personality_type)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Character not found for {personality_type}")))?;
    Ok(Json(persona))
}
