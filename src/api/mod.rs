//! REST endpoints for the questionnaire, personas, chat and SNS monitoring.

mod character;
mod chat;
pub mod error;
mod questionnaire;
mod sns;

use std::sync::Arc;

use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::companion::CompanionEngine;
use crate::pipeline::SnsMonitor;
use crate::store::Database;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub companion: Arc<CompanionEngine>,
    pub monitor: Arc<SnsMonitor>,
}

/// Build the full router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/test/submit", post(questionnaire::submit))
        .route("/api/character/{type}", get(character::get_character))
        .route("/api/chat", post(chat::chat))
        .route(
            "/api/sns/connect",
            post(sns::connect).get(sns::list).delete(sns::disconnect),
        )
        .route("/api/sns/check", get(sns::check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "friend-ai"
    }))
}
