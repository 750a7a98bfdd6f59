//! HTTP error mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::error::{DatabaseError, LlmError, PipelineError, ValidationError};

/// Errors a handler can return; each maps to one status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 400 with `{error, details}`.
    #[error("{message}")]
    Invalid { message: String, details: Vec<String> },

    /// 404 with `{error}`.
    #[error("{0}")]
    NotFound(String),

    /// 500 with `{error}`; the cause is logged, never returned.
    #[error("{public}: {cause}")]
    Internal { public: &'static str, cause: String },
}

impl ApiError {
    pub fn invalid(details: impl IntoIterator<Item = impl ToString>) -> Self {
        Self::Invalid {
            message: "Invalid input".into(),
            details: details.into_iter().map(|d| d.to_string()).collect(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn internal(public: &'static str, cause: impl ToString) -> Self {
        Self::Internal {
            public,
            cause: cause.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Invalid { message, details } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": message, "details": details })),
            )
                .into_response(),
            Self::NotFound(what) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": what }))).into_response()
            }
            Self::Internal { public, cause } => {
                error!(error = %cause, "{public}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": public })),
                )
                    .into_response()
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::invalid([e])
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::invalid([e.body_text()])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::invalid([e.body_text()])
    }
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        Self::internal("Database error", e)
    }
}

impl From<LlmError> for ApiError {
    fn from(e: LlmError) -> Self {
        Self::internal("Failed to generate AI response", e)
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        Self::internal("SNS check failed", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_details() {
        let response = ApiError::from(ValidationError::WrongCount {
            expected: 60,
            actual: 3,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid input");
        assert_eq!(body["details"][0], "Expected 60 answers, got 3");
    }

    #[tokio::test]
    async fn internal_hides_cause() {
        let response =
            ApiError::from(DatabaseError::Query("disk I/O error".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Database error" }));
    }
}
