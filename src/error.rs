//! Error types for friend-ai.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited")]
    RateLimited { provider: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },
}

/// Rejections of a questionnaire submission before it reaches the classifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Expected {expected} answers, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("Question id {0} is outside 1-60")]
    QuestionOutOfRange(u8),

    #[error("Question id {0} answered more than once")]
    DuplicateQuestion(u8),

    #[error("Rating {rating} for question {question_id} is outside 1-5")]
    RatingOutOfRange { question_id: u8, rating: u8 },

    #[error("Invalid personality type '{0}', expected a code like INTJ or ENFP")]
    InvalidType(String),
}

/// SNS monitoring pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Post fetch failed for {platform}: {reason}")]
    PostFetch { platform: String, reason: String },

    #[error("Proactive message generation failed: {0}")]
    Generation(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_type(code: &str) -> Result<()> {
        Err(ValidationError::InvalidType(code.to_string()).into())
    }

    #[test]
    fn concern_errors_lift_into_top_level() {
        let err = lookup_type("XXXX").unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidType(_))));
        assert!(err.to_string().starts_with("Validation error: "));

        let err: Error = PipelineError::from(DatabaseError::Query("locked".into())).into();
        assert_eq!(err.to_string(), "Pipeline error: Database error: Query failed: locked");
    }
}
