use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // Pre-generation validation
    #[error("Invalid generation options: {0}")]
    InvalidOptions(String),

    #[error("Lesson has no extractable text")]
    EmptyLessonContent,

    // Talking to the model
    #[error("Generation service unavailable: {0}")]
    GenerationUnavailable(String),

    // Post-generation validation of the model's output
    #[error("Model returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("Model generated {actual} questions but {expected} were requested")]
    QuestionCountMismatch { expected: usize, actual: usize },

    #[error("Model produced a question with invalid type: {0}")]
    InvalidQuestionType(String),

    // Grading-time policy
    #[error("Retakes are not allowed for this quiz")]
    RetakeNotAllowed,

    #[error("Question does not belong to this quiz")]
    UnauthorizedQuestion,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::InvalidOptions(_) | Error::EmptyLessonContent => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            Error::GenerationUnavailable(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            Error::MalformedResponse(_)
            | Error::QuestionCountMismatch { .. }
            | Error::InvalidQuestionType(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            Error::RetakeNotAllowed => (StatusCode::FORBIDDEN, self.to_string()),
            Error::UnauthorizedQuestion => (StatusCode::FORBIDDEN, self.to_string()),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Reqwest(err) => (
                StatusCode::BAD_GATEWAY,
                format!("External service error: {}", err),
            ),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Anyhow(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::Database(other),
        }
    }
}
