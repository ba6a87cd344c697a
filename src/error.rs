use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Metadata service unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Inference service unavailable: {0}")]
    InferenceUnavailable(String),

    #[error("Malformed inference response: {0}")]
    InferenceMalformed(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classifies a reqwest transport failure against the metadata service
    pub fn metadata(err: reqwest::Error) -> Self {
        AppError::MetadataUnavailable(err.to_string())
    }

    /// Classifies a reqwest transport failure against the inference service
    pub fn inference(err: reqwest::Error) -> Self {
        AppError::InferenceUnavailable(err.to_string())
    }
}

// Extractor rejections are client errors and share the `{error}` body
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MetadataUnavailable(_)
            | AppError::InferenceUnavailable(_)
            | AppError::InferenceMalformed(_) => {
                tracing::error!(error = %self, "Upstream call failed");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Cache(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
