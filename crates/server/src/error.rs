use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Caption model or vocabulary not loaded")]
    NotLoaded,

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] captiond::PipelineError),

    #[error("Speech synthesis error: {0}")]
    Speech(#[from] speech::SpeechError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Undecodable uploads are the caller's fault; everything else in
            // the pipeline is ours.
            ServerError::Pipeline(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ServerError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::NotLoaded => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Speech(speech::SpeechError::EmptyText) => StatusCode::BAD_REQUEST,
            ServerError::Speech(_) => StatusCode::BAD_GATEWAY,
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::NotLoaded => "NOT_LOADED",
            ServerError::Pipeline(e) if e.is_client_error() => "INVALID_IMAGE",
            ServerError::Pipeline(_) => "PIPELINE_ERROR",
            ServerError::Speech(speech::SpeechError::EmptyText) => "BAD_REQUEST",
            ServerError::Speech(_) => "SPEECH_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}
