//! API route handlers
//!
//! Routes are organized by functionality:
//!
//! - `caption`: multipart image upload → caption string
//! - `speech`: caption string → spoken MP3 audio
//! - `health`: liveness and readiness probes

pub mod caption;
pub mod health;
pub mod speech;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Root endpoint (GET /), the API banner.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "message": "Image Captioning API is running."
    })))
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
