use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

/// Request to speak a caption
#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    /// Text to synthesize
    #[serde(default)]
    pub caption: String,

    /// Language override; falls back to the configured default
    #[serde(default)]
    pub language: Option<String>,
}

/// Speak a caption aloud.
///
/// `POST /speak-caption` with `{"caption": "..."}` returns the synthesized
/// MP3 bytes with an `audio/mpeg` content type. A missing or blank caption
/// is rejected before any synthesis work.
pub async fn speak_caption(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SpeakRequest>,
) -> ServerResult<Response> {
    let text = request.caption.trim();
    if text.is_empty() {
        return Err(ServerError::BadRequest("No caption provided".into()));
    }

    let language = request
        .language
        .as_deref()
        .unwrap_or(&state.config.tts_language);

    let audio = state.synthesizer.synthesize(text, language).await?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}
