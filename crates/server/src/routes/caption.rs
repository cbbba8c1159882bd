use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;

/// Response from captioning an uploaded image
#[derive(Debug, Serialize)]
pub struct CaptionResponse {
    pub caption: String,
}

/// Generate a caption for an uploaded image.
///
/// `POST /generate-caption` with a multipart body whose `image` field holds
/// the raw image bytes. Runs the full pipeline: decode → embed → greedy
/// decode. The pipeline is blocking ONNX work, so it runs on a blocking
/// thread rather than the async executor.
///
/// Errors: 500 `NOT_LOADED` if artifacts failed to load at startup, 400 if
/// the `image` field is missing or the bytes are not a decodable image.
pub async fn generate_caption(
    State(state): State<Arc<ServerState>>,
    mut multipart: Multipart,
) -> ServerResult<impl IntoResponse> {
    let captioner = state.captioner.clone().ok_or(ServerError::NotLoaded)?;

    let mut image: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("image") {
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Unreadable image field: {e}")))?;
            image = Some(data);
        }
    }

    let image = image.ok_or_else(|| ServerError::BadRequest("No image file uploaded".into()))?;

    let caption = tokio::task::spawn_blocking(move || captioner.caption(&image))
        .await
        .map_err(|e| ServerError::Internal(format!("join error: {e}")))??;

    Ok(Json(CaptionResponse { caption }))
}
