use thiserror::Error;

/// Errors surfaced by speech synthesis.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Nothing to speak. Callers validate first; this is the backstop.
    #[error("no text to synthesize")]
    EmptyText,
    /// The TTS endpoint could not be reached or the transfer failed.
    #[error("tts request failed: {0}")]
    Http(String),
    /// The TTS endpoint answered with a non-success status.
    #[error("tts endpoint returned status {0}")]
    BadStatus(u16),
}
