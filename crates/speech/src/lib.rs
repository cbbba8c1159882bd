//! Speech synthesis for captiond.
//!
//! Turns a caption string into an MP3 byte stream. The service treats the
//! engine as opaque: [`SpeechSynthesizer`] is the seam, [`TranslateTts`] is
//! the production implementation (the Google Translate TTS endpoint, the
//! same engine the service has always spoken through), and tests inject
//! doubles.

pub mod error;
mod tts;

pub use error::SpeechError;
pub use tts::TranslateTts;

use async_trait::async_trait;
use bytes::Bytes;

/// Caption text + language in, audio bytes out.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Bytes, SpeechError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesizer_is_object_safe() {
        fn assert_dyn(_: &dyn SpeechSynthesizer) {}
        let tts = TranslateTts::default();
        assert_dyn(&tts);
    }
}
