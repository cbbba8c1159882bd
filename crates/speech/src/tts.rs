use crate::{SpeechError, SpeechSynthesizer};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};

/// The endpoint refuses queries longer than this, so text is split on
/// whitespace into chunks below the limit and the MP3 responses are
/// concatenated (MP3 frame streams concatenate legally).
const MAX_CHUNK_CHARS: usize = 100;

/// Speech synthesis via the Google Translate TTS endpoint.
pub struct TranslateTts {
    client: reqwest::Client,
    endpoint: String,
}

impl TranslateTts {
    pub const DEFAULT_ENDPOINT: &'static str = "https://translate.google.com/translate_tts";

    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for TranslateTts {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl SpeechSynthesizer for TranslateTts {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Bytes, SpeechError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        let total = chunks.len();
        let mut audio = BytesMut::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            tracing::debug!(idx, total, chars = chunk.chars().count(), "tts chunk");
            let total_param = total.to_string();
            let idx_param = idx.to_string();
            let textlen_param = chunk.chars().count().to_string();
            let response = self
                .client
                .get(&self.endpoint)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language),
                    ("q", chunk.as_str()),
                    ("total", total_param.as_str()),
                    ("idx", idx_param.as_str()),
                    ("textlen", textlen_param.as_str()),
                ])
                .send()
                .await
                .map_err(|e| SpeechError::Http(e.to_string()))?;

            if !response.status().is_success() {
                return Err(SpeechError::BadStatus(response.status().as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| SpeechError::Http(e.to_string()))?;
            audio.extend_from_slice(&body);
        }

        Ok(audio.freeze())
    }
}

/// Split text on whitespace into chunks of at most `max_chars` characters.
/// A single word longer than the limit becomes its own chunk rather than
/// being cut mid-word.
fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        let needed = if current.is_empty() {
            word_chars
        } else {
            current_chars + 1 + word_chars
        };

        if needed > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_chars += 1;
        }
        current.push_str(word);
        current_chars += word_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
