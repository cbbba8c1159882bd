//! Umbrella crate for the captiond image-captioning service.
//!
//! This crate stitches feature extraction and caption decoding together so
//! callers can go from raw image bytes to a caption string with a single
//! API entry point. The HTTP surface lives in `crates/server`; speech
//! synthesis in `crates/speech`.

pub use caption::{
    generate, CaptionError, OrtSequenceModel, SequenceModel, Vocabulary, END_TOKEN, START_TOKEN,
};
pub use speech::{SpeechError, SpeechSynthesizer, TranslateTts};
pub use vision::{FeatureExtractor, VisionError};

use std::path::Path;
use thiserror::Error;

/// Errors that can occur while captioning an image through the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("feature extraction failure: {0}")]
    Vision(#[from] VisionError),
    #[error("caption decoding failure: {0}")]
    Caption(#[from] CaptionError),
}

impl PipelineError {
    /// Whether the failure was caused by the caller's input rather than the
    /// service. The request boundary maps this to a client-error status.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::Vision(VisionError::InvalidImage(_)))
    }
}

/// Image bytes in, caption out.
///
/// The seam between the HTTP layer and the pipeline, so handlers can be
/// exercised against doubles without any model artifacts on disk.
pub trait Captioner: Send + Sync {
    fn caption(&self, image_bytes: &[u8]) -> Result<String, PipelineError>;
}

/// The loaded inference context: encoder, sequence model, and vocabulary.
///
/// Constructed once at process start and shared read-only across requests;
/// nothing here mutates after load. Requests allocate their own embedding
/// and token sequence, so no cross-request coordination is needed beyond
/// the per-session locks inside the models.
pub struct CaptionPipeline {
    extractor: FeatureExtractor,
    model: OrtSequenceModel,
    vocabulary: Vocabulary,
}

impl CaptionPipeline {
    /// Load all three artifacts. Any failure here is a startup-time load
    /// error; the caller decides whether to run degraded or abort.
    pub fn load<P: AsRef<Path>>(
        encoder_path: P,
        caption_model_path: P,
        vocabulary_path: P,
    ) -> Result<Self, PipelineError> {
        let extractor = FeatureExtractor::load(encoder_path)?;
        let model = OrtSequenceModel::load(caption_model_path)?;
        let vocabulary = Vocabulary::from_file(vocabulary_path)?;
        Ok(Self {
            extractor,
            model,
            vocabulary,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Run the full pipeline: extract the embedding, then decode greedily up
    /// to the vocabulary's trained maximum length.
    pub fn caption_image(&self, image_bytes: &[u8]) -> Result<String, PipelineError> {
        let features = self.extractor.extract(image_bytes)?;
        let caption = generate(
            &self.model,
            &self.vocabulary,
            &features,
            self.vocabulary.max_length(),
        )?;
        tracing::debug!(words = caption.split_whitespace().count(), "caption generated");
        Ok(caption)
    }
}

impl Captioner for CaptionPipeline {
    fn caption(&self, image_bytes: &[u8]) -> Result<String, PipelineError> {
        self.caption_image(image_bytes)
    }
}
