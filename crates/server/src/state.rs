use crate::config::ServerConfig;
use captiond::{CaptionPipeline, Captioner};
use speech::{SpeechSynthesizer, TranslateTts};
use std::sync::Arc;

/// Shared application state
///
/// Built once at startup and handed to every request by `Arc`. The pipeline
/// and synthesizer are read-only after construction; requests share them
/// without any cross-request locking.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Loaded caption pipeline, or `None` if the artifacts failed to load.
    /// A failed load leaves the service running but degraded: every caption
    /// request answers `NOT_LOADED` until a restart with good artifacts.
    pub captioner: Option<Arc<dyn Captioner>>,

    /// Why the pipeline is unavailable, surfaced by the readiness probe.
    pub load_error: Option<String>,

    /// Speech synthesis engine (shared across requests)
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl ServerState {
    /// Create new server state, attempting the one-time artifact load.
    pub fn new(config: ServerConfig) -> Self {
        let synthesizer: Arc<dyn SpeechSynthesizer> =
            Arc::new(TranslateTts::new(config.tts_endpoint.clone()));

        let (captioner, load_error) = match CaptionPipeline::load(
            &config.encoder_path,
            &config.caption_model_path,
            &config.vocabulary_path,
        ) {
            Ok(pipeline) => {
                tracing::info!(
                    words = pipeline.vocabulary().len(),
                    max_length = pipeline.vocabulary().max_length(),
                    "caption pipeline loaded"
                );
                (Some(Arc::new(pipeline) as Arc<dyn Captioner>), None)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "failed to load caption artifacts; captioning disabled until restart"
                );
                (None, Some(e.to_string()))
            }
        };

        Self {
            config: Arc::new(config),
            captioner,
            load_error,
            synthesizer,
        }
    }

    /// Build state from explicit components. Used by tests to inject doubles.
    pub fn with_components(
        config: ServerConfig,
        captioner: Option<Arc<dyn Captioner>>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let load_error = if captioner.is_none() {
            Some("caption pipeline not loaded".to_string())
        } else {
            None
        };
        Self {
            config: Arc::new(config),
            captioner,
            load_error,
            synthesizer,
        }
    }

    /// Whether caption requests can be served.
    pub fn is_loaded(&self) -> bool {
        self.captioner.is_some()
    }
}
