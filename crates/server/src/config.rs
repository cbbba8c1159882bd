use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS (the API is consumed from browsers on other origins)
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Frozen CNN encoder artifact (ONNX)
    #[serde(default = "default_encoder_path")]
    pub encoder_path: String,

    /// Caption sequence-model artifact (ONNX)
    #[serde(default = "default_caption_model_path")]
    pub caption_model_path: String,

    /// Vocabulary artifact (JSON)
    #[serde(default = "default_vocabulary_path")]
    pub vocabulary_path: String,

    /// TTS endpoint URL
    #[serde(default = "default_tts_endpoint")]
    pub tts_endpoint: String,

    /// Language requests are spoken in unless they ask otherwise
    #[serde(default = "default_tts_language")]
    pub tts_language: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            encoder_path: default_encoder_path(),
            caption_model_path: default_caption_model_path(),
            vocabulary_path: default_vocabulary_path(),
            tts_endpoint: default_tts_endpoint(),
            tts_language: default_tts_language(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("captiond").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("CAPTIOND").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_encoder_path() -> String {
    "models/encoder.onnx".to_string()
}

fn default_caption_model_path() -> String {
    "models/caption.onnx".to_string()
}

fn default_vocabulary_path() -> String {
    "models/vocabulary.json".to_string()
}

fn default_tts_endpoint() -> String {
    speech::TranslateTts::DEFAULT_ENDPOINT.to_string()
}

fn default_tts_language() -> String {
    "en".to_string()
}
