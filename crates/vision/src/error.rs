use thiserror::Error;

/// Errors surfaced by feature extraction.
#[derive(Debug, Error)]
pub enum VisionError {
    /// The ONNX model file is missing on disk.
    #[error("encoder model not found: {0}")]
    ModelNotFound(String),
    /// The ONNX session could not be constructed from the artifact.
    #[error("encoder model load failed: {0}")]
    ModelLoad(String),
    /// The uploaded bytes are not a decodable image. A client error.
    #[error("invalid image: {0}")]
    InvalidImage(String),
    /// The forward pass itself failed.
    #[error("inference failure: {0}")]
    Inference(String),
}
