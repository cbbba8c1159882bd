use std::io;
use thiserror::Error;

/// Errors surfaced by vocabulary loading and caption decoding.
#[derive(Debug, Error)]
pub enum CaptionError {
    /// The vocabulary artifact could not be read from disk.
    #[error("vocabulary artifact unreadable: {0}")]
    Io(#[from] io::Error),
    /// The vocabulary artifact is not the expected JSON shape.
    #[error("vocabulary artifact malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The artifact parsed but violates a vocabulary invariant
    /// (missing sentinel, reserved index 0 in use, duplicate index).
    #[error("invalid vocabulary: {0}")]
    InvalidVocabulary(String),
    /// The ONNX sequence model could not be loaded.
    #[error("sequence model load failed: {0}")]
    ModelLoad(String),
    /// A live token sequence outgrew the padded length. The decode loop's
    /// termination rule makes this unreachable in practice; encoding still
    /// refuses to truncate silently.
    #[error("sequence of {len} tokens exceeds maximum length {max}")]
    SequenceTooLong { len: usize, max: usize },
    /// The sequence model's forward pass failed.
    #[error("inference failure: {0}")]
    Inference(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_vocabulary() {
        let err = CaptionError::InvalidVocabulary("missing endseq".into());
        assert!(err.to_string().contains("invalid vocabulary"));
        assert!(err.to_string().contains("missing endseq"));
    }

    #[test]
    fn error_sequence_too_long() {
        let err = CaptionError::SequenceTooLong { len: 80, max: 74 };
        assert!(err.to_string().contains("80"));
        assert!(err.to_string().contains("74"));
    }

    #[test]
    fn error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err: CaptionError = io_err.into();
        assert!(err.to_string().contains("unreadable"));
    }
}
