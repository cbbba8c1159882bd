//! Image feature extraction for captiond.
//!
//! Given raw image bytes, this crate produces the fixed-length embedding the
//! caption decoder consumes. The heavy lifting is a frozen convolutional
//! network exported to ONNX with its classification head removed, so the
//! model's single output *is* the penultimate-layer activation.
//!
//! Preprocessing follows the convention the network was trained with:
//! decode → resize to 224x224 → NCHW float tensor in BGR channel order with
//! per-channel mean subtraction. No scaling to [0, 1].
//!
//! ```no_run
//! use vision::FeatureExtractor;
//!
//! let extractor = FeatureExtractor::load("models/encoder.onnx").unwrap();
//! let image_bytes = std::fs::read("dog.jpg").unwrap();
//! let embedding = extractor.extract(&image_bytes).unwrap();
//! assert!(!embedding.is_empty());
//! ```

pub mod error;
mod extractor;
mod preprocess;

pub use error::VisionError;
pub use extractor::FeatureExtractor;
pub use preprocess::{preprocess, CHANNEL_MEANS_BGR, INPUT_SIZE};
