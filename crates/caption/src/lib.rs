//! Caption decoding for captiond.
//!
//! This crate owns the only genuinely algorithmic piece of the service: the
//! greedy autoregressive loop that turns an image embedding into a sentence.
//!
//! Three parts:
//!
//! - [`Vocabulary`] - immutable word↔index mapping loaded once from a JSON
//!   artifact, with the `startseq`/`endseq` sentinels and index 0 reserved
//!   for padding.
//! - [`SequenceModel`] - the seam between the loop and whatever predicts the
//!   next-token distribution. Production uses [`OrtSequenceModel`]; tests use
//!   scripted doubles.
//! - [`generate`] - the loop itself. Strictly greedy, bounded, deterministic.
//!
//! Decoding never catches its own inference errors; they propagate to the
//! request boundary untouched.

pub mod decoder;
pub mod error;
pub mod model;
pub mod vocab;

pub use decoder::generate;
pub use error::CaptionError;
pub use model::{OrtSequenceModel, SequenceModel};
pub use vocab::{Vocabulary, END_TOKEN, START_TOKEN};
