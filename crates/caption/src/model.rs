use crate::CaptionError;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

/// Next-token predictor behind the decode loop.
///
/// Implementations take the image embedding and the current padded token
/// sequence and return a probability distribution over the full vocabulary
/// index space. Production uses [`OrtSequenceModel`]; tests use scripted
/// doubles.
pub trait SequenceModel: Send + Sync {
    fn predict_next(&self, features: &[f32], sequence: &[i64]) -> Result<Vec<f32>, CaptionError>;
}

/// Name of the embedding input on the exported caption model.
const FEATURES_INPUT: &str = "image_features";
/// Name of the padded token-sequence input on the exported caption model.
const SEQUENCE_INPUT: &str = "input_sequence";

/// ONNX-backed sequence model.
///
/// The exported artifact is declarative: two named tensor inputs, one
/// probability-vector output, no embedded executable code.
#[derive(Debug)]
pub struct OrtSequenceModel {
    session: Mutex<Session>,
}

impl OrtSequenceModel {
    /// Load the caption model from a declarative ONNX artifact.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self, CaptionError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(CaptionError::ModelLoad(format!(
                "caption model not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(2))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| CaptionError::ModelLoad(e.to_string()))?;

        for required in [FEATURES_INPUT, SEQUENCE_INPUT] {
            if !session.inputs.iter().any(|i| i.name == required) {
                return Err(CaptionError::ModelLoad(format!(
                    "caption model does not declare input `{required}`"
                )));
            }
        }

        tracing::info!(model = %path.display(), "caption model loaded");
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl SequenceModel for OrtSequenceModel {
    fn predict_next(&self, features: &[f32], sequence: &[i64]) -> Result<Vec<f32>, CaptionError> {
        let features_tensor = Tensor::from_array((vec![1i64, features.len() as i64], features.to_vec()))
            .map_err(|e| CaptionError::Inference(e.to_string()))?;
        let sequence_tensor = Tensor::from_array((vec![1i64, sequence.len() as i64], sequence.to_vec()))
            .map_err(|e| CaptionError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let outputs = session
            .run(ort::inputs![
                FEATURES_INPUT => features_tensor,
                SEQUENCE_INPUT => sequence_tensor
            ])
            .map_err(|e| CaptionError::Inference(e.to_string()))?;

        let (_, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| CaptionError::Inference(e.to_string()))?;
        if data.is_empty() {
            return Err(CaptionError::Inference(
                "caption model returned an empty distribution".into(),
            ));
        }

        Ok(data.to_vec())
    }
}
