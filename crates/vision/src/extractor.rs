use crate::preprocess::{preprocess, INPUT_SIZE};
use crate::VisionError;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;

/// Frozen convolutional encoder: image bytes in, embedding vector out.
///
/// The ONNX session requires exclusive access for a forward pass, so it sits
/// behind a mutex. The session itself is immutable state; concurrent requests
/// serialize on the lock but share nothing else.
#[derive(Debug)]
pub struct FeatureExtractor {
    session: Mutex<Session>,
    input_name: String,
}

impl FeatureExtractor {
    /// Load the encoder from a declarative ONNX artifact.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self, VisionError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(VisionError::ModelNotFound(path.display().to_string()));
        }

        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(2))
            .and_then(|b| b.commit_from_file(path))
            .map_err(|e| VisionError::ModelLoad(e.to_string()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| {
                VisionError::ModelLoad("encoder model declares no inputs".into())
            })?;

        tracing::info!(model = %path.display(), input = %input_name, "encoder model loaded");
        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }

    /// Extract the embedding for one image.
    ///
    /// Pure with respect to the bytes: identical input yields an identical
    /// vector for the lifetime of the loaded session.
    pub fn extract(&self, image_bytes: &[u8]) -> Result<Vec<f32>, VisionError> {
        let tensor_data = preprocess(image_bytes)?;
        let shape = vec![1i64, 3, i64::from(INPUT_SIZE), i64::from(INPUT_SIZE)];
        let input = Tensor::from_array((shape, tensor_data))
            .map_err(|e| VisionError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|e| VisionError::Inference(e.to_string()))?;

        let (_, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| VisionError::Inference(e.to_string()))?;
        if data.is_empty() {
            return Err(VisionError::Inference(
                "encoder returned an empty embedding".into(),
            ));
        }

        Ok(data.to_vec())
    }
}
