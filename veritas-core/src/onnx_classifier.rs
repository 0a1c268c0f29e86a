//! ONNX classifier backend: local inference of an exported linear model
//!
//! Uses the `ort` crate for ONNX Runtime. The model takes the TF-IDF row as a
//! `float_input` tensor of shape `[1, n_features]` and returns a `label` tensor
//! plus a `[1, 2]` `probabilities` tensor (class 1 = real). Export the model
//! with ZipMap disabled so probabilities come back as a plain tensor.

use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::classifier::{ClassifierError, TextClassifier};
use crate::models::{ClassificationResult, Label};
use crate::vectorizer::TfidfVectorizer;

pub const INPUT_NAME: &str = "float_input";
pub const LABEL_OUTPUT: &str = "label";
pub const PROBABILITIES_OUTPUT: &str = "probabilities";

/// Local ONNX classifier over TF-IDF features.
pub struct OnnxClassifier {
    session: Arc<Mutex<Session>>,
    vectorizer: Arc<TfidfVectorizer>,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("n_features", &self.vectorizer.n_features())
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Create a new ONNX classifier.
    ///
    /// Returns `ClassifierError::ArtifactNotFound` if the model file is missing.
    pub fn new(vectorizer: TfidfVectorizer, model_path: &Path) -> Result<Self, ClassifierError> {
        if !model_path.exists() {
            return Err(ClassifierError::ArtifactNotFound {
                path: model_path.display().to_string(),
            });
        }

        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(1))
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| ClassifierError::OnnxInference(e.to_string()))?;

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            vectorizer: Arc::new(vectorizer),
        })
    }
}

#[async_trait]
impl TextClassifier for OnnxClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifierError> {
        // CPU-bound, so run on the blocking thread pool.
        let session = Arc::clone(&self.session);
        let vectorizer = Arc::clone(&self.vectorizer);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let mut session_guard = session.lock().map_err(|e| {
                ClassifierError::OnnxInference(format!("session lock poisoned: {e}"))
            })?;
            classify_sync(&mut session_guard, &vectorizer, &text)
        })
        .await
        .map_err(|e| ClassifierError::OnnxInference(format!("spawn_blocking join error: {e}")))?
    }

    fn n_features(&self) -> usize {
        self.vectorizer.n_features()
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

/// Run ONNX inference synchronously.
fn classify_sync(
    session: &mut Session,
    vectorizer: &TfidfVectorizer,
    text: &str,
) -> Result<ClassificationResult, ClassifierError> {
    // 1. Vectorize
    let features: Vec<f32> = vectorizer.transform(text).iter().map(|&v| v as f32).collect();
    let shape = vec![1i64, features.len() as i64];

    let input = Tensor::from_array((shape, features))
        .map_err(|e| ClassifierError::OnnxInference(e.to_string()))?;

    // 2. Run session
    let outputs = session
        .run(ort::inputs! { INPUT_NAME => input })
        .map_err(|e| ClassifierError::OnnxInference(e.to_string()))?;

    // 3. Extract label and class probabilities
    let (_, labels) = outputs[LABEL_OUTPUT]
        .try_extract_tensor::<i64>()
        .map_err(|e| ClassifierError::OnnxInference(e.to_string()))?;
    let (_, probs) = outputs[PROBABILITIES_OUTPUT]
        .try_extract_tensor::<f32>()
        .map_err(|e| ClassifierError::OnnxInference(e.to_string()))?;

    let label = labels
        .first()
        .copied()
        .ok_or_else(|| ClassifierError::OnnxInference("empty label output".to_string()))?;

    result_from_outputs(label, &probs[..])
}

/// Map the model's predicted class and `[p_fake, p_real]` row to a result.
fn result_from_outputs(label: i64, probs: &[f32]) -> Result<ClassificationResult, ClassifierError> {
    let [p_fake, p_real] = probs else {
        return Err(ClassifierError::OnnxInference(format!(
            "Expected 2 class probabilities, got {}",
            probs.len()
        )));
    };

    Ok(ClassificationResult::from_pair(
        Label::from_class(label),
        f64::from(*p_real),
        f64::from(*p_fake),
    ))
}

// ============================================================================
// TESTS
// ============================================================================
