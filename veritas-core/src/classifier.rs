//! Classifier module for Veritas: pluggable real/fake text classification
//!
//! Provides a `TextClassifier` trait with implementations for:
//! - **Linear**: TF-IDF features scored by logistic-regression weights from JSON
//! - **ONNX**: TF-IDF features fed to an exported ONNX linear model
//!
//! Both backends share one `TfidfVectorizer` artifact. Artifacts are loaded once
//! at startup and are read-only afterwards.

use async_trait::async_trait;
use ndarray::Array1;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::models::{ClassificationResult, Label};
use crate::vectorizer::TfidfVectorizer;

// ============================================================================
// TextClassifier trait
// ============================================================================

/// Abstraction over pre-trained binary news classifiers.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Classify a text as real or fake.
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifierError>;

    /// Number of input features the model expects.
    fn n_features(&self) -> usize;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Classifier artifact not found at {path}")]
    ArtifactNotFound { path: String },

    #[error("Invalid classifier artifact: {0}")]
    InvalidArtifact(String),

    #[error("Feature mismatch: vectorizer produces {vectorizer} features, model expects {model}")]
    FeatureMismatch { vectorizer: usize, model: usize },

    #[error("Unknown classifier backend: {0}")]
    UnknownBackend(String),

    #[error("ONNX inference error: {0}")]
    OnnxInference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Config types
// ============================================================================

/// Artifact locations shared by every backend.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub vectorizer_path: PathBuf,
    pub model_path: PathBuf,
}

/// Configuration union for the backend factory.
pub enum BackendConfig {
    Linear(ArtifactPaths),
    Onnx(ArtifactPaths),
}

impl BackendConfig {
    /// Select a backend from the `[classifier]` config section.
    pub fn from_config(config: &crate::config::ClassifierConfig) -> Result<Self, ClassifierError> {
        let paths = ArtifactPaths {
            vectorizer_path: expand_path(&config.vectorizer_path),
            model_path: expand_path(&config.model_path),
        };
        match config.backend.as_str() {
            "linear" => Ok(BackendConfig::Linear(paths)),
            "onnx" => Ok(BackendConfig::Onnx(paths)),
            other => Err(ClassifierError::UnknownBackend(other.to_string())),
        }
    }
}

/// Create the appropriate backend from configuration.
pub fn create_backend(config: BackendConfig) -> Result<Box<dyn TextClassifier>, ClassifierError> {
    match config {
        BackendConfig::Linear(paths) => Ok(Box::new(LinearClassifier::load(&paths)?)),
        BackendConfig::Onnx(paths) => {
            let vectorizer = TfidfVectorizer::load(&paths.vectorizer_path)?;
            Ok(Box::new(crate::onnx_classifier::OnnxClassifier::new(
                vectorizer,
                &paths.model_path,
            )?))
        }
    }
}

/// Expand `~` and environment variables in an artifact path.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            tracing::warn!(path = raw, error = %e, "Could not expand artifact path, using it verbatim");
            PathBuf::from(raw)
        }
    }
}

// ============================================================================
// LinearClassifier
// ============================================================================

/// Logistic-regression weights exported from a fitted binary model.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModelArtifact {
    pub coef: Vec<f64>,
    pub intercept: f64,
    /// Class values in model order; the positive class is `classes[1]`.
    #[serde(default = "default_classes")]
    pub classes: [i64; 2],
}

fn default_classes() -> [i64; 2] {
    [0, 1]
}

impl LinearModelArtifact {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ArtifactNotFound {
                path: path.display().to_string(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| ClassifierError::InvalidArtifact(format!("{}: {e}", path.display())))
    }
}

/// Pure-Rust TF-IDF + logistic regression classifier.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    vectorizer: Arc<TfidfVectorizer>,
    coef: Array1<f64>,
    intercept: f64,
    classes: [i64; 2],
}

impl LinearClassifier {
    pub fn new(
        vectorizer: TfidfVectorizer,
        model: LinearModelArtifact,
    ) -> Result<Self, ClassifierError> {
        if model.coef.len() != vectorizer.n_features() {
            return Err(ClassifierError::FeatureMismatch {
                vectorizer: vectorizer.n_features(),
                model: model.coef.len(),
            });
        }
        Ok(Self {
            vectorizer: Arc::new(vectorizer),
            coef: Array1::from(model.coef),
            intercept: model.intercept,
            classes: model.classes,
        })
    }

    /// Load both artifacts from disk. Either one missing is an error.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ClassifierError> {
        let vectorizer = TfidfVectorizer::load(&paths.vectorizer_path)?;
        let model = LinearModelArtifact::load(&paths.model_path)?;
        Self::new(vectorizer, model)
    }

    fn score(&self, text: &str) -> ClassificationResult {
        let features = self.vectorizer.transform(text);
        let z = features.dot(&self.coef) + self.intercept;
        let p_positive = sigmoid(z);

        let label_class = if p_positive > 0.5 {
            self.classes[1]
        } else {
            self.classes[0]
        };
        let label = Label::from_class(label_class);
        let p_real = if self.classes[1] == 1 {
            p_positive
        } else {
            1.0 - p_positive
        };
        ClassificationResult::from_probability_real(label, p_real)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[async_trait]
impl TextClassifier for LinearClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ClassifierError> {
        Ok(self.score(text))
    }

    fn n_features(&self) -> usize {
        self.vectorizer.n_features()
    }

    fn name(&self) -> &str {
        "linear"
    }
}

// ============================================================================
// TESTS
// ============================================================================
