use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::fetcher::FetchError;
use crate::search::SearchError;

/// Startup and wiring failures.
#[derive(Error, Debug)]
pub enum VeritasError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Fetcher error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures that escape the verification router.
///
/// Fetch and search faults never show up here: those collaborators collapse
/// their errors into "no result" before the router sees them.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("classification failed: {0}")]
    Classifier(#[from] ClassifierError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_error_wraps_classifier_message() {
        let err: VerifyError = ClassifierError::OnnxInference("bad output".to_string()).into();
        assert!(err.to_string().contains("bad output"));
    }

    #[test]
    fn test_startup_error_from_missing_artifact() {
        let err: VeritasError = ClassifierError::ArtifactNotFound {
            path: "models/model.json".to_string(),
        }
        .into();
        assert!(matches!(err, VeritasError::Classifier(_)));
        assert!(err.to_string().contains("models/model.json"));
    }
}
