pub mod classifier;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod ipc;
pub mod models;
pub mod onnx_classifier;
pub mod search;
pub mod vectorizer;
pub mod verifier;

pub use classifier::{
    create_backend, ArtifactPaths, BackendConfig, ClassifierError, LinearClassifier,
    LinearModelArtifact, TextClassifier,
};
pub use config::VeritasConfig;
pub use error::{VeritasError, VerifyError};
pub use fetcher::{ArticleFetcher, ArticleSource, FetchError};
pub use models::{ClassificationResult, Claim, EvidenceSet, Label, Outcome, UrlReport, Verdict};
pub use onnx_classifier::OnnxClassifier;
pub use search::{EvidenceSearch, SearchError, SerpApiConfig, SerpApiSearch};
pub use vectorizer::TfidfVectorizer;
pub use verifier::VerificationRouter;
