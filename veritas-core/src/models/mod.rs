pub mod article;
pub mod claim;
pub mod classification;
pub mod evidence;
pub mod verdict;

pub use article::{preview, ArticleContent, PREVIEW_CHARS};
pub use claim::Claim;
pub use classification::{ClassificationResult, Label};
pub use evidence::EvidenceSet;
pub use verdict::{Outcome, UrlReport, Verdict};
