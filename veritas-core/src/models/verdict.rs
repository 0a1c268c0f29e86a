use serde::{Deserialize, Serialize};

use super::{ClassificationResult, EvidenceSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Supported,
    Unverified,
    SearchUnavailable,
    ClassifiedReal,
    ClassifiedFake,
    ExtractionFailed,
    EmptyInput,
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Supported => "The claim appears to be supported by trusted sources.",
            Outcome::Unverified => "Could not verify the claim in trusted sources.",
            Outcome::SearchUnavailable => "Could not fetch search results.",
            Outcome::ClassifiedReal => "The News is Real!",
            Outcome::ClassifiedFake => "The News is Fake!",
            Outcome::ExtractionFailed => {
                "Could not extract content from the URL. Try a different source like BBC or Reuters."
            }
            Outcome::EmptyInput => "Please enter some text or a URL.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Supported => "supported",
            Outcome::Unverified => "unverified",
            Outcome::SearchUnavailable => "search_unavailable",
            Outcome::ClassifiedReal => "classified_real",
            Outcome::ClassifiedFake => "classified_fake",
            Outcome::ExtractionFailed => "extraction_failed",
            Outcome::EmptyInput => "empty_input",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result of one verification request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub outcome: Outcome,
    pub classification: Option<ClassificationResult>,
    pub evidence: Option<EvidenceSet>,
}

impl Verdict {
    pub fn empty_input() -> Self {
        Self::bare(Outcome::EmptyInput)
    }

    pub fn search_unavailable() -> Self {
        Self::bare(Outcome::SearchUnavailable)
    }

    pub fn extraction_failed() -> Self {
        Self::bare(Outcome::ExtractionFailed)
    }

    pub fn from_evidence(evidence: EvidenceSet, supported: bool) -> Self {
        Self {
            outcome: if supported {
                Outcome::Supported
            } else {
                Outcome::Unverified
            },
            classification: None,
            evidence: Some(evidence),
        }
    }

    pub fn from_classification(result: ClassificationResult) -> Self {
        Self {
            outcome: if result.is_real() {
                Outcome::ClassifiedReal
            } else {
                Outcome::ClassifiedFake
            },
            classification: Some(result),
            evidence: None,
        }
    }

    pub fn message(&self) -> &'static str {
        self.outcome.message()
    }

    fn bare(outcome: Outcome) -> Self {
        Self {
            outcome,
            classification: None,
            evidence: None,
        }
    }
}

/// Verdict for a URL submission plus what was extracted, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlReport {
    pub url: String,
    pub verdict: Verdict,
    pub preview: Option<String>,
}
