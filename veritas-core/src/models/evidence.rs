use serde::{Deserialize, Serialize};

/// Search snippets in provider rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceSet {
    snippets: Vec<String>,
}

impl EvidenceSet {
    pub fn new(snippets: Vec<String>) -> Self {
        Self { snippets }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn snippets(&self) -> &[String] {
        &self.snippets
    }

    /// True when a single snippet contains every claim token, compared
    /// case-insensitively as substrings. Tokens spread across different
    /// snippets do not count.
    pub fn supports<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> bool {
        let tokens: Vec<String> = tokens.into_iter().map(str::to_lowercase).collect();
        self.snippets.iter().any(|snippet| {
            let snippet = snippet.to_lowercase();
            tokens.iter().all(|token| snippet.contains(token.as_str()))
        })
    }
}

impl From<Vec<String>> for EvidenceSet {
    fn from(snippets: Vec<String>) -> Self {
        Self::new(snippets)
    }
}
