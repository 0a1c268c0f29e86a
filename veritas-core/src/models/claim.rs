use serde::{Deserialize, Serialize};

/// A unit of user-submitted text awaiting verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claim {
    content: String,
}

impl Claim {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.content
    }

    pub fn trimmed(&self) -> &str {
        self.content.trim()
    }

    pub fn is_empty(&self) -> bool {
        self.trimmed().is_empty()
    }

    /// Whitespace-delimited tokens of the trimmed content.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.content.split_whitespace()
    }

    pub fn word_count(&self) -> usize {
        self.tokens().count()
    }
}

impl From<&str> for Claim {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Claim {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
