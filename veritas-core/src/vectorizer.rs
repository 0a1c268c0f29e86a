//! TF-IDF vectorizer loaded from an exported scikit-learn `TfidfVectorizer`.
//!
//! The artifact is a JSON document holding the fitted vocabulary and IDF
//! weights, plus the handful of preprocessing options that affect `transform`.

use ndarray::Array1;
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::classifier::ClassifierError;

/// scikit-learn's default token pattern.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

/// On-disk vectorizer artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
    #[serde(default)]
    pub token_pattern: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Array1<f64>,
    lowercase: bool,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    sublinear_tf: bool,
    norm: Norm,
    token_pattern: Regex,
}

impl TfidfVectorizer {
    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self, ClassifierError> {
        let n = artifact.idf.len();
        if artifact.vocabulary.len() != n {
            return Err(ClassifierError::InvalidArtifact(format!(
                "vocabulary has {} terms but idf has {} weights",
                artifact.vocabulary.len(),
                n
            )));
        }
        if let Some((term, &idx)) = artifact.vocabulary.iter().find(|(_, idx)| **idx >= n) {
            return Err(ClassifierError::InvalidArtifact(format!(
                "term {term:?} maps to feature {idx}, out of range for {n} features"
            )));
        }
        let (lo, hi) = artifact.ngram_range;
        if lo == 0 || lo > hi {
            return Err(ClassifierError::InvalidArtifact(format!(
                "invalid ngram_range ({lo}, {hi})"
            )));
        }

        let pattern = artifact
            .token_pattern
            .as_deref()
            .unwrap_or(DEFAULT_TOKEN_PATTERN);
        let token_pattern = Regex::new(pattern)
            .map_err(|e| ClassifierError::InvalidArtifact(format!("token_pattern: {e}")))?;

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: Array1::from(artifact.idf),
            lowercase: artifact.lowercase,
            ngram_range: artifact.ngram_range,
            stop_words: artifact.stop_words.into_iter().collect(),
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
            token_pattern,
        })
    }

    /// Load a vectorizer artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ArtifactNotFound {
                path: path.display().to_string(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        let artifact: VectorizerArtifact = serde_json::from_str(&raw)
            .map_err(|e| ClassifierError::InvalidArtifact(format!("{}: {e}", path.display())))?;
        Self::from_artifact(artifact)
    }

    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let words: Vec<&str> = self
            .token_pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|w| !self.stop_words.contains(*w))
            .collect();

        let (lo, hi) = self.ngram_range;
        let mut terms = Vec::new();
        for n in lo..=hi {
            if n > words.len() {
                break;
            }
            for window in words.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Dense TF-IDF row for `text`. Out-of-vocabulary terms are ignored.
    pub fn transform(&self, text: &str) -> Array1<f64> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut row = Array1::<f64>::zeros(self.n_features());
        for (idx, count) in counts {
            let tf = if self.sublinear_tf {
                1.0 + count.ln()
            } else {
                count
            };
            row[idx] = tf * self.idf[idx];
        }

        if self.norm == Norm::L2 {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(terms: &[&str], idf: &[f64]) -> VectorizerArtifact {
        VectorizerArtifact {
            vocabulary: terms
                .iter()
                .enumerate()
                .map(|(i, t)| (t.to_string(), i))
                .collect(),
            idf: idf.to_vec(),
            lowercase: true,
            ngram_range: (1, 1),
            stop_words: Vec::new(),
            sublinear_tf: false,
            norm: Norm::L2,
            token_pattern: None,
        }
    }

    #[test]
    fn test_transform_is_l2_normalised() {
        let v = TfidfVectorizer::from_artifact(artifact(&["cats", "dogs"], &[1.0, 1.0])).unwrap();
        let row = v.transform("Cats and dogs and DOGS");
        // counts: cats=1, dogs=2
        let expected_cats = 1.0 / 5f64.sqrt();
        let expected_dogs = 2.0 / 5f64.sqrt();
        assert!((row[0] - expected_cats).abs() < 1e-9);
        assert!((row[1] - expected_dogs).abs() < 1e-9);
    }

    #[test]
    fn test_single_char_tokens_are_dropped_by_default_pattern() {
        let v = TfidfVectorizer::from_artifact(artifact(&["a", "ok"], &[1.0, 1.0])).unwrap();
        let row = v.transform("a a a ok");
        assert_eq!(row[0], 0.0);
        assert!((row[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_vocabulary_text_gives_zero_row() {
        let v = TfidfVectorizer::from_artifact(artifact(&["cats"], &[2.0])).unwrap();
        let row = v.transform("nothing relevant here");
        assert!(row.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_bigrams_and_stop_words() {
        let mut a = artifact(&["breaking news", "news"], &[1.0, 1.0]);
        a.ngram_range = (1, 2);
        a.stop_words = vec!["the".to_string()];
        a.norm = Norm::None;
        let v = TfidfVectorizer::from_artifact(a).unwrap();
        let row = v.transform("the breaking the news");
        assert_eq!(row[0], 1.0);
        assert_eq!(row[1], 1.0);
    }

    #[test]
    fn test_sublinear_tf() {
        let mut a = artifact(&["spam"], &[1.0]);
        a.sublinear_tf = true;
        a.norm = Norm::None;
        let v = TfidfVectorizer::from_artifact(a).unwrap();
        let row = v.transform("spam spam spam");
        assert!((row[0] - (1.0 + 3f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn test_mismatched_idf_is_rejected() {
        let result = TfidfVectorizer::from_artifact(artifact(&["a", "b"], &[1.0]));
        assert!(matches!(result, Err(ClassifierError::InvalidArtifact(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = TfidfVectorizer::load(Path::new("/nonexistent/vectorizer.json"));
        match result {
            Err(ClassifierError::ArtifactNotFound { path }) => assert!(path.contains("nonexistent")),
            other => panic!("Expected ArtifactNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn test_artifact_defaults_from_minimal_json() {
        let json = r#"{"vocabulary": {"x1": 0}, "idf": [1.5]}"#;
        let a: VectorizerArtifact = serde_json::from_str(json).unwrap();
        assert!(a.lowercase);
        assert_eq!(a.ngram_range, (1, 1));
        assert_eq!(a.norm, Norm::L2);
        assert!(!a.sublinear_tf);
    }
}
