use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Real,
    Fake,
}

impl Label {
    /// Maps a binary class value as exported by the model (1 = real).
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Label::Real
        } else {
            Label::Fake
        }
    }
}

/// Classifier output. The two probabilities always sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    label: Label,
    probability_real: f64,
    probability_fake: f64,
}

impl ClassificationResult {
    /// Builds a result from the probability of the "real" class; the "fake"
    /// probability is its complement.
    pub fn from_probability_real(label: Label, probability_real: f64) -> Self {
        let p = if probability_real.is_nan() {
            0.5
        } else {
            probability_real.clamp(0.0, 1.0)
        };
        Self {
            label,
            probability_real: p,
            probability_fake: 1.0 - p,
        }
    }

    /// Builds a result from a raw probability pair, renormalising it so the
    /// pair sums to one.
    pub fn from_pair(label: Label, probability_real: f64, probability_fake: f64) -> Self {
        let total = probability_real + probability_fake;
        if total > 0.0 && total.is_finite() {
            Self::from_probability_real(label, probability_real / total)
        } else {
            Self::from_probability_real(label, 0.5)
        }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn probability_real(&self) -> f64 {
        self.probability_real
    }

    pub fn probability_fake(&self) -> f64 {
        self.probability_fake
    }

    pub fn is_real(&self) -> bool {
        self.label == Label::Real
    }
}
