pub mod embedding;
pub mod lexical;
pub mod prototypes;
#[cfg(test)]
pub(crate) mod testing;

pub use embedding::*;
pub use lexical::*;
pub use prototypes::*;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::Label;

/// Label and confidence returned by a semantic classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: Label,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

impl Classification {
    /// Create a classification, clamping confidence into [0, 1]
    pub fn new(label: Label, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { label, confidence }
    }
}

/// Assigns one of the fixed labels to a piece of text
#[async_trait]
pub trait SemanticClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Classification>;

    /// Name for logging
    fn name(&self) -> &'static str {
        "classifier"
    }
}

/// Pick the label whose score is highest
///
/// Starts from `(noise, 0.0)` and only moves on a strictly greater score,
/// so ties keep the earlier label and all-non-positive scores yield noise.
pub fn best_label<I>(scores: I) -> Classification
where
    I: IntoIterator<Item = (Label, f64)>,
{
    let mut best = (Label::Noise, 0.0);
    for (label, score) in scores {
        if score > best.1 {
            best = (label, score);
        }
    }
    Classification::new(best.0, best.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_clamps_confidence() {
        assert_eq!(Classification::new(Label::Answer, 1.2).confidence, 1.0);
        assert_eq!(Classification::new(Label::Answer, -0.3).confidence, 0.0);
        assert_eq!(Classification::new(Label::Answer, f64::NAN).confidence, 0.0);
    }

    #[test]
    fn test_best_label_picks_max() {
        let result = best_label([
            (Label::Commitment, 0.4),
            (Label::Question, 0.8),
            (Label::Context, 0.8),
        ]);
        assert_eq!(result.label, Label::Question);
        assert!((result.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_best_label_defaults_to_noise() {
        let result = best_label([(Label::Commitment, 0.0), (Label::Answer, -0.2)]);
        assert_eq!(result.label, Label::Noise);
        assert_eq!(result.confidence, 0.0);
    }
}
