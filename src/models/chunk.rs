use serde::{Deserialize, Serialize};

use super::{DisplayLabel, Label, Route};

/// One sentence-level unit of pipeline work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the sentence sequence (0-based)
    pub index: usize,
    /// Speaker-tagged sentence as produced by the segmenter
    pub original: String,
    /// Previous, current and next sentence joined with spaces
    pub context_window: String,
}

/// Classification of a single chunk, written once by the classification pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// Index of the chunk this record belongs to
    pub index: usize,
    /// Speaker taken from a `Name: text` prefix, if any
    pub speaker: Option<String>,
    /// Sentence text with the speaker prefix removed
    pub clean_text: String,
    pub label: Label,
    /// Classifier confidence (0-1)
    pub confidence: f64,
    /// Whether the noise sentinel matched the clean text
    pub is_sentinel_noise: bool,
}

impl ClassificationRecord {
    /// Whether this record resolves a question asked shortly before it
    pub fn answers_question(&self, threshold: f64) -> bool {
        self.label.answers_question() && self.confidence >= threshold
    }
}

/// Routing decision derived for a single chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingOutcome {
    pub index: usize,
    /// Only meaningful for questions
    pub is_answered: bool,
    pub display_label: DisplayLabel,
    pub route: Route,
}
