use std::sync::LazyLock;

use regex::Regex;

use crate::error::CapabilityError;

/// Splits text into natural-language sentences
///
/// Implementations must be idempotent and must not reorder text.
pub trait SentenceSplitter: Send + Sync {
    fn split(&self, text: &str) -> Result<Vec<String>, CapabilityError>;

    /// Name for logging
    fn name(&self) -> &'static str {
        "splitter"
    }
}

static BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence boundary regex"));

/// Fallback splitter: breaks after `.`, `!` or `?` followed by whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationSplitter;

impl SentenceSplitter for PunctuationSplitter {
    fn split(&self, text: &str) -> Result<Vec<String>, CapabilityError> {
        let mut sentences = Vec::new();
        let mut start = 0;

        for boundary in BOUNDARY.find_iter(text) {
            // Punctuation is ASCII, so the sentence ends one byte into the match
            push_trimmed(&mut sentences, &text[start..boundary.start() + 1]);
            start = boundary.end();
        }
        push_trimmed(&mut sentences, &text[start..]);

        Ok(sentences)
    }

    fn name(&self) -> &'static str {
        "punctuation"
    }
}

fn push_trimmed(sentences: &mut Vec<String>, fragment: &str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        sentences.push(fragment.to_string());
    }
}
