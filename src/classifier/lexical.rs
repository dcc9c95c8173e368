use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use super::{best_label, Classification, PrototypeSet, SemanticClassifier};
use crate::models::Label;

type TermVector = HashMap<String, f64>;

/// Offline classifier using word-overlap cosine similarity
///
/// Same scoring rule as the embedding classifier, but over lower-cased term
/// frequency vectors, so it needs no model or network.
#[derive(Debug, Clone)]
pub struct LexicalClassifier {
    prototypes: Vec<(Label, Vec<TermVector>)>,
}

impl LexicalClassifier {
    pub fn new(prototypes: &PrototypeSet) -> Self {
        let prototypes = prototypes
            .groups()
            .map(|(label, examples)| {
                (label, examples.iter().map(|e| term_vector(e)).collect())
            })
            .collect();
        Self { prototypes }
    }

    /// Classify without going through the async trait
    pub fn classify_text(&self, text: &str) -> Classification {
        let input = term_vector(text);
        best_label(self.prototypes.iter().map(|(label, vectors)| {
            let group_max = vectors
                .iter()
                .map(|v| term_cosine(&input, v))
                .fold(0.0f64, f64::max);
            (*label, group_max)
        }))
    }
}

impl Default for LexicalClassifier {
    fn default() -> Self {
        Self::new(&PrototypeSet::default())
    }
}

#[async_trait]
impl SemanticClassifier for LexicalClassifier {
    async fn classify(&self, text: &str) -> Result<Classification> {
        Ok(self.classify_text(text))
    }

    fn name(&self) -> &'static str {
        "lexical"
    }
}

fn term_vector(text: &str) -> TermVector {
    let mut terms = TermVector::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
    {
        *terms.entry(word).or_insert(0.0) += 1.0;
    }
    terms
}

fn term_cosine(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .filter_map(|(term, x)| b.get(term).map(|y| x * y))
        .sum();
    let norm = |v: &TermVector| v.values().map(|x| x * x).sum::<f64>().sqrt();
    dot / (norm(a) * norm(b))
}
