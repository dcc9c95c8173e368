use serde::{Deserialize, Serialize};

use super::{DisplayLabel, Label, Route};

/// Number of chunks sent to each route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCounts {
    pub commitment_engine: usize,
    pub rag_engine: usize,
    pub discarded: usize,
    pub flagged: usize,
    /// Mirrors `flagged`; kept separately for consumers that track review load
    pub uncertain: usize,
}

impl RouteCounts {
    /// Count one chunk sent to `route`
    pub fn record(&mut self, route: Route) {
        match route {
            Route::CommitmentEngine => self.commitment_engine += 1,
            Route::RagEngine => self.rag_engine += 1,
            Route::Discarded => self.discarded += 1,
            Route::Flagged => {
                self.flagged += 1;
                self.uncertain += 1;
            }
        }
    }

    pub fn get(&self, route: Route) -> usize {
        match route {
            Route::CommitmentEngine => self.commitment_engine,
            Route::RagEngine => self.rag_engine,
            Route::Discarded => self.discarded,
            Route::Flagged => self.flagged,
        }
    }

    /// Sum over the four routes (excludes `uncertain`)
    pub fn total(&self) -> usize {
        self.commitment_engine + self.rag_engine + self.discarded + self.flagged
    }
}

/// Per-chunk entry of a pipeline result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeItem {
    pub index: usize,
    /// Speaker-tagged sentence
    pub original: String,
    pub clean_text: String,
    pub speaker: Option<String>,
    pub label: Label,
    pub display_label: DisplayLabel,
    pub confidence: f64,
    pub route: Route,
}

/// Result of one pipeline invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub source_id: String,
    pub total_chunks: usize,
    pub route_counts: RouteCounts,
    /// One entry per chunk, in sentence order
    pub items: Vec<OutcomeItem>,
}

impl PipelineResult {
    pub fn empty(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            total_chunks: 0,
            route_counts: RouteCounts::default(),
            items: Vec::new(),
        }
    }

    /// Items sent to the given route, in order
    pub fn routed_to(&self, route: Route) -> impl Iterator<Item = &OutcomeItem> {
        self.items.iter().filter(move |item| item.route == route)
    }
}
