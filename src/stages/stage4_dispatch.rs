use anyhow::{Context, Result};
use tracing::info;

use crate::io::{CommitmentItem, CommitmentTracker, FactItem, FactStore};
use crate::models::{PipelineResult, Route};

/// Result of Stage 4 dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stage4Result {
    pub commitments_sent: usize,
    pub facts_sent: usize,
}

/// Execute Stage 4: hand routed items to the downstream collaborators
///
/// `commitment_engine` items go to the tracker, `rag_engine` items to the
/// fact store. Discarded and flagged items are not sent anywhere.
pub fn execute_stage4(
    result: &PipelineResult,
    tracker: &mut dyn CommitmentTracker,
    store: &mut dyn FactStore,
) -> Result<Stage4Result> {
    let mut summary = Stage4Result::default();

    for item in &result.items {
        match item.route {
            Route::CommitmentEngine => {
                info!("Sending to commitment tracker: {}", item.clean_text);
                tracker
                    .track(CommitmentItem {
                        text: item.clean_text.clone(),
                        inferred_type: item.label,
                        source_id: result.source_id.clone(),
                        speaker: item.speaker.clone(),
                    })
                    .with_context(|| format!("Failed to track chunk {}", item.index))?;
                summary.commitments_sent += 1;
            }
            Route::RagEngine => {
                info!("Sending to fact store: {}", item.clean_text);
                store
                    .archive(FactItem {
                        text: item.clean_text.clone(),
                        speaker: item.speaker.clone(),
                    })
                    .with_context(|| format!("Failed to archive chunk {}", item.index))?;
                summary.facts_sent += 1;
            }
            Route::Discarded | Route::Flagged => {}
        }
    }

    info!(
        "Stage 4: {} commitments tracked, {} facts archived",
        summary.commitments_sent, summary.facts_sent
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySink;
    use crate::models::{DisplayLabel, Label, OutcomeItem, RouteCounts};

    fn item(index: usize, speaker: Option<&str>, label: Label, route: Route) -> OutcomeItem {
        let clean_text = format!("Sentence number {}.", index);
        OutcomeItem {
            index,
            original: match speaker {
                Some(s) => format!("{}: {}", s, clean_text),
                None => clean_text.clone(),
            },
            clean_text,
            speaker: speaker.map(str::to_string),
            label,
            display_label: DisplayLabel::derive(label, false),
            confidence: 0.8,
            route,
        }
    }

    fn result(items: Vec<OutcomeItem>) -> PipelineResult {
        let mut route_counts = RouteCounts::default();
        for item in &items {
            route_counts.record(item.route);
        }
        PipelineResult {
            source_id: "ward12.txt".to_string(),
            total_chunks: items.len(),
            route_counts,
            items,
        }
    }

    #[test]
    fn test_dispatch_by_route() {
        let result = result(vec![
            item(0, Some("User"), Label::Commitment, Route::CommitmentEngine),
            item(1, Some("Staff"), Label::Question, Route::CommitmentEngine),
            item(2, Some("Staff"), Label::Context, Route::RagEngine),
            item(3, None, Label::Action, Route::Flagged),
            item(4, Some("Staff"), Label::Noise, Route::Discarded),
        ]);
        let mut tracker = MemorySink::default();
        let mut store = MemorySink::default();

        let summary = execute_stage4(&result, &mut tracker, &mut store).unwrap();

        assert_eq!(summary.commitments_sent, 2);
        assert_eq!(summary.facts_sent, 1);
        assert_eq!(tracker.commitments[0].text, "Sentence number 0.");
        assert_eq!(tracker.commitments[0].source_id, "ward12.txt");
        assert_eq!(tracker.commitments[1].inferred_type, Label::Question);
        assert_eq!(tracker.commitments[1].speaker.as_deref(), Some("Staff"));
        assert_eq!(store.facts.len(), 1);
        assert_eq!(store.facts[0].text, "Sentence number 2.");
    }

    struct RejectingTracker;

    impl CommitmentTracker for RejectingTracker {
        fn track(&mut self, _item: CommitmentItem) -> Result<()> {
            anyhow::bail!("store offline")
        }
    }

    #[test]
    fn test_tracker_failure_is_reported() {
        let result = result(vec![item(
            0,
            Some("User"),
            Label::Commitment,
            Route::CommitmentEngine,
        )]);
        let mut store = MemorySink::default();

        let err = execute_stage4(&result, &mut RejectingTracker, &mut store).unwrap_err();
        assert!(err.to_string().contains("Failed to track chunk 0"));
    }
}
