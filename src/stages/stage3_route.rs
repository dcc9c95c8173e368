use tracing::{debug, info};

use crate::heuristics::{is_primary_user, NoiseSentinel};
use crate::models::{ClassificationRecord, DisplayLabel, Label, Route, RouteCounts, RoutingOutcome};

/// How many following chunks may answer a question
pub const QA_LOOKAHEAD: usize = 2;

/// Configuration for Stage 3 routing
#[derive(Debug, Clone)]
pub struct Stage3Config {
    /// Speaker whose commitments and actions are tracked
    pub primary_user: String,
    /// Minimum confidence for routing and for answering a question
    pub confidence_threshold: f64,
}

impl Default for Stage3Config {
    fn default() -> Self {
        Self {
            primary_user: "User".to_string(),
            confidence_threshold: 0.45,
        }
    }
}

/// Result of Stage 3 routing
#[derive(Debug, Clone)]
pub struct Stage3Result {
    /// One outcome per record, in order
    pub outcomes: Vec<RoutingOutcome>,
    pub counts: RouteCounts,
}

/// Inputs to the routing decision table for one chunk
#[derive(Debug, Clone, Copy)]
pub struct RouteInput<'a> {
    pub label: Label,
    pub confidence: f64,
    pub speaker: Option<&'a str>,
    pub is_sentinel_noise: bool,
    pub is_answered: bool,
}

/// Execute Stage 3: QA pairing and routing
///
/// Needs the complete record set: a question at `i` looks at the
/// classifications of `i + 1` and `i + 2`. No outcome depends on another
/// chunk's outcome, and counters are aggregated once all routes are known.
pub fn execute_stage3(
    records: &[ClassificationRecord],
    sentinel: &NoiseSentinel,
    config: &Stage3Config,
) -> Stage3Result {
    let outcomes: Vec<RoutingOutcome> = (0..records.len())
        .map(|position| route_record(records, position, sentinel, config))
        .collect();

    let mut counts = RouteCounts::default();
    for outcome in &outcomes {
        counts.record(outcome.route);
    }

    info!(
        "Stage 3: {} to commitments, {} to facts, {} discarded, {} flagged",
        counts.commitment_engine, counts.rag_engine, counts.discarded, counts.flagged
    );

    Stage3Result { outcomes, counts }
}

fn route_record(
    records: &[ClassificationRecord],
    position: usize,
    sentinel: &NoiseSentinel,
    config: &Stage3Config,
) -> RoutingOutcome {
    let record = &records[position];
    let is_answered = record.label == Label::Question
        && is_answered(records, position, config.confidence_threshold);

    let input = RouteInput {
        label: record.label,
        confidence: record.confidence,
        speaker: record.speaker.as_deref(),
        // Re-checked so filler the classifier mislabeled is still dropped
        is_sentinel_noise: sentinel.is_noise(&record.clean_text),
        is_answered,
    };
    let route = decide_route(&input, &config.primary_user, config.confidence_threshold);

    debug!(
        "Chunk {} [{}] {} ({:.2}) -> {}",
        record.index,
        record.speaker.as_deref().unwrap_or("-"),
        record.label,
        record.confidence,
        route
    );

    RoutingOutcome {
        index: record.index,
        is_answered,
        display_label: DisplayLabel::derive(record.label, is_answered),
        route,
    }
}

/// Whether one of the next `QA_LOOKAHEAD` records answers the one at `position`
pub fn is_answered(records: &[ClassificationRecord], position: usize, threshold: f64) -> bool {
    (1..=QA_LOOKAHEAD)
        .filter_map(|distance| records.get(position + distance))
        .any(|next| next.answers_question(threshold))
}

/// Routing decision table; the first matching rule wins
pub fn decide_route(input: &RouteInput<'_>, primary_user: &str, threshold: f64) -> Route {
    if input.label == Label::Noise {
        return Route::Discarded;
    }
    if input.confidence < threshold {
        return Route::Flagged;
    }
    if input.is_sentinel_noise {
        return Route::Discarded;
    }

    let is_user = is_primary_user(input.speaker, primary_user);

    match input.label {
        // Only the primary user's own commitments are tracked
        Label::Commitment | Label::Action => match (is_user, input.speaker) {
            (true, _) => Route::CommitmentEngine,
            (false, None) => Route::Flagged,
            (false, Some(_)) => Route::Discarded,
        },
        Label::Question => {
            if input.is_answered {
                Route::RagEngine
            } else if is_user {
                Route::Discarded
            } else if input.speaker.is_some() {
                // Open question put to the user by someone else
                Route::CommitmentEngine
            } else {
                Route::Flagged
            }
        }
        Label::Context | Label::Answer => Route::RagEngine,
        Label::Noise => Route::Discarded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, speaker: Option<&str>, label: Label, confidence: f64) -> ClassificationRecord {
        ClassificationRecord {
            index,
            speaker: speaker.map(str::to_string),
            clean_text: "The contractor was assigned in January.".to_string(),
            label,
            confidence,
            is_sentinel_noise: false,
        }
    }

    fn input(label: Label, confidence: f64, speaker: Option<&str>) -> RouteInput<'_> {
        RouteInput {
            label,
            confidence,
            speaker,
            is_sentinel_noise: false,
            is_answered: false,
        }
    }

    #[test]
    fn test_noise_label_always_discarded() {
        let route = decide_route(&input(Label::Noise, 0.1, Some("User")), "User", 0.45);
        assert_eq!(route, Route::Discarded);
    }

    #[test]
    fn test_low_confidence_flagged() {
        let route = decide_route(&input(Label::Context, 0.3, Some("Staff")), "User", 0.45);
        assert_eq!(route, Route::Flagged);
    }

    #[test]
    fn test_threshold_is_not_flagged() {
        let route = decide_route(&input(Label::Context, 0.45, Some("Staff")), "User", 0.45);
        assert_eq!(route, Route::RagEngine);
    }

    #[test]
    fn test_sentinel_overrides_classifier_label() {
        let mut sentinel_hit = input(Label::Commitment, 0.9, Some("User"));
        sentinel_hit.is_sentinel_noise = true;
        assert_eq!(decide_route(&sentinel_hit, "User", 0.45), Route::Discarded);
    }

    #[test]
    fn test_commitment_routing_by_speaker() {
        assert_eq!(
            decide_route(&input(Label::Commitment, 0.9, Some("user")), "User", 0.45),
            Route::CommitmentEngine
        );
        assert_eq!(
            decide_route(&input(Label::Action, 0.9, None), "User", 0.45),
            Route::Flagged
        );
        assert_eq!(
            decide_route(&input(Label::Commitment, 0.9, Some("Staff")), "User", 0.45),
            Route::Discarded
        );
    }

    #[test]
    fn test_question_routing() {
        let mut answered = input(Label::Question, 0.6, Some("User"));
        answered.is_answered = true;
        assert_eq!(decide_route(&answered, "User", 0.45), Route::RagEngine);

        assert_eq!(
            decide_route(&input(Label::Question, 0.6, Some("Staff")), "User", 0.45),
            Route::CommitmentEngine
        );
        assert_eq!(
            decide_route(&input(Label::Question, 0.6, None), "User", 0.45),
            Route::Flagged
        );
        assert_eq!(
            decide_route(&input(Label::Question, 0.6, Some("User")), "User", 0.45),
            Route::Discarded
        );
    }

    #[test]
    fn test_context_and_answer_go_to_facts() {
        assert_eq!(
            decide_route(&input(Label::Answer, 0.5, None), "User", 0.45),
            Route::RagEngine
        );
        assert_eq!(
            decide_route(&input(Label::Context, 0.5, Some("User")), "User", 0.45),
            Route::RagEngine
        );
    }

    #[test]
    fn test_answer_two_chunks_ahead() {
        let records = vec![
            record(0, Some("Staff"), Label::Question, 0.6),
            record(1, Some("Staff"), Label::Question, 0.6),
            record(2, Some("User"), Label::Answer, 0.7),
        ];
        let result = execute_stage3(&records, &NoiseSentinel::default(), &Stage3Config::default());

        assert!(result.outcomes[0].is_answered);
        assert_eq!(result.outcomes[0].route, Route::RagEngine);
        assert_eq!(result.outcomes[0].display_label, DisplayLabel::AnsweredQuestion);
    }

    #[test]
    fn test_lookahead_stops_at_two() {
        let records = vec![
            record(0, Some("Staff"), Label::Question, 0.6),
            record(1, Some("Staff"), Label::Noise, 1.0),
            record(2, Some("Staff"), Label::Context, 0.2),
            record(3, Some("User"), Label::Answer, 0.9),
        ];
        let result = execute_stage3(&records, &NoiseSentinel::default(), &Stage3Config::default());

        assert!(!result.outcomes[0].is_answered);
        assert_eq!(result.outcomes[0].display_label, DisplayLabel::OpenQuestion);
        assert_eq!(result.outcomes[0].route, Route::CommitmentEngine);
    }

    #[test]
    fn test_low_confidence_answer_does_not_pair() {
        let records = vec![
            record(0, None, Label::Question, 0.6),
            record(1, Some("Staff"), Label::Answer, 0.44),
        ];
        assert!(!is_answered(&records, 0, 0.45));
        assert!(is_answered(&records, 0, 0.40));
    }

    #[test]
    fn test_question_at_end_is_open() {
        let records = vec![record(0, None, Label::Question, 0.6)];
        assert!(!is_answered(&records, 0, 0.45));
    }

    #[test]
    fn test_sentinel_recheck_during_routing() {
        let mut mislabeled = record(0, Some("User"), Label::Commitment, 0.8);
        mislabeled.clean_text = "Sure we can do that.".to_string();
        let result = execute_stage3(&[mislabeled], &NoiseSentinel::default(), &Stage3Config::default());
        assert_eq!(result.outcomes[0].route, Route::Discarded);
    }

    #[test]
    fn test_counts_cover_every_chunk() {
        let records = vec![
            record(0, Some("User"), Label::Commitment, 0.9),
            record(1, Some("Staff"), Label::Context, 0.3),
            record(2, None, Label::Noise, 1.0),
            record(3, Some("Staff"), Label::Answer, 0.8),
        ];
        let result = execute_stage3(&records, &NoiseSentinel::default(), &Stage3Config::default());

        assert_eq!(result.outcomes.len(), records.len());
        assert_eq!(result.counts.total(), records.len());
        assert_eq!(result.counts.commitment_engine, 1);
        assert_eq!(result.counts.flagged, 1);
        assert_eq!(result.counts.uncertain, 1);
        assert_eq!(result.counts.discarded, 1);
        assert_eq!(result.counts.rag_engine, 1);
    }

    #[test]
    fn test_outcomes_carry_record_indices() {
        let records = vec![
            record(4, Some("Staff"), Label::Question, 0.6),
            record(5, Some("User"), Label::Answer, 0.7),
        ];
        let result = execute_stage3(&records, &NoiseSentinel::default(), &Stage3Config::default());

        let indices: Vec<usize> = result.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![4, 5]);
        assert!(result.outcomes[0].is_answered);
    }
}
