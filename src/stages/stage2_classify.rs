use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::classifier::{Classification, SemanticClassifier};
use crate::error::{PipelineError, Result};
use crate::heuristics::{detect_speaker, NoiseSentinel};
use crate::models::{Chunk, ClassificationRecord, Label};

/// Configuration for Stage 2
#[derive(Debug, Clone)]
pub struct Stage2Config {
    /// Clean texts shorter than this (in characters) are classified with
    /// their context window instead
    pub short_text_chars: usize,
    /// Maximum classifier calls in flight
    pub max_concurrency: usize,
}

impl Default for Stage2Config {
    fn default() -> Self {
        Self {
            short_text_chars: 20,
            max_concurrency: 8,
        }
    }
}

/// Chunk prepared for classification
struct PendingChunk {
    index: usize,
    speaker: Option<String>,
    clean_text: String,
    is_sentinel_noise: bool,
}

/// Execute Stage 2: classify every chunk
///
/// Sentinel noise is labeled directly; everything else goes to the
/// classifier on a bounded set of tasks. The returned records are complete
/// and in the order of `chunks`, each carrying its chunk's own index. Any
/// classifier failure aborts the whole pass.
pub async fn execute_stage2(
    chunks: &[Chunk],
    classifier: Arc<dyn SemanticClassifier>,
    sentinel: &NoiseSentinel,
    config: &Stage2Config,
) -> Result<Vec<ClassificationRecord>> {
    let permits = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
    let mut tasks = JoinSet::new();
    let mut pending = Vec::with_capacity(chunks.len());
    let mut sentinel_hits = 0;

    // Results are keyed by slice position; `chunk.index` is only carried through
    for (position, chunk) in chunks.iter().enumerate() {
        // The segmenter folded the speaker into `original`, so split it off again
        let (speaker, clean_text) = detect_speaker(&chunk.original);
        let is_sentinel_noise = sentinel.is_noise(&clean_text);

        if is_sentinel_noise {
            sentinel_hits += 1;
        } else {
            let input = if clean_text.chars().count() < config.short_text_chars {
                chunk.context_window.clone()
            } else {
                clean_text.clone()
            };
            let classifier = Arc::clone(&classifier);
            let permits = Arc::clone(&permits);

            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                (position, classifier.classify(&input).await)
            });
        }

        pending.push(PendingChunk {
            index: chunk.index,
            speaker,
            clean_text,
            is_sentinel_noise,
        });
    }

    info!(
        "Stage 2: {} chunks, {} caught by noise sentinel, {} sent to {} classifier",
        chunks.len(),
        sentinel_hits,
        tasks.len(),
        classifier.name()
    );

    let mut classified: Vec<Option<Classification>> = vec![None; chunks.len()];
    while let Some(joined) = tasks.join_next().await {
        let (position, outcome) = joined?;
        let classification = outcome.map_err(|e| PipelineError::ClassificationFailure {
            index: chunks[position].index,
            source: e.into(),
        })?;
        classified[position] = Some(classification);
    }

    let mut records = Vec::with_capacity(pending.len());
    for (chunk, classification) in pending.into_iter().zip(classified) {
        let Classification { label, confidence } = if chunk.is_sentinel_noise {
            Classification::new(Label::Noise, 1.0)
        } else {
            classification.ok_or_else(|| PipelineError::ClassificationFailure {
                index: chunk.index,
                source: "classifier produced no result".into(),
            })?
        };
        debug!("Chunk {}: {} ({:.2})", chunk.index, label, confidence);
        records.push(ClassificationRecord {
            index: chunk.index,
            speaker: chunk.speaker,
            clean_text: chunk.clean_text,
            label,
            confidence,
            is_sentinel_noise: chunk.is_sentinel_noise,
        });
    }

    info!("Stage 2: classified {} chunks", records.len());

    Ok(records)
}
