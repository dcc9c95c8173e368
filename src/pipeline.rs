use std::sync::Arc;

use tracing::info;

use crate::classifier::SemanticClassifier;
use crate::error::Result;
use crate::heuristics::{
    NoiseSentinel, PunctuationSplitter, RoleLinePattern, SegmenterConfig, SentenceSplitter,
};
use crate::models::{OutcomeItem, PipelineResult};
use crate::stages::{
    build_chunks, execute_stage2, execute_stage3, segment, Stage2Config, Stage3Config,
};

/// Configuration for a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Speaker whose commitments are tracked
    pub primary_user: String,
    /// Minimum classifier confidence for routing
    pub confidence_threshold: f64,
    /// Clean texts shorter than this are classified with their context window
    pub short_text_chars: usize,
    /// Maximum classifier calls in flight
    pub max_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            primary_user: "User".to_string(),
            confidence_threshold: 0.45,
            short_text_chars: 20,
            max_concurrency: 8,
        }
    }
}

/// Transcript classification and routing pipeline
///
/// Holds the pluggable capabilities; every `run` builds its chunks, records
/// and outcomes from scratch and keeps nothing afterwards.
pub struct Pipeline {
    classifier: Arc<dyn SemanticClassifier>,
    splitter: Arc<dyn SentenceSplitter>,
    sentinel: NoiseSentinel,
    roles: RoleLinePattern,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(classifier: Arc<dyn SemanticClassifier>, config: PipelineConfig) -> Self {
        let roles = RoleLinePattern::new(&SegmenterConfig::default().speaker_roles)
            .expect("built-in speaker roles are valid");
        Self {
            classifier,
            splitter: Arc::new(PunctuationSplitter),
            sentinel: NoiseSentinel::default(),
            roles,
            config,
        }
    }

    /// Use a different sentence boundary implementation
    pub fn with_splitter(mut self, splitter: Arc<dyn SentenceSplitter>) -> Self {
        self.splitter = splitter;
        self
    }

    pub fn with_sentinel(mut self, sentinel: NoiseSentinel) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Use a custom role list for the metadata-header scan
    pub fn with_segmenter_config(
        mut self,
        config: &SegmenterConfig,
    ) -> std::result::Result<Self, regex::Error> {
        self.roles = RoleLinePattern::new(&config.speaker_roles)?;
        Ok(self)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    /// Process a transcript with an explicit primary user and threshold
    pub async fn process(
        &self,
        raw_text: &str,
        source_id: &str,
        primary_user: &str,
        confidence_threshold: f64,
    ) -> Result<PipelineResult> {
        let config = PipelineConfig {
            primary_user: primary_user.to_string(),
            confidence_threshold,
            ..self.config.clone()
        };
        self.run_with(raw_text, source_id, &config).await
    }

    /// Process a transcript with the pipeline's own configuration
    pub async fn run(&self, raw_text: &str, source_id: &str) -> Result<PipelineResult> {
        self.run_with(raw_text, source_id, &self.config).await
    }

    async fn run_with(
        &self,
        raw_text: &str,
        source_id: &str,
        config: &PipelineConfig,
    ) -> Result<PipelineResult> {
        info!("Processing text from '{}'", source_id);

        // Stage 0 & 1: sentences and context windows
        let sentences = segment(raw_text, self.splitter.as_ref(), &self.roles)?;
        let chunks = build_chunks(&sentences);
        info!("Created {} chunks", chunks.len());

        if chunks.is_empty() {
            return Ok(PipelineResult::empty(source_id));
        }

        // Stage 2: every record must exist before routing starts
        let stage2_config = Stage2Config {
            short_text_chars: config.short_text_chars,
            max_concurrency: config.max_concurrency,
        };
        let records = execute_stage2(
            &chunks,
            Arc::clone(&self.classifier),
            &self.sentinel,
            &stage2_config,
        )
        .await?;

        // Stage 3: QA pairing and routing over the completed records
        let stage3_config = Stage3Config {
            primary_user: config.primary_user.clone(),
            confidence_threshold: config.confidence_threshold,
        };
        let routed = execute_stage3(&records, &self.sentinel, &stage3_config);

        let items: Vec<OutcomeItem> = chunks
            .into_iter()
            .zip(records)
            .zip(routed.outcomes)
            .map(|((chunk, record), outcome)| OutcomeItem {
                index: chunk.index,
                original: chunk.original,
                clean_text: record.clean_text,
                speaker: record.speaker,
                label: record.label,
                display_label: outcome.display_label,
                confidence: record.confidence,
                route: outcome.route,
            })
            .collect();

        Ok(PipelineResult {
            source_id: source_id.to_string(),
            total_chunks: items.len(),
            route_counts: routed.counts,
            items,
        })
    }
}

/// One-shot entry point with default capabilities around `classifier`
pub async fn process(
    classifier: Arc<dyn SemanticClassifier>,
    raw_text: &str,
    source_id: &str,
    primary_user: &str,
    confidence_threshold: f64,
) -> Result<PipelineResult> {
    Pipeline::new(classifier, PipelineConfig::default())
        .process(raw_text, source_id, primary_user, confidence_threshold)
        .await
}
