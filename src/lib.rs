pub mod classifier;
pub mod error;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use classifier::{
    Classification, EmbeddingClassifier, EmbeddingClient, EmbeddingConfig, LexicalClassifier,
    PrototypeSet, SemanticClassifier,
};
pub use error::{PipelineError, Result};
pub use heuristics::{NoiseSentinel, PunctuationSplitter, SegmenterConfig, SentenceSplitter};
pub use io::{
    read_transcript_file, CommitmentItem, CommitmentTracker, FactItem, FactStore, HumanReport,
    JsonlSink, MemorySink, Report, ReportMetadata, TranscriptInput,
};
pub use models::{DisplayLabel, Label, OutcomeItem, PipelineResult, Route, RouteCounts};
pub use pipeline::{process, Pipeline, PipelineConfig};
pub use stages::{build_chunks, execute_stage4, segment, Stage4Result};
