use thiserror::Error;

/// Boxed error returned by a pluggable capability
pub type CapabilityError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures that abort a whole pipeline invocation
///
/// No partial results are returned when any of these occur.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The sentence boundary capability failed on a transcript line
    #[error("sentence segmentation failed on line {line}: {source}")]
    SegmentationFailure {
        line: usize,
        #[source]
        source: CapabilityError,
    },

    /// The semantic classifier failed on a chunk
    #[error("classification failed for chunk {index}: {source}")]
    ClassificationFailure {
        index: usize,
        #[source]
        source: CapabilityError,
    },

    /// A classification worker panicked or was cancelled
    #[error("classification worker failed: {0}")]
    TaskFailure(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
