//! Deterministic text rules that run without calling the classifier.

pub mod noise_sentinel;
pub mod sentences;
pub mod speaker;

pub use noise_sentinel::*;
pub use sentences::*;
pub use speaker::*;
