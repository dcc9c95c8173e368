use std::path::Path;

use anyhow::{Context, Result};

/// Source id used when text is passed directly rather than read from a file
pub const MANUAL_SOURCE_ID: &str = "manual_input";

/// Raw transcript text with the id of where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptInput {
    pub text: String,
    pub source_id: String,
}

impl TranscriptInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_id: MANUAL_SOURCE_ID.to_string(),
        }
    }

    /// Override the source id
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }
}

/// Read a transcript file; the source id is the file's base name
pub fn read_transcript_file(path: &Path) -> Result<TranscriptInput> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let source_id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| MANUAL_SOURCE_ID.to_string());
    Ok(TranscriptInput { text, source_id })
}
