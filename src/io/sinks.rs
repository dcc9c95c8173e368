use std::io::Write;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Label;

/// Item handed to the commitment tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitmentItem {
    pub text: String,
    /// Classifier label: commitment, action or question
    pub inferred_type: Label,
    pub source_id: String,
    pub speaker: Option<String>,
}

/// Item archived in the fact store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactItem {
    pub text: String,
    pub speaker: Option<String>,
}

/// Receives items that need commitment tracking
pub trait CommitmentTracker {
    fn track(&mut self, item: CommitmentItem) -> Result<()>;
}

/// Receives items for archival as background facts
pub trait FactStore {
    fn archive(&mut self, fact: FactItem) -> Result<()>;
}

/// Collects dispatched items in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub commitments: Vec<CommitmentItem>,
    pub facts: Vec<FactItem>,
}

impl CommitmentTracker for MemorySink {
    fn track(&mut self, item: CommitmentItem) -> Result<()> {
        self.commitments.push(item);
        Ok(())
    }
}

impl FactStore for MemorySink {
    fn archive(&mut self, fact: FactItem) -> Result<()> {
        self.facts.push(fact);
        Ok(())
    }
}

/// Writes each dispatched item as one JSON line
pub struct JsonlSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of lines written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, value).context("Failed to serialize item")?;
        self.writer.write_all(b"\n").context("Failed to write item")?;
        self.written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush sink")
    }
}

impl JsonlSink<std::io::BufWriter<std::fs::File>> {
    /// Create a sink writing to a new file at `path`
    pub fn create(path: &std::path::Path) -> Result<Self> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        Ok(Self::new(std::io::BufWriter::new(file)))
    }
}

impl<W: Write> CommitmentTracker for JsonlSink<W> {
    fn track(&mut self, item: CommitmentItem) -> Result<()> {
        self.write_line(&item)
    }
}

impl<W: Write> FactStore for JsonlSink<W> {
    fn archive(&mut self, fact: FactItem) -> Result<()> {
        self.write_line(&fact)
    }
}
