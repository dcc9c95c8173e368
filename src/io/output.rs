use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{PipelineResult, Route};

/// Metadata about a processing run
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub run_id: Uuid,
    pub processed_at: DateTime<Utc>,
    pub primary_user: String,
    pub confidence_threshold: f64,
    pub classifier: String,
}

impl ReportMetadata {
    pub fn new(primary_user: &str, confidence_threshold: f64, classifier: &str) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            processed_at: Utc::now(),
            primary_user: primary_user.to_string(),
            confidence_threshold,
            classifier: classifier.to_string(),
        }
    }
}

/// Machine-readable output: the pipeline result plus run metadata
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub metadata: ReportMetadata,
    pub result: &'a PipelineResult,
}

impl<'a> Report<'a> {
    pub fn new(result: &'a PipelineResult, metadata: ReportMetadata) -> Self {
        Self { metadata, result }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }

    /// Write JSON to any writer (e.g. stdout)
    pub fn write_json_to<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable breakdown of a pipeline result
pub struct HumanReport<'a> {
    result: &'a PipelineResult,
}

impl<'a> HumanReport<'a> {
    pub fn new(result: &'a PipelineResult) -> Self {
        Self { result }
    }

    /// Format the summary followed by one entry per chunk
    pub fn format(&self) -> String {
        let counts = &self.result.route_counts;
        let mut output = String::new();

        output.push_str(&format!("Source: {}\n", self.result.source_id));
        output.push_str(&format!("Total chunks: {}\n", self.result.total_chunks));
        for route in [
            Route::CommitmentEngine,
            Route::RagEngine,
            Route::Discarded,
            Route::Flagged,
        ] {
            output.push_str(&format!("  {}: {}\n", humanize(route.as_str()), counts.get(route)));
        }
        output.push_str(&format!("  {}: {}\n", humanize("uncertain"), counts.uncertain));

        for item in &self.result.items {
            let speaker = item
                .speaker
                .as_deref()
                .map(|s| format!("[{}]", s))
                .unwrap_or_else(|| "[No Speaker]".to_string());
            let header = format!("Chunk {}: {} ", item.index + 1, speaker);
            let text = wrap_text(&item.original, 80usize.saturating_sub(header.len()).max(20));

            output.push('\n');
            output.push_str(&header);
            output.push_str(&text.replace('\n', &format!("\n{}", " ".repeat(header.len()))));
            output.push('\n');
            output.push_str(&format!(
                "  Confidence: {:.2} | Label: {}\n",
                item.confidence, item.display_label
            ));
            output.push_str(&format!(
                "  Routed To:  {}\n",
                item.route.as_str().to_uppercase()
            ));
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// `commitment_engine` -> `Commitment engine`
fn humanize(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        if line_len + word.len() + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word.len();
    }

    result
}
