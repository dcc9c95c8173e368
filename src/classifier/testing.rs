use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use super::{Classification, SemanticClassifier};
use crate::models::Label;

/// Classifier returning scripted results keyed by exact input text
pub struct StubClassifier {
    responses: HashMap<String, Classification>,
    default: Classification,
    fail_on: Option<String>,
    /// Every input the stub was asked to classify
    pub seen: Mutex<Vec<String>>,
}

impl StubClassifier {
    pub fn new(default_label: Label, default_confidence: f64) -> Self {
        Self {
            responses: HashMap::new(),
            default: Classification::new(default_label, default_confidence),
            fail_on: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, text: &str, label: Label, confidence: f64) -> Self {
        self.responses
            .insert(text.to_string(), Classification::new(label, confidence));
        self
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }
}

#[async_trait]
impl SemanticClassifier for StubClassifier {
    async fn classify(&self, text: &str) -> Result<Classification> {
        self.seen.lock().unwrap().push(text.to_string());
        if self.fail_on.as_deref() == Some(text) {
            anyhow::bail!("stub failure");
        }
        Ok(self.responses.get(text).copied().unwrap_or(self.default))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
