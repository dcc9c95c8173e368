use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{best_label, Classification, PrototypeSet, SemanticClassifier};
use crate::models::Label;

/// Configuration for an OpenAI-compatible embeddings endpoint
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Base URL; `/embeddings` is appended
    pub base_url: String,
    /// Embedding model name
    pub model: String,
    /// Optional bearer token
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Attempts per request for transient failures
    pub max_retries: u32,
    /// Maximum inputs per embeddings request
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/v1".to_string(),
            model: "all-MiniLM-L6-v2".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            batch_size: 64,
        }
    }
}

impl EmbeddingConfig {
    /// Create config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("PARLEY_EMBEDDING_URL").unwrap_or(defaults.base_url),
            model: std::env::var("PARLEY_EMBEDDING_MODEL").unwrap_or(defaults.model),
            api_key: std::env::var("PARLEY_EMBEDDING_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            ..defaults
        }
    }

    /// Override the embedding model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Embeddings API client
pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
    config: EmbeddingConfig,
}

impl EmbeddingClient {
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        anyhow::ensure!(!config.model.trim().is_empty(), "missing embedding model name");
        anyhow::ensure!(config.batch_size > 0, "embedding batch size must be positive");
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build embeddings HTTP client")?;
        let endpoint = format!("{}/embeddings", config.base_url.trim_end_matches('/'));
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Embed any number of inputs, batching requests as configured
    pub async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(inputs.len());
        for batch in inputs.chunks(self.config.batch_size) {
            embeddings.extend(self.embed_batch(batch).await?);
        }
        Ok(embeddings)
    }

    /// Embed a single text
    pub async fn embed_one(&self, input: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed_batch(&[input.to_string()]).await?;
        embeddings
            .pop()
            .context("Embeddings endpoint returned no vector")
    }

    async fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: inputs,
        };

        let mut attempt = 0u32;
        loop {
            let mut builder = self.client.post(&self.endpoint).json(&request);
            if let Some(key) = &self.config.api_key {
                builder = builder.bearer_auth(key);
            }

            match builder.send().await {
                Ok(response) if response.status().is_success() => {
                    let mut parsed: EmbeddingResponse = response
                        .json()
                        .await
                        .context("Failed to parse embeddings response")?;
                    parsed.data.sort_by_key(|entry| entry.index);
                    anyhow::ensure!(
                        parsed.data.len() == inputs.len(),
                        "Embeddings endpoint returned {} vectors for {} inputs",
                        parsed.data.len(),
                        inputs.len()
                    );
                    return Ok(parsed.data.into_iter().map(|e| e.embedding).collect());
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    if is_retryable_status(status) && attempt + 1 < self.config.max_retries {
                        attempt += 1;
                        warn!("Embeddings request returned {}, retry {}", status, attempt);
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    anyhow::bail!("Embeddings API error: {} - {}", status, body);
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt + 1 < self.config.max_retries {
                        attempt += 1;
                        warn!("Embeddings request failed ({}), retry {}", e, attempt);
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(e).context("Failed to send request to embeddings endpoint");
                }
            }
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn retry_backoff(attempt: u32) -> Duration {
    Duration::from_millis(250 * (1 << attempt.min(5)))
}

/// Classifier that compares input embeddings against embedded prototypes
///
/// Each label scores the maximum cosine similarity over its prototypes and
/// the best-scoring label wins.
pub struct EmbeddingClassifier {
    client: EmbeddingClient,
    prototypes: Vec<(Label, Vec<Vec<f32>>)>,
}

impl EmbeddingClassifier {
    /// Embed every prototype once up front
    pub async fn new(client: EmbeddingClient, prototypes: &PrototypeSet) -> Result<Self> {
        anyhow::ensure!(!prototypes.is_empty(), "prototype set is empty");

        let mut embedded = Vec::new();
        for (label, examples) in prototypes.groups() {
            let vectors = client
                .embed(examples)
                .await
                .with_context(|| format!("Failed to embed {} prototypes", label))?;
            embedded.push((label, vectors));
        }

        info!(
            "Embedded {} prototypes across {} labels with {}",
            prototypes.len(),
            embedded.len(),
            client.model()
        );

        Ok(Self {
            client,
            prototypes: embedded,
        })
    }
}

#[async_trait]
impl SemanticClassifier for EmbeddingClassifier {
    async fn classify(&self, text: &str) -> Result<Classification> {
        let embedding = self.client.embed_one(text).await?;
        check_dimensions(&embedding, &self.prototypes)?;
        let classification = score_against(&embedding, &self.prototypes);
        debug!(
            "Embedding classifier: {} ({:.3})",
            classification.label, classification.confidence
        );
        Ok(classification)
    }

    fn name(&self) -> &'static str {
        "embedding"
    }
}

/// Input and prototype embeddings must come from the same model
fn check_dimensions(embedding: &[f32], prototypes: &[(Label, Vec<Vec<f32>>)]) -> Result<()> {
    for (label, vectors) in prototypes {
        for vector in vectors {
            anyhow::ensure!(
                vector.len() == embedding.len(),
                "Embedding has {} dimensions but a {} prototype has {}",
                embedding.len(),
                label,
                vector.len()
            );
        }
    }
    Ok(())
}

/// Score an embedding against prototype groups (max similarity per group)
fn score_against(embedding: &[f32], prototypes: &[(Label, Vec<Vec<f32>>)]) -> Classification {
    best_label(prototypes.iter().map(|(label, vectors)| {
        let group_max = vectors
            .iter()
            .map(|v| cosine_similarity(embedding, v))
            .fold(f64::NEG_INFINITY, f64::max);
        (*label, group_max)
    }))
}

/// Cosine similarity of two vectors; 0 when either has zero length
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}
