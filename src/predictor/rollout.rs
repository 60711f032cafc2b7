//! Rollout model contract and the HTTP inference client
//!
//! The forecasting model itself is external. It is loaded from a checkpoint
//! by an inference server and driven through two calls: `load` once at
//! startup and `rollout` once per forecast request.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::bundle::{InputBundle, OutputBundle};
use crate::WaveCastError;
use crate::config::ModelConfig;

/// A model that produces future steps autoregressively from one input bundle
#[async_trait]
pub trait RolloutModel: Send + Sync {
    /// Name used in logs and the status endpoint
    fn name(&self) -> &str;

    /// Predict `steps` future steps; the i-th output is step i + 1
    async fn rollout(&self, bundle: &InputBundle, steps: u32) -> Result<Vec<OutputBundle>>;
}

#[derive(Debug, Serialize)]
struct LoadRequest<'a> {
    repo: &'a str,
    checkpoint: &'a str,
    device: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoadResponse {
    /// Device the server actually placed the model on
    device: Option<String>,
}

#[derive(Debug, Serialize)]
struct RolloutRequest<'a> {
    steps: u32,
    batch: &'a InputBundle,
}

/// Checkpoint hosted by a remote inference server
pub struct HttpRolloutModel {
    client: Client,
    endpoint: String,
    name: String,
}

impl HttpRolloutModel {
    /// Ask the inference server to load the configured checkpoint
    #[instrument(skip(config), fields(repo = %config.repo, checkpoint = %config.checkpoint))]
    pub async fn load(config: &ModelConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| WaveCastError::config("No model endpoint configured"))?
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("WaveCast/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        info!("Loading checkpoint from {}", endpoint);
        let start_time = Instant::now();

        let response: LoadResponse = client
            .post(format!("{endpoint}/load"))
            .json(&LoadRequest {
                repo: &config.repo,
                checkpoint: &config.checkpoint,
                device: &config.device,
            })
            .send()
            .await
            .with_context(|| format!("Inference server at {endpoint} is unreachable"))?
            .error_for_status()
            .map_err(|e| WaveCastError::model(format!("Checkpoint load rejected: {e}")))?
            .json()
            .await
            .with_context(|| "Invalid load response from inference server")?;

        let device = response.device.unwrap_or_else(|| config.device.clone());
        if device == "cpu" {
            warn!("Model runs on CPU; rollouts will be slow and memory-intensive");
        }

        info!(
            "Checkpoint loaded on {} in {:.3}s",
            device,
            start_time.elapsed().as_secs_f64()
        );

        Ok(Self {
            client,
            endpoint,
            name: format!("{}/{}", config.repo, config.checkpoint),
        })
    }
}

#[async_trait]
impl RolloutModel for HttpRolloutModel {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, bundle))]
    async fn rollout(&self, bundle: &InputBundle, steps: u32) -> Result<Vec<OutputBundle>> {
        let start_time = Instant::now();

        let outputs: Vec<OutputBundle> = self
            .client
            .post(format!("{}/rollout", self.endpoint))
            .json(&RolloutRequest {
                steps,
                batch: bundle,
            })
            .send()
            .await
            .with_context(|| "Rollout request failed")?
            .error_for_status()
            .map_err(|e| WaveCastError::model(format!("Rollout rejected: {e}")))?
            .json()
            .await
            .with_context(|| "Invalid rollout response")?;

        debug!(
            "Rollout returned {} steps in {:.3}s",
            outputs.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(outputs)
    }
}
