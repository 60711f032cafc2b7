//! Wave predictor
//!
//! Resolves a location, delegates to the forecast source selected at startup
//! and degrades to an empty forecast when the model fails mid-request. The
//! predictor lives in a process-wide handle that is initialised exactly once.

pub mod bundle;
pub mod rollout;
pub mod source;

use std::sync::{Arc, OnceLock};

use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::config::WaveCastConfig;
use crate::models::{ForecastStep, LocationRegistry, VariableRegistry};

pub use bundle::{Field, InputBundle, OutputBundle};
pub use rollout::{HttpRolloutModel, RolloutModel};
pub use source::{ForecastSource, ModelSource, RandomSource, SourceKind};

static GLOBAL_PREDICTOR: OnceLock<Arc<WavePredictor>> = OnceLock::new();

/// Snapshot of the active backend
#[derive(Debug, Clone, Serialize)]
pub struct PredictorStatus {
    pub model_loaded: bool,
    pub backend: SourceKind,
    pub description: String,
}

/// Location-aware front of a forecast source
pub struct WavePredictor {
    locations: LocationRegistry,
    variables: VariableRegistry,
    source: Box<dyn ForecastSource>,
}

impl WavePredictor {
    pub fn new(source: Box<dyn ForecastSource>) -> Self {
        Self {
            locations: LocationRegistry::coastal(),
            variables: VariableRegistry,
            source,
        }
    }

    /// Predictor backed by the random fallback
    #[must_use]
    pub fn random(step_hours: u32) -> Self {
        Self::new(Box::new(RandomSource::new(step_hours)))
    }

    /// Predictor backed by an already loaded rollout model
    pub fn with_model(model: Arc<dyn RolloutModel>) -> Self {
        Self::new(Box::new(ModelSource::new(model)))
    }

    /// Select the backend once at startup
    ///
    /// Any failure to load the model is logged and answered with the random
    /// fallback; this never fails.
    pub async fn from_config(config: &WaveCastConfig, force_random: bool) -> Self {
        if force_random {
            info!("Random backend forced; skipping model load");
            return Self::random(config.forecast.step_hours);
        }

        if !config.model.enabled {
            info!("Model disabled in configuration. Predictions will be random");
            return Self::random(config.forecast.step_hours);
        }

        match HttpRolloutModel::load(&config.model).await {
            Ok(model) => {
                info!("Wave model {} loaded", model.name());
                Self::with_model(Arc::new(model))
            }
            Err(e) => {
                warn!("Failed to load wave model: {:#}", e);
                warn!("Predictions will be random as the model could not be loaded");
                Self::random(config.forecast.step_hours)
            }
        }
    }

    #[must_use]
    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    #[must_use]
    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    #[must_use]
    pub fn model_loaded(&self) -> bool {
        self.source.kind() == SourceKind::Model
    }

    #[must_use]
    pub fn status(&self) -> PredictorStatus {
        PredictorStatus {
            model_loaded: self.model_loaded(),
            backend: self.source.kind(),
            description: self.source.describe(),
        }
    }

    /// Forecast `steps` steps for a named location
    ///
    /// Returns `None` for an unknown location. A failing source yields an
    /// empty forecast rather than an error.
    #[instrument(skip(self))]
    pub async fn get_predictions(&self, location_name: &str, steps: u32) -> Option<Vec<ForecastStep>> {
        let location = self.locations.get(location_name)?;

        match self.source.forecast(location, steps).await {
            Ok(forecast) => Some(forecast),
            Err(e) => {
                error!("Forecast for {} failed: {:#}", location.name, e);
                error!("Returning empty predictions due to model error");
                Some(Vec::new())
            }
        }
    }
}

/// Installs the process-wide predictor. **Must be called once before use.**
pub fn init(predictor: WavePredictor) -> Result<Arc<WavePredictor>> {
    let predictor = Arc::new(predictor);
    GLOBAL_PREDICTOR
        .set(predictor.clone())
        .map_err(|_| anyhow!("Predictor already initialized"))?;
    Ok(predictor)
}

/// Returns the process-wide predictor.
/// # Panics
/// Panics if the predictor has not been installed by calling `predictor::init` first.
pub fn global() -> Arc<WavePredictor> {
    GLOBAL_PREDICTOR
        .get()
        .cloned()
        .expect("Predictor not initialized. Call predictor::init first.")
}
