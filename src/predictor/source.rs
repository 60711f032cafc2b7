//! Forecast sources: the model-backed adapter and the random fallback

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::RngExt;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::bundle::InputBundle;
use super::rollout::RolloutModel;
use crate::WaveCastError;
use crate::models::{ForecastStep, Location, Predictions, Variable};

/// Which kind of source is serving forecasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Model,
    Random,
}

/// Produces forecast steps for a resolved location
#[async_trait]
pub trait ForecastSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Human-readable backend description
    fn describe(&self) -> String;

    async fn forecast(&self, location: &Location, steps: u32) -> Result<Vec<ForecastStep>>;
}

/// Uniform random values inside plausible ranges, used when no model is loaded
#[derive(Debug, Clone)]
pub struct RandomSource {
    step_hours: i64,
}

impl RandomSource {
    #[must_use]
    pub fn new(step_hours: u32) -> Self {
        Self {
            step_hours: i64::from(step_hours),
        }
    }
}

#[async_trait]
impl ForecastSource for RandomSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Random
    }

    fn describe(&self) -> String {
        "random fallback".to_string()
    }

    async fn forecast(&self, location: &Location, steps: u32) -> Result<Vec<ForecastStep>> {
        info!("Model not loaded. Generating random data for {}", location.name);

        let now = Utc::now();
        let mut rng = rand::rng();

        let forecast = (1..=steps)
            .map(|step| {
                let predictions = Predictions::from_fn(|variable| {
                    let (low, high) = variable.fallback_range();
                    rng.random_range(low..=high)
                });
                let timestamp = now + Duration::hours(self.step_hours * i64::from(step));
                ForecastStep::new(timestamp, step, predictions)
            })
            .collect();

        Ok(forecast)
    }
}

/// Drives an external rollout model and post-processes its output
pub struct ModelSource {
    model: Arc<dyn RolloutModel>,
}

impl ModelSource {
    pub fn new(model: Arc<dyn RolloutModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl ForecastSource for ModelSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Model
    }

    fn describe(&self) -> String {
        self.model.name().to_string()
    }

    async fn forecast(&self, location: &Location, steps: u32) -> Result<Vec<ForecastStep>> {
        if steps == 0 {
            return Ok(Vec::new());
        }

        let bundle = {
            let mut rng = rand::rng();
            InputBundle::placeholder(location, Utc::now(), &mut rng)
        };

        info!(
            "Running {} rollout for {} for {} steps",
            self.model.name(),
            location.name,
            steps
        );
        let outputs = self.model.rollout(&bundle, steps).await?;

        if outputs.len() != steps as usize {
            warn!(
                "Rollout returned {} steps, {} requested",
                outputs.len(),
                steps
            );
        }

        let mut forecast = Vec::with_capacity(outputs.len());
        for (step, output) in (1..).zip(&outputs) {
            let timestamp = output.valid_time().ok_or_else(|| {
                WaveCastError::model(format!("Rollout step {step} carries no timestamp"))
            })?;

            let mut predictions = Predictions::default();
            for variable in Variable::ALL {
                let raw = output.point_value(variable.code()).ok_or_else(|| {
                    WaveCastError::model(format!(
                        "Rollout step {step} is missing variable '{variable}'"
                    ))
                })?;
                predictions.set(variable, variable.clamp(raw));
            }

            forecast.push(ForecastStep::new(timestamp, step, predictions));
        }

        debug!("Extracted {} forecast steps", forecast.len());
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::bundle::{Field, OutputBundle, OutputMetadata};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    fn maldives() -> Location {
        Location::new("Maldives", 4.1755, 73.5093)
    }

    /// Returns fixed values for every step and records what it was asked
    struct FixedModel {
        values: [(&'static str, f32); 4],
        requests: Mutex<Vec<u32>>,
    }

    impl FixedModel {
        fn new(values: [(&'static str, f32); 4]) -> Self {
            Self {
                values,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RolloutModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn rollout(&self, bundle: &InputBundle, steps: u32) -> Result<Vec<OutputBundle>> {
            self.requests.lock().unwrap().push(steps);
            let start = *bundle.metadata.time.last().unwrap();
            Ok((1..=i64::from(steps))
                .map(|step| OutputBundle {
                    surf_vars: self
                        .values
                        .iter()
                        .map(|(name, value)| {
                            (
                                name.to_string(),
                                Field::new(vec![1, 1, 1, 1], vec![*value]).unwrap(),
                            )
                        })
                        .collect::<BTreeMap<_, _>>(),
                    metadata: OutputMetadata {
                        time: vec![
                            start + Duration::hours(6 * (step - 1)),
                            start + Duration::hours(6 * step),
                        ],
                    },
                })
                .collect())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl RolloutModel for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }

        async fn rollout(&self, _bundle: &InputBundle, _steps: u32) -> Result<Vec<OutputBundle>> {
            Err(WaveCastError::model("out of memory").into())
        }
    }

    #[tokio::test]
    async fn test_random_source_steps_and_ranges() {
        let source = RandomSource::new(6);
        let forecast = source.forecast(&maldives(), 12).await.unwrap();
        assert_eq!(forecast.len(), 12);
        for (i, step) in forecast.iter().enumerate() {
            assert_eq!(step.step as usize, i + 1);
            for variable in Variable::ALL {
                let (low, high) = variable.fallback_range();
                let value = step.predictions.get(variable);
                assert!((low..=high).contains(&value), "{variable}={value}");
            }
        }
        assert!(forecast.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        let spacing = forecast[1].timestamp - forecast[0].timestamp;
        assert_eq!(spacing, Duration::hours(6));
    }

    #[tokio::test]
    async fn test_random_source_zero_steps() {
        let forecast = RandomSource::new(6).forecast(&maldives(), 0).await.unwrap();
        assert!(forecast.is_empty());
    }

    #[tokio::test]
    async fn test_model_source_clamps_and_rounds() {
        let model = Arc::new(FixedModel::new([
            ("swh", 42.0),
            ("mwp", 0.25),
            ("pp1d", 12.3456),
            ("wind", -3.0),
        ]));
        let source = ModelSource::new(model.clone());
        let forecast = source.forecast(&maldives(), 3).await.unwrap();

        assert_eq!(forecast.len(), 3);
        assert_eq!(*model.requests.lock().unwrap(), vec![3]);
        for step in &forecast {
            assert_eq!(step.predictions.swh, 10.0);
            assert_eq!(step.predictions.mwp, 1.0);
            assert_eq!(step.predictions.pp1d, 12.35);
            assert_eq!(step.predictions.wind, 0.0);
        }
        assert!(forecast.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(forecast[2].step, 3);
    }

    #[tokio::test]
    async fn test_model_source_nan_output_stays_in_range() {
        let model = Arc::new(FixedModel::new([
            ("swh", f32::NAN),
            ("mwp", 8.0),
            ("pp1d", f32::NAN),
            ("wind", 5.0),
        ]));
        let forecast = ModelSource::new(model).forecast(&maldives(), 2).await.unwrap();

        assert_eq!(forecast[0].predictions.swh, 10.0);
        assert_eq!(forecast[0].predictions.pp1d, 25.0);
        assert!(forecast.iter().all(|step| step.predictions.within_bounds()));
        let json = serde_json::to_string(&forecast).unwrap();
        assert!(!json.contains("null"), "{json}");
    }

    #[tokio::test]
    async fn test_model_source_zero_steps_skips_rollout() {
        let model = Arc::new(FixedModel::new([
            ("swh", 1.0),
            ("mwp", 1.0),
            ("pp1d", 1.0),
            ("wind", 1.0),
        ]));
        let source = ModelSource::new(model.clone());
        assert!(source.forecast(&maldives(), 0).await.unwrap().is_empty());
        assert!(model.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_model_source_missing_variable_is_error() {
        let model = Arc::new(FixedModel::new([
            ("swh", 1.0),
            ("mwp", 1.0),
            ("pp1d", 1.0),
            ("10u", 1.0),
        ]));
        let result = ModelSource::new(model).forecast(&maldives(), 2).await;
        assert!(result.unwrap_err().to_string().contains("'wind'"));
    }

    #[tokio::test]
    async fn test_model_source_propagates_rollout_failure() {
        let source = ModelSource::new(Arc::new(FailingModel));
        assert_eq!(source.kind(), SourceKind::Model);
        assert_eq!(source.describe(), "failing");
        assert!(source.forecast(&maldives(), 4).await.is_err());
    }
}
