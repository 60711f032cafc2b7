//! HTTP API
//!
//! JSON endpoints for the registries and forecasts, plus a CSV download.

pub mod export;

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use crate::config::ForecastConfig;
use crate::{Result, WaveCastError};
use crate::models::{ForecastStep, LocationRegistry, VariableRegistry};
use crate::predictor::{PredictorStatus, WavePredictor};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<WavePredictor>,
    pub forecast: ForecastConfig,
}

/// Query params for forecast endpoints
///
/// `steps` is kept as text so a malformed value falls back to the default
/// instead of rejecting the request. Negative counts mean an empty forecast.
#[derive(Debug, Deserialize)]
pub struct StepsQuery {
    pub steps: Option<String>,
}

impl StepsQuery {
    /// Requested step count, or the configured default
    #[must_use]
    pub fn resolve(&self, config: &ForecastConfig) -> u32 {
        self.steps
            .as_deref()
            .and_then(|steps| steps.trim().parse::<i64>().ok())
            .map(|steps| u32::try_from(steps.max(0)).unwrap_or(u32::MAX))
            .unwrap_or(config.default_steps)
    }
}

#[derive(Serialize)]
struct StatusResponse {
    #[serde(flatten)]
    predictor: PredictorStatus,
    version: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/locations", get(get_locations))
        .route("/variables", get(get_variables))
        .route("/predict/{location}", get(predict))
        .route("/predict_csv/{location}", get(predict_csv))
        .route("/status", get(get_status))
        .with_state(state)
}

async fn forecast_for(
    state: &AppState,
    location: &str,
    query: &StepsQuery,
) -> Result<Vec<ForecastStep>> {
    let steps = query.resolve(&state.forecast);
    state
        .predictor
        .get_predictions(location, steps)
        .await
        .ok_or_else(|| WaveCastError::not_found(location))
}

async fn get_locations(State(state): State<AppState>) -> Json<LocationRegistry> {
    Json(*state.predictor.locations())
}

async fn get_variables(State(state): State<AppState>) -> Json<VariableRegistry> {
    Json(*state.predictor.variables())
}

#[instrument(skip(state))]
async fn predict(
    State(state): State<AppState>,
    Path(location): Path<String>,
    Query(query): Query<StepsQuery>,
) -> Result<Json<Vec<ForecastStep>>> {
    forecast_for(&state, &location, &query).await.map(Json)
}

#[instrument(skip(state))]
async fn predict_csv(
    State(state): State<AppState>,
    Path(location): Path<String>,
    Query(query): Query<StepsQuery>,
) -> Result<Response> {
    let forecast = forecast_for(&state, &location, &query).await?;

    let body = export::forecast_to_csv(&forecast).map_err(|e| {
        error!("Failed to render CSV for {}: {:#}", location, e);
        WaveCastError::general(format!("CSV export failed: {e}"))
    })?;

    let filename = format!(
        "attachment; filename=\"{}_forecast.csv\"",
        location.replace([' ', ','], "_")
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, filename),
        ],
        body,
    )
        .into_response())
}

async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        predictor: state.predictor.status(),
        version: crate::VERSION,
    })
}
