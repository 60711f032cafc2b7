//! `WaveCast` - wave and weather forecasts for coastal locations
//!
//! This library provides the location and variable registries, the forecast
//! adapter around an external rollout model with its random fallback, and the
//! HTTP API serving both.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod predictor;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use config::WaveCastConfig;
pub use error::WaveCastError;
pub use models::{ForecastStep, Location, LocationRegistry, Predictions, Variable, VariableRegistry};
pub use predictor::{ForecastSource, RolloutModel, SourceKind, WavePredictor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WaveCastError>;
