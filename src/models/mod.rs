//! Data models for the WaveCast service
//!
//! - Location: the fixed coastal location registry
//! - Variable: the four selected forecast variables
//! - Forecast: per-step forecast records

pub mod forecast;
pub mod location;
pub mod variable;

pub use forecast::{ForecastStep, Predictions, round2};
pub use location::{Location, LocationRegistry};
pub use variable::{Variable, VariableRegistry};
