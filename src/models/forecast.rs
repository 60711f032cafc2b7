//! Forecast step model

use super::Variable;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Round to two decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Values of the selected variables for one step
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Predictions {
    pub swh: f64,
    pub mwp: f64,
    pub pp1d: f64,
    pub wind: f64,
}

impl Predictions {
    #[must_use]
    pub fn get(&self, variable: Variable) -> f64 {
        match variable {
            Variable::Swh => self.swh,
            Variable::Mwp => self.mwp,
            Variable::Pp1d => self.pp1d,
            Variable::Wind => self.wind,
        }
    }

    /// Store a value rounded to two decimals
    pub fn set(&mut self, variable: Variable, value: f64) {
        let value = round2(value);
        match variable {
            Variable::Swh => self.swh = value,
            Variable::Mwp => self.mwp = value,
            Variable::Pp1d => self.pp1d = value,
            Variable::Wind => self.wind = value,
        }
    }

    /// Build from a per-variable value function, rounding every value
    pub fn from_fn(mut value: impl FnMut(Variable) -> f64) -> Self {
        let mut predictions = Self::default();
        for variable in Variable::ALL {
            predictions.set(variable, value(variable));
        }
        predictions
    }

    /// Whether every value lies within its clamp range
    #[must_use]
    pub fn within_bounds(&self) -> bool {
        Variable::ALL.into_iter().all(|variable| {
            let (min, max) = variable.clamp_range();
            (min..=max).contains(&self.get(variable))
        })
    }
}

/// One forecast step for a location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastStep {
    /// Valid time of this step
    pub timestamp: DateTime<Utc>,
    /// 1-based step index
    pub step: u32,
    /// Selected variable values
    pub predictions: Predictions,
}

impl ForecastStep {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, step: u32, predictions: Predictions) -> Self {
        Self {
            timestamp,
            step,
            predictions,
        }
    }

    /// ISO-8601 timestamp as written to JSON and CSV
    #[must_use]
    pub fn iso_timestamp(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}
