//! The four forecast variables exposed to API consumers

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A selected output variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Significant wave height (m)
    Swh,
    /// Mean wave period (s)
    Mwp,
    /// Peak wave period (s)
    Pp1d,
    /// Wind speed (m/s)
    Wind,
}

impl Variable {
    /// All selected variables in display order
    pub const ALL: [Variable; 4] = [Variable::Swh, Variable::Mwp, Variable::Pp1d, Variable::Wind];

    /// Short code, also the name of the model output field
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Variable::Swh => "swh",
            Variable::Mwp => "mwp",
            Variable::Pp1d => "pp1d",
            Variable::Wind => "wind",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Variable::Swh => "Significant Wave Height",
            Variable::Mwp => "Mean Wave Period",
            Variable::Pp1d => "Peak Wave Period",
            Variable::Wind => "Wind Speed",
        }
    }

    /// Range the random fallback draws from
    #[must_use]
    pub const fn fallback_range(self) -> (f64, f64) {
        match self {
            Variable::Swh => (0.5, 5.0),
            Variable::Mwp | Variable::Pp1d => (3.0, 15.0),
            Variable::Wind => (0.0, 25.0),
        }
    }

    /// Physically plausible bounds applied to model output
    #[must_use]
    pub const fn clamp_range(self) -> (f64, f64) {
        match self {
            Variable::Swh => (0.1, 10.0),
            Variable::Mwp | Variable::Pp1d => (1.0, 25.0),
            Variable::Wind => (0.0, 30.0),
        }
    }

    /// Clamp a raw model value into [`Variable::clamp_range`]
    ///
    /// NaN maps to the upper bound.
    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        let (min, max) = self.clamp_range();
        if value.is_nan() {
            max
        } else {
            value.clamp(min, max)
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Read-only registry of the selected variables
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableRegistry;

impl VariableRegistry {
    pub fn iter(&self) -> impl Iterator<Item = Variable> {
        Variable::ALL.into_iter()
    }
}

/// Serializes as `{code: label}` in display order
impl Serialize for VariableRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Variable::ALL.len()))?;
        for variable in self.iter() {
            map.serialize_entry(variable.code(), variable.label())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Variable::Swh, -3.0, 0.1)]
    #[case(Variable::Swh, 42.0, 10.0)]
    #[case(Variable::Mwp, 0.2, 1.0)]
    #[case(Variable::Pp1d, 30.0, 25.0)]
    #[case(Variable::Wind, -1.5, 0.0)]
    #[case(Variable::Wind, 12.34, 12.34)]
    #[case(Variable::Swh, f64::NAN, 10.0)]
    #[case(Variable::Pp1d, f64::NAN, 25.0)]
    #[case(Variable::Wind, f64::INFINITY, 30.0)]
    #[case(Variable::Mwp, f64::NEG_INFINITY, 1.0)]
    fn test_clamp(#[case] variable: Variable, #[case] raw: f64, #[case] expected: f64) {
        assert_eq!(variable.clamp(raw), expected);
    }

    #[test]
    fn test_fallback_range_inside_clamp_range() {
        for variable in Variable::ALL {
            let (low, high) = variable.fallback_range();
            let (min, max) = variable.clamp_range();
            assert!(min <= low && high <= max, "{variable}");
        }
    }

    #[test]
    fn test_registry_serializes_labels() {
        let json = serde_json::to_string(&VariableRegistry).unwrap();
        assert_eq!(
            json,
            r#"{"swh":"Significant Wave Height","mwp":"Mean Wave Period","pp1d":"Peak Wave Period","wind":"Wind Speed"}"#
        );
    }
}
