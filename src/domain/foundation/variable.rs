//! Variable value object: the atomic per-area statistic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named numeric statistic computed for one area.
///
/// A NaN value means the statistic could not be computed for the area
/// (unsampled, too few points, or not significant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    value: f64,
}

impl Variable {
    /// Creates a new variable.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Creates a variable carrying the "not computable" sentinel.
    pub fn missing(name: impl Into<String>) -> Self {
        Self::new(name, f64::NAN)
    }

    /// Returns the variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variable value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns true if the value is the NaN sentinel.
    pub fn is_missing(&self) -> bool {
        self.value.is_nan()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
