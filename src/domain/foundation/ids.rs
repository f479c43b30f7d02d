//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Unique identifier of a sampling unit (grid cell or administrative polygon).
///
/// Opaque: only equality, hashing and ordering are meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(String);

impl AreaId {
    /// Creates an AreaId, rejecting blank identifiers.
    pub fn try_new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::empty_field("loc_id"));
        }
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AreaId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

impl From<&str> for AreaId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AreaId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u32> for AreaId {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for AreaId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
