//! Moran's I procedure configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::aggregation::{
    MoranIProcedure, DEFAULT_MORAN_K, DEFAULT_MORAN_MIN_N, DEFAULT_MORAN_PERMUTATIONS,
    DEFAULT_MORAN_P_THRESHOLD,
};

/// Parameters for the Moran's I statistic procedure
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoranConfig {
    /// Neighbors per point in the KNN weights, and expansion target
    #[serde(default = "default_k")]
    pub k: usize,

    /// Significance threshold on the pseudo p-value
    #[serde(default = "default_p_threshold")]
    pub p_threshold: f64,

    /// Areas with this many measurements or fewer report NaN
    #[serde(default = "default_min_n")]
    pub min_n: usize,

    /// Number of conditional permutations
    #[serde(default = "default_permutations")]
    pub permutations: usize,

    /// Base seed for reproducible permutations
    #[serde(default)]
    pub seed: Option<u64>,

    /// Also emit the pseudo p-value as a second variable
    #[serde(default)]
    pub emit_p_value: bool,
}

impl MoranConfig {
    /// Validate Moran configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.k == 0 {
            return Err(ValidationError::InvalidNeighborCount);
        }
        if !(self.p_threshold > 0.0 && self.p_threshold <= 1.0) {
            return Err(ValidationError::InvalidPThreshold(self.p_threshold));
        }
        if self.permutations == 0 {
            return Err(ValidationError::InvalidPermutations);
        }
        Ok(())
    }

    /// Builds the procedure these parameters describe.
    pub fn procedure(&self) -> MoranIProcedure {
        MoranIProcedure::from(self)
    }
}

impl Default for MoranConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            p_threshold: default_p_threshold(),
            min_n: default_min_n(),
            permutations: default_permutations(),
            seed: None,
            emit_p_value: false,
        }
    }
}

impl From<&MoranConfig> for MoranIProcedure {
    fn from(config: &MoranConfig) -> Self {
        MoranIProcedure {
            k: config.k,
            p_threshold: config.p_threshold,
            min_n: config.min_n,
            permutations: config.permutations,
            seed: config.seed,
            emit_p_value: config.emit_p_value,
            ..MoranIProcedure::default()
        }
    }
}

fn default_k() -> usize {
    DEFAULT_MORAN_K
}

fn default_p_threshold() -> f64 {
    DEFAULT_MORAN_P_THRESHOLD
}

fn default_min_n() -> usize {
    DEFAULT_MORAN_MIN_N
}

fn default_permutations() -> usize {
    DEFAULT_MORAN_PERMUTATIONS
}
