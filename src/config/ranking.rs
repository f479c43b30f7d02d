//! Ranking pipeline configuration

use serde::Deserialize;

use crate::domain::analysis::{
    CorrelationMethod, NormalizationMethod, RankingMethods, ScoringMethod, WeightingMethod,
};

/// Default method for each ranking stage.
///
/// Method names are checked during deserialization, so an unknown name
/// fails loading rather than validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub normalization: NormalizationMethod,

    #[serde(default)]
    pub weighting: WeightingMethod,

    /// Only used by CRITIC weighting
    #[serde(default)]
    pub correlation: CorrelationMethod,

    #[serde(default)]
    pub scoring: ScoringMethod,
}

impl RankingConfig {
    pub fn methods(&self) -> RankingMethods {
        RankingMethods {
            normalization: self.normalization,
            weighting: self.weighting,
            correlation: self.correlation,
            scoring: self.scoring,
        }
    }
}
