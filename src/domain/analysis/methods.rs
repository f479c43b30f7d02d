//! Named strategy selections for each ranking stage.
//!
//! Names are parsed case-insensitively; an unrecognized name is a fatal
//! configuration error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::RankingError;

/// Stages of the ranking pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankingStage {
    Normalize,
    Correlate,
    Weigh,
    Score,
}

impl fmt::Display for RankingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RankingStage::Normalize => "normalization",
            RankingStage::Correlate => "correlation",
            RankingStage::Weigh => "weighting",
            RankingStage::Score => "scoring",
        };
        write!(f, "{}", s)
    }
}

/// Implements `FromStr`, `Display`, `TryFrom<String>` and `From<_> for String`
/// over a fixed name table.
macro_rules! named_method {
    ($ty:ident, $stage:expr, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Canonical method name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }

            /// All recognized methods.
            pub fn all() -> &'static [$ty] {
                &[$($ty::$variant),+]
            }
        }

        impl FromStr for $ty {
            type Err = RankingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $(
                    if wanted.eq_ignore_ascii_case($name) {
                        return Ok($ty::$variant);
                    }
                )+
                Err(RankingError::unknown_method($stage, s))
            }
        }

        impl TryFrom<String> for $ty {
            type Error = RankingError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

/// Column normalization scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NormalizationMethod {
    /// Max ratio: `x / max` (benefit), `min / x` (cost). Output all benefit.
    Linear1,
    /// Min-max: `(x - min) / range` (benefit), `(max - x) / range` (cost). Output all benefit.
    #[default]
    Linear2,
    /// Sum share `x / sum`, orientation preserved.
    Linear3,
    /// Euclidean `x / ||x||`, orientation preserved.
    Vector,
}

named_method!(NormalizationMethod, RankingStage::Normalize, {
    Linear1 => "Linear1",
    Linear2 => "Linear2",
    Linear3 => "Linear3",
    Vector => "Vector",
});

/// Automatic criterion weighting scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WeightingMethod {
    /// Equal (mean) weights.
    #[default]
    Mean,
    /// Shannon entropy of each column.
    Entropy,
    /// Proportional to column standard deviation.
    StandardDeviation,
    /// Standard deviation times total dissimilarity to the other columns.
    Critic,
    /// Standard deviation damped by total absolute correlation with the other columns.
    Vic,
}

named_method!(WeightingMethod, RankingStage::Weigh, {
    Mean => "MW",
    Entropy => "EM",
    StandardDeviation => "SD",
    Critic => "CRITIC",
    Vic => "VIC",
});

/// Correlation measure used by CRITIC and VIC weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    AbsPearson,
    /// Distance correlation; O(n^2) time and memory per column.
    DistanceCorrelation,
}

named_method!(CorrelationMethod, RankingStage::Correlate, {
    Pearson => "Pearson",
    AbsPearson => "AbsPearson",
    DistanceCorrelation => "dCor",
});

/// Scoring scheme combining normalized values and weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScoringMethod {
    /// Simple additive weighting. Higher is better.
    #[default]
    Saw,
    /// Relative closeness to the ideal solution. Higher is better.
    Topsis,
    /// Modified TOPSIS distance to the reference point. Lower is better.
    ModifiedTopsis,
    /// Weighted product of benefit-oriented values. Higher is better.
    MultiplicativeExponential,
}

named_method!(ScoringMethod, RankingStage::Score, {
    Saw => "SAW",
    Topsis => "TOPSIS",
    ModifiedTopsis => "mTOPSIS",
    MultiplicativeExponential => "MEW",
});

/// Method choice for every stage of one ranking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RankingMethods {
    #[serde(default)]
    pub normalization: NormalizationMethod,
    #[serde(default)]
    pub weighting: WeightingMethod,
    #[serde(default)]
    pub correlation: CorrelationMethod,
    #[serde(default)]
    pub scoring: ScoringMethod,
}

impl RankingMethods {
    /// Parses optional method names, keeping defaults for `None`.
    pub fn from_names(
        normalization: Option<&str>,
        weighting: Option<&str>,
        correlation: Option<&str>,
        scoring: Option<&str>,
    ) -> Result<Self, RankingError> {
        let defaults = Self::default();
        Ok(Self {
            normalization: normalization
                .map(str::parse::<NormalizationMethod>)
                .transpose()?
                .unwrap_or(defaults.normalization),
            weighting: weighting
                .map(str::parse::<WeightingMethod>)
                .transpose()?
                .unwrap_or(defaults.weighting),
            correlation: correlation
                .map(str::parse::<CorrelationMethod>)
                .transpose()?
                .unwrap_or(defaults.correlation),
            scoring: scoring
                .map(str::parse::<ScoringMethod>)
                .transpose()?
                .unwrap_or(defaults.scoring),
        })
    }
}
