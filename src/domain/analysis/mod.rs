//! Analysis Module - Multi-criteria ranking of areas.
//!
//! A [`DecisionMatrix`] (areas x criteria) flows through four stages, each
//! selected by name:
//!
//! - [`normalize`] - rescale columns, fill missing values
//! - [`weigh`] - derive criterion weights (CRITIC uses [`correlation_matrix`])
//! - [`score`] - one scalar per area
//! - [`Ranker`] - orders areas and assigns 1-based ranks
//!
//! All stages are pure functions over `nalgebra` matrices. The only I/O
//! happens upstream, in the aggregation state that feeds the matrix.

mod correlation;
mod decision_matrix;
mod errors;
mod methods;
mod normalize;
mod ranker;
mod score;
mod weigh;

pub use correlation::correlation_matrix;
pub use decision_matrix::DecisionMatrix;
pub use errors::RankingError;
pub use methods::{
    CorrelationMethod, NormalizationMethod, RankingMethods, RankingStage, ScoringMethod,
    WeightingMethod,
};
pub use normalize::{normalize, NormalizedMatrix};
pub use ranker::{RankedArea, Ranker, Ranking};
pub use score::{score, Scores};
pub use weigh::weigh;
