//! Ranking error types.

use thiserror::Error;

use super::RankingStage;
use crate::domain::aggregation::AggregationError;
use crate::domain::foundation::{AreaId, DomainError, ErrorCode};

/// Errors raised by the decision matrix builder and the ranking pipeline.
///
/// Every variant except `Aggregation` is a configuration error: the
/// pipeline fails before producing any ranking.
#[derive(Debug, Clone, Error)]
pub enum RankingError {
    #[error("Unknown {stage} method '{name}'")]
    UnknownMethod { stage: RankingStage, name: String },

    #[error("Length of {what} must be {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Row for area '{loc_id}' has {actual} values, expected {expected}")]
    RaggedRow {
        loc_id: AreaId,
        expected: usize,
        actual: usize,
    },

    #[error("Area '{loc_id}' appears more than once")]
    DuplicateAreaId { loc_id: AreaId },

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

impl RankingError {
    pub fn unknown_method(stage: RankingStage, name: impl Into<String>) -> Self {
        RankingError::UnknownMethod {
            stage,
            name: name.into(),
        }
    }

    pub fn dimension_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        RankingError::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            RankingError::UnknownMethod { .. } => ErrorCode::UnknownMethod,
            RankingError::DimensionMismatch { .. } | RankingError::RaggedRow { .. } => {
                ErrorCode::DimensionMismatch
            }
            RankingError::DuplicateAreaId { .. } => ErrorCode::DuplicateAreaId,
            RankingError::Aggregation(inner) => inner.code(),
        }
    }
}

impl From<RankingError> for DomainError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::Aggregation(inner) => inner.into(),
            RankingError::UnknownMethod { stage, ref name } => {
                DomainError::new(err.code(), err.to_string())
                    .with_detail("stage", stage.to_string())
                    .with_detail("method", name.clone())
            }
            RankingError::DuplicateAreaId { ref loc_id } => {
                DomainError::new(err.code(), err.to_string()).with_detail("loc_id", loc_id.to_string())
            }
            other => DomainError::new(other.code(), other.to_string()),
        }
    }
}
