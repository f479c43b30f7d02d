//! PointSampler port for drawing new sample locations inside an area.

use thiserror::Error;

use crate::domain::foundation::{AreaId, DomainError, ErrorCode, Point, Polygon};

/// Errors that can occur while drawing sample points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplingError {
    #[error("Area '{0}' has a degenerate polygon")]
    DegenerateGeometry(AreaId),

    #[error("Could only place {placed} of {requested} points in area '{loc_id}'")]
    Exhausted {
        loc_id: AreaId,
        requested: usize,
        placed: usize,
    },
}

impl SamplingError {
    pub fn loc_id(&self) -> &AreaId {
        match self {
            SamplingError::DegenerateGeometry(loc_id) | SamplingError::Exhausted { loc_id, .. } => {
                loc_id
            }
        }
    }
}

impl From<SamplingError> for DomainError {
    fn from(err: SamplingError) -> Self {
        let loc_id = err.loc_id().to_string();
        DomainError::new(ErrorCode::SamplingFailed, err.to_string()).with_detail("loc_id", loc_id)
    }
}

/// Draws point locations within a polygon.
pub trait PointSampler: Send + Sync {
    /// Returns exactly `n` points inside `polygon`.
    fn sample(&self, loc_id: &AreaId, polygon: &Polygon, n: usize) -> Result<Vec<Point>, SamplingError>;
}
