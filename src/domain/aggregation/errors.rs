//! Aggregation error types.

use thiserror::Error;

use crate::domain::foundation::{AreaId, DomainError, ErrorCode};
use crate::ports::RasterError;

/// Errors raised while building tables or computing per-area variables.
///
/// Data sparsity is never an error here; it is reported as NaN variables.
#[derive(Debug, Clone, Error)]
pub enum AggregationError {
    #[error("Area id '{0}' appears more than once in the area table")]
    DuplicateAreaId(AreaId),

    #[error("Area '{loc_id}' is not marked unsampled but has no measurements for '{procedure}'")]
    InconsistentTables { loc_id: AreaId, procedure: String },

    #[error("Raster access failed for area '{loc_id}': {source}")]
    Raster {
        loc_id: AreaId,
        #[source]
        source: RasterError,
    },
}

impl AggregationError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AggregationError::DuplicateAreaId(_) => ErrorCode::DuplicateAreaId,
            AggregationError::InconsistentTables { .. } => ErrorCode::InconsistentTables,
            AggregationError::Raster { .. } => ErrorCode::RasterUnavailable,
        }
    }
}

impl From<AggregationError> for DomainError {
    fn from(err: AggregationError) -> Self {
        let loc_id = match &err {
            AggregationError::DuplicateAreaId(id)
            | AggregationError::InconsistentTables { loc_id: id, .. }
            | AggregationError::Raster { loc_id: id, .. } => id.to_string(),
        };
        DomainError::new(err.code(), err.to_string()).with_detail("loc_id", loc_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_area_maps_to_configuration_code() {
        let err = AggregationError::DuplicateAreaId(AreaId::from("a"));
        assert_eq!(err.code(), ErrorCode::DuplicateAreaId);
        assert!(err.code().is_configuration());
    }

    #[test]
    fn inconsistent_tables_converts_with_loc_id_detail() {
        let err: DomainError = AggregationError::InconsistentTables {
            loc_id: AreaId::from("cell-3"),
            procedure: "Max".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InconsistentTables);
        assert_eq!(err.details.get("loc_id"), Some(&"cell-3".to_string()));
    }
}
