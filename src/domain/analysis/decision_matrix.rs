//! Decision Matrix - per-area variables stacked into an alternatives x criteria matrix.

use nalgebra::DMatrix;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

use super::RankingError;
use crate::domain::aggregation::AggregationState;
use crate::domain::foundation::AreaId;

/// Rows are areas in caller order; columns are criteria in procedure
/// registration order (multi-output procedures span consecutive columns).
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionMatrix {
    ids: Vec<AreaId>,
    criteria: Vec<String>,
    values: DMatrix<f64>,
}

impl DecisionMatrix {
    /// Builds the matrix directly from rows.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `ids` and `rows` differ in length
    /// - `RaggedRow` if a row's length differs from `criteria`
    /// - `DuplicateAreaId` if an id appears twice
    pub fn from_rows(
        ids: Vec<AreaId>,
        criteria: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, RankingError> {
        ensure_unique(&ids)?;
        if ids.len() != rows.len() {
            return Err(RankingError::dimension_mismatch("alternative ids", rows.len(), ids.len()));
        }
        let m = criteria.len();
        if let Some((id, row)) = ids.iter().zip(&rows).find(|(_, row)| row.len() != m) {
            return Err(RankingError::RaggedRow {
                loc_id: id.clone(),
                expected: m,
                actual: row.len(),
            });
        }
        let values = DMatrix::from_fn(rows.len(), m, |i, j| rows[i][j]);
        Ok(Self {
            ids,
            criteria,
            values,
        })
    }

    /// Queries the state once per id, in order.
    pub fn build(state: &AggregationState, loc_ids: &[AreaId]) -> Result<Self, RankingError> {
        ensure_unique(loc_ids)?;
        let rows = loc_ids
            .iter()
            .map(|id| Self::row_for(state, id))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(loc_ids.to_vec(), state.variable_names(), rows)
    }

    /// Parallel [`DecisionMatrix::build`]; rows are joined back by area id.
    pub fn build_par(state: &AggregationState, loc_ids: &[AreaId]) -> Result<Self, RankingError> {
        ensure_unique(loc_ids)?;
        let computed = loc_ids
            .par_iter()
            .map(|id| Ok((id.clone(), Self::row_for(state, id)?)))
            .collect::<Result<HashMap<AreaId, Vec<f64>>, RankingError>>()?;

        let rows = loc_ids
            .iter()
            .map(|id| computed.get(id).cloned().unwrap_or_default())
            .collect();
        Self::from_rows(loc_ids.to_vec(), state.variable_names(), rows)
    }

    fn row_for(state: &AggregationState, loc_id: &AreaId) -> Result<Vec<f64>, RankingError> {
        Ok(state.get(loc_id)?.iter().map(|v| v.value()).collect())
    }

    pub fn ids(&self) -> &[AreaId] {
        &self.ids
    }

    pub fn criteria(&self) -> &[String] {
        &self.criteria
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn n_alternatives(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_criteria(&self) -> usize {
        self.values.ncols()
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    pub fn row(&self, i: usize) -> Vec<f64> {
        self.values.row(i).iter().copied().collect()
    }

    pub fn column(&self, j: usize) -> Vec<f64> {
        self.values.column(j).iter().copied().collect()
    }
}

fn ensure_unique(ids: &[AreaId]) -> Result<(), RankingError> {
    let mut seen = HashSet::with_capacity(ids.len());
    match ids.iter().find(|id| !seen.insert(*id)) {
        Some(id) => Err(RankingError::DuplicateAreaId { loc_id: id.clone() }),
        None => Ok(()),
    }
}
