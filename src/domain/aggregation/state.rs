//! Aggregation State - per-area variable computation over measurement and area tables.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use super::{
    AggregationError, Area, AreaTable, KdTree, Measurement, MeasurementTable, StatisticProcedure,
    VariableTable,
};
use crate::domain::foundation::{AreaId, Point, Variable};

/// Owns read-only handles to both tables and the ordered procedure list.
///
/// The unsampled set (`area ids - measurement ids`) is computed once at
/// construction and never mutated.
#[derive(Debug, Clone)]
pub struct AggregationState {
    measurements: Arc<MeasurementTable>,
    areas: Arc<AreaTable>,
    procedures: Vec<StatisticProcedure>,
    unsampled: HashSet<AreaId>,
}

impl AggregationState {
    pub fn new(
        measurements: Arc<MeasurementTable>,
        areas: Arc<AreaTable>,
        procedures: Vec<StatisticProcedure>,
    ) -> Self {
        let sampled = measurements.loc_ids();
        let unsampled: HashSet<AreaId> = areas
            .areas()
            .iter()
            .filter(|a| !sampled.contains(&a.loc_id))
            .map(|a| a.loc_id.clone())
            .collect();

        debug!(
            measurements = measurements.len(),
            areas = areas.len(),
            unsampled = unsampled.len(),
            procedures = procedures.len(),
            "Aggregation state built"
        );

        Self {
            measurements,
            areas,
            procedures,
            unsampled,
        }
    }

    pub fn measurements(&self) -> &MeasurementTable {
        &self.measurements
    }

    pub fn areas(&self) -> &AreaTable {
        &self.areas
    }

    pub fn procedures(&self) -> &[StatisticProcedure] {
        &self.procedures
    }

    pub fn unsampled(&self) -> &HashSet<AreaId> {
        &self.unsampled
    }

    pub fn is_unsampled(&self, loc_id: &AreaId) -> bool {
        self.unsampled.contains(loc_id)
    }

    pub fn area(&self, loc_id: &AreaId) -> Option<&Area> {
        self.areas.get(loc_id)
    }

    /// Owned copies of the measurements recorded for `loc_id`.
    pub fn measurements_at(&self, loc_id: &AreaId) -> Vec<Measurement> {
        self.measurements
            .rows_for(loc_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Flattened output names of all procedures, in registration order.
    pub fn variable_names(&self) -> Vec<String> {
        self.procedures
            .iter()
            .flat_map(StatisticProcedure::output_names)
            .collect()
    }

    /// Runs every procedure for `loc_id` in registration order.
    ///
    /// Multi-variable outputs are flattened in place. Names are neither
    /// reordered nor deduplicated.
    pub fn get(&self, loc_id: &AreaId) -> Result<Vec<Variable>, AggregationError> {
        let mut variables = Vec::with_capacity(self.procedures.len());
        for procedure in &self.procedures {
            variables.extend(procedure.compute(loc_id, self)?);
        }
        Ok(variables)
    }

    /// Same as [`AggregationState::get`], split into parallel name/value arrays.
    pub fn get_numeric(&self, loc_id: &AreaId) -> Result<(Vec<String>, Vec<f64>), AggregationError> {
        Ok(self
            .get(loc_id)?
            .into_iter()
            .map(|v| (v.name().to_string(), v.value()))
            .unzip())
    }

    /// One row per area in the area table, sampled or not.
    pub fn for_all_areas(&self) -> Result<VariableTable, AggregationError> {
        let rows = self
            .areas
            .areas()
            .iter()
            .map(|a| Ok((a.loc_id.clone(), self.get(&a.loc_id)?)))
            .collect::<Result<Vec<_>, AggregationError>>()?;
        Ok(VariableTable::new(self.variable_names(), rows))
    }

    /// Parallel [`AggregationState::for_all_areas`]; rows are re-joined by area id.
    pub fn for_all_areas_par(&self) -> Result<VariableTable, AggregationError> {
        let mut computed = self
            .areas
            .areas()
            .par_iter()
            .map(|a| Ok((a.loc_id.clone(), self.get(&a.loc_id)?)))
            .collect::<Result<HashMap<AreaId, Vec<Variable>>, AggregationError>>()?;

        let rows = self
            .areas
            .loc_ids()
            .into_iter()
            .filter_map(|id| computed.remove(&id).map(|vars| (id, vars)))
            .collect();
        Ok(VariableTable::new(self.variable_names(), rows))
    }

    /// Pulls in the `k` nearest stored measurements around each subset point.
    ///
    /// A fresh index over all measurement points is built per call. Output
    /// order is subset order, then neighbor rank; duplicates are kept. When
    /// fewer than `k` points exist, every point is returned per query.
    pub fn expand_to_k_nearest(&self, subset: &[Measurement], k: usize) -> Vec<Measurement> {
        let rows = self.measurements.rows();
        let tree = KdTree::build(rows.iter().map(|m| m.geometry).collect::<Vec<Point>>());
        subset
            .iter()
            .flat_map(|m| tree.nearest(&m.geometry, k))
            .map(|i| rows[i].clone())
            .collect()
    }
}
