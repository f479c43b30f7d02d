//! Measurement and area tables consumed by the aggregation state.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::AggregationError;
use crate::domain::foundation::{AreaId, Point, Polygon};

/// A single historical point measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub loc_id: AreaId,
    pub geometry: Point,
    pub value: f64,
}

impl Measurement {
    pub fn new(loc_id: impl Into<AreaId>, geometry: Point, value: f64) -> Self {
        Self {
            loc_id: loc_id.into(),
            geometry,
            value,
        }
    }
}

/// A sampling unit (grid cell or administrative polygon).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub loc_id: AreaId,
    pub geometry: Polygon,
}

impl Area {
    pub fn new(loc_id: impl Into<AreaId>, geometry: Polygon) -> Self {
        Self {
            loc_id: loc_id.into(),
            geometry,
        }
    }
}

/// Measurements keyed (non-uniquely) by area id.
#[derive(Debug, Clone, Default)]
pub struct MeasurementTable {
    rows: Vec<Measurement>,
    by_loc: HashMap<AreaId, Vec<usize>>,
}

impl MeasurementTable {
    pub fn new(rows: Vec<Measurement>) -> Self {
        let mut by_loc: HashMap<AreaId, Vec<usize>> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            by_loc.entry(row.loc_id.clone()).or_default().push(idx);
        }
        Self { rows, by_loc }
    }

    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows recorded for `loc_id`, in insertion order.
    pub fn rows_for(&self, loc_id: &AreaId) -> Vec<&Measurement> {
        self.by_loc
            .get(loc_id)
            .map(|idx| idx.iter().map(|&i| &self.rows[i]).collect())
            .unwrap_or_default()
    }

    /// Measurement values recorded for `loc_id`.
    pub fn values_for(&self, loc_id: &AreaId) -> Vec<f64> {
        self.rows_for(loc_id).into_iter().map(|m| m.value).collect()
    }

    /// Distinct area ids that carry at least one measurement.
    pub fn loc_ids(&self) -> HashSet<&AreaId> {
        self.by_loc.keys().collect()
    }
}

/// Areas with unique ids, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AreaTable {
    areas: Vec<Area>,
    index: HashMap<AreaId, usize>,
}

impl AreaTable {
    /// Builds the table, failing on the first duplicate id.
    pub fn new(areas: Vec<Area>) -> Result<Self, AggregationError> {
        let mut index = HashMap::with_capacity(areas.len());
        for (i, area) in areas.iter().enumerate() {
            if index.insert(area.loc_id.clone(), i).is_some() {
                return Err(AggregationError::DuplicateAreaId(area.loc_id.clone()));
            }
        }
        Ok(Self { areas, index })
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn get(&self, loc_id: &AreaId) -> Option<&Area> {
        self.index.get(loc_id).map(|&i| &self.areas[i])
    }

    pub fn contains(&self, loc_id: &AreaId) -> bool {
        self.index.contains_key(loc_id)
    }

    /// Area ids in table order.
    pub fn loc_ids(&self) -> Vec<AreaId> {
        self.areas.iter().map(|a| a.loc_id.clone()).collect()
    }
}
