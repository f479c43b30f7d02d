//! Aggregation Module - Per-area variables from raw point measurements.
//!
//! # Components
//!
//! - `MeasurementTable` / `AreaTable` - Input tables keyed by `AreaId`
//! - `StatisticProcedure` - Closed set of statistics (Max, Min, StdDev, Count, Moran's I, Prior)
//! - `AggregationState` - Runs procedures per area and exposes the full-table view
//! - `KdTree` - Spatial index used for neighbor expansion
//! - `moran_test` - Global Moran's I with permutation inference

mod errors;
mod moran;
mod procedures;
mod spatial_index;
mod state;
mod tables;
mod variable_table;

pub use errors::AggregationError;
pub use moran::{moran_test, KnnWeights, MoranResult};
pub use procedures::{
    MoranIProcedure, PriorProcedure, StatisticProcedure, DEFAULT_MORAN_K, DEFAULT_MORAN_MIN_N,
    DEFAULT_MORAN_PERMUTATIONS, DEFAULT_MORAN_P_THRESHOLD,
};
pub use spatial_index::KdTree;
pub use state::AggregationState;
pub use tables::{Area, AreaTable, Measurement, MeasurementTable};
pub use variable_table::VariableTable;
