//! Domain layer containing the aggregation and ranking logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (area ids, geometry, variables, errors)
//! - `aggregation` - Per-area statistics over point measurements
//! - `analysis` - Multi-criteria ranking of areas

pub mod aggregation;
pub mod analysis;
pub mod foundation;
