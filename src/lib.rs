//! Survey Allocator - Where to sample next
//!
//! This crate aggregates historical point measurements into per-area
//! variables (extrema, dispersion, counts, spatial autocorrelation, raster
//! priors) and ranks areas with a multi-criteria decision pipeline so new
//! field samples can be allocated to the most informative areas.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
