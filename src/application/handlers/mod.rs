//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod ranking;
pub mod sampling;

pub use ranking::{RankAreasCommand, RankAreasHandler};
pub use sampling::{SampleAreasCommand, SampleAreasHandler, SampledPoint};
