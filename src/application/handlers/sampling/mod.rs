//! Sampling command handlers.

mod sample_areas;

pub use sample_areas::{SampleAreasCommand, SampleAreasHandler, SampledPoint};
