//! Point sampler adapters.

mod uniform;

pub use uniform::{UniformPolygonSampler, DEFAULT_ATTEMPTS_PER_POINT};
