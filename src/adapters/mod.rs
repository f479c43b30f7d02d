//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external data:
//! - `raster` - Gridded prior information (in-memory store)
//! - `sampler` - New sample locations inside areas (uniform rejection)

pub mod raster;
pub mod sampler;

pub use raster::{GridRaster, InMemoryRasterStore};
pub use sampler::{UniformPolygonSampler, DEFAULT_ATTEMPTS_PER_POINT};
