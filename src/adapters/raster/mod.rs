//! Raster adapters.
//!
//! - `InMemoryRasterStore` - Named `GridRaster`s held in memory

mod in_memory;

pub use in_memory::{GridRaster, InMemoryRasterStore};
