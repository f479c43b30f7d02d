//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `RasterAccessor` - Pixel values under an area polygon (prior information)
//! - `PointSampler` - New sample locations within an area polygon

mod point_sampler;
mod raster_accessor;

pub use point_sampler::{PointSampler, SamplingError};
pub use raster_accessor::{RasterAccessor, RasterError};
