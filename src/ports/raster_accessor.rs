//! RasterAccessor port for reading pixel values under a polygon.

use thiserror::Error;

use crate::domain::foundation::Polygon;

/// Errors that can occur while reading a raster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// The raster reference could not be resolved.
    #[error("Raster not found: {0}")]
    NotFound(String),

    /// The raster exists but could not be read.
    #[error("Raster unreadable: {0}")]
    Unreadable(String),
}

/// Read access to gridded prior information.
///
/// Implementations must be safe to share across threads; they are called
/// once per area, possibly from a parallel fan-out.
pub trait RasterAccessor: Send + Sync {
    /// Returns the valid pixel values whose footprint lies inside `polygon`.
    ///
    /// No-data pixels are omitted. An empty vector means the polygon does
    /// not cover any valid pixel.
    fn values_within(&self, source: &str, polygon: &Polygon) -> Result<Vec<f64>, RasterError>;
}
