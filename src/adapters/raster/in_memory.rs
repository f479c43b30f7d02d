//! In-memory raster store.
//!
//! Holds north-up grids keyed by source name. Suitable for tests and for
//! callers that decode rasters themselves before running an aggregation.

use std::collections::HashMap;
use std::ops::Range;

use crate::domain::foundation::{Point, Polygon};
use crate::ports::{RasterAccessor, RasterError};

/// A north-up grid of pixel values.
///
/// `origin` is the top-left corner. Row 0 is the northernmost row and
/// values are stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRaster {
    origin: Point,
    pixel_width: f64,
    pixel_height: f64,
    width: usize,
    height: usize,
    values: Vec<f64>,
    nodata: Option<f64>,
}

impl GridRaster {
    /// Creates a raster.
    ///
    /// # Errors
    /// `Unreadable` if the pixel size is not positive and finite or if
    /// `values.len() != width * height`.
    pub fn new(
        origin: Point,
        pixel_width: f64,
        pixel_height: f64,
        width: usize,
        height: usize,
        values: Vec<f64>,
    ) -> Result<Self, RasterError> {
        let valid_size = |s: f64| s.is_finite() && s > 0.0;
        if !valid_size(pixel_width) || !valid_size(pixel_height) {
            return Err(RasterError::Unreadable(format!(
                "pixel size must be positive, got {pixel_width} x {pixel_height}"
            )));
        }
        if values.len() != width * height {
            return Err(RasterError::Unreadable(format!(
                "expected {} values for a {width} x {height} grid, got {}",
                width * height,
                values.len()
            )));
        }
        Ok(Self {
            origin,
            pixel_width,
            pixel_height,
            width,
            height,
            values,
            nodata: None,
        })
    }

    /// Marks `nodata` as the no-data sentinel.
    pub fn with_nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Center of the pixel at `(row, col)`.
    pub fn pixel_center(&self, row: usize, col: usize) -> Point {
        Point::new(
            self.origin.x + (col as f64 + 0.5) * self.pixel_width,
            self.origin.y - (row as f64 + 0.5) * self.pixel_height,
        )
    }

    fn is_valid(&self, v: f64) -> bool {
        !v.is_nan() && self.nodata != Some(v)
    }

    /// Valid values of the pixels whose center lies inside `polygon`, in
    /// row-major order.
    pub fn values_within(&self, polygon: &Polygon) -> Vec<f64> {
        let Some(bb) = polygon.bounding_box() else {
            return Vec::new();
        };
        let cols = index_span(
            (bb.min_x - self.origin.x) / self.pixel_width,
            (bb.max_x - self.origin.x) / self.pixel_width,
            self.width,
        );
        let rows = index_span(
            (self.origin.y - bb.max_y) / self.pixel_height,
            (self.origin.y - bb.min_y) / self.pixel_height,
            self.height,
        );

        let mut out = Vec::new();
        for row in rows {
            for col in cols.clone() {
                let v = self.values[row * self.width + col];
                if self.is_valid(v) && polygon.contains(&self.pixel_center(row, col)) {
                    out.push(v);
                }
            }
        }
        out
    }
}

/// Pixel indices overlapping the fractional span `[lo, hi]`, clamped to the grid.
fn index_span(lo: f64, hi: f64, len: usize) -> Range<usize> {
    let start = (lo.floor().max(0.0) as usize).min(len);
    let end = (hi.ceil().max(0.0) as usize).min(len);
    start..end.max(start)
}

/// Named rasters held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRasterStore {
    rasters: HashMap<String, GridRaster>,
}

impl InMemoryRasterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `raster` under `source`, replacing any previous one.
    pub fn insert(&mut self, source: impl Into<String>, raster: GridRaster) {
        self.rasters.insert(source.into(), raster);
    }

    /// Builder form of [`InMemoryRasterStore::insert`].
    pub fn with_raster(mut self, source: impl Into<String>, raster: GridRaster) -> Self {
        self.insert(source, raster);
        self
    }

    pub fn contains(&self, source: &str) -> bool {
        self.rasters.contains_key(source)
    }
}

impl RasterAccessor for InMemoryRasterStore {
    fn values_within(&self, source: &str, polygon: &Polygon) -> Result<Vec<f64>, RasterError> {
        self.rasters
            .get(source)
            .map(|raster| raster.values_within(polygon))
            .ok_or_else(|| RasterError::NotFound(source.to_string()))
    }
}
