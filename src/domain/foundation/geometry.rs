//! Planar geometry primitives.
//!
//! Coordinates are assumed to share one projected reference system; no
//! reprojection or validity repair happens here.

use serde::{Deserialize, Serialize};

/// A 2-D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Coordinate along `axis` (0 = x, 1 = y).
    pub fn coord(&self, axis: usize) -> f64 {
        if axis == 0 {
            self.x
        } else {
            self.y
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A polygon with one exterior ring and optional holes.
///
/// Rings may be open or closed; the closing edge is implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    exterior: Vec<Point>,
    #[serde(default)]
    holes: Vec<Vec<Point>>,
}

impl Polygon {
    /// Creates a polygon without holes.
    pub fn new(exterior: Vec<Point>) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }

    /// Creates a polygon with holes.
    pub fn with_holes(exterior: Vec<Point>, holes: Vec<Vec<Point>>) -> Self {
        Self { exterior, holes }
    }

    /// Axis-aligned rectangle, handy for grid cells.
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(vec![
            Point::new(min_x, min_y),
            Point::new(max_x, min_y),
            Point::new(max_x, max_y),
            Point::new(min_x, max_y),
        ])
    }

    pub fn exterior(&self) -> &[Point] {
        &self.exterior
    }

    pub fn holes(&self) -> &[Vec<Point>] {
        &self.holes
    }

    /// Bounding box of the exterior ring, `None` for an empty ring.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.exterior.first()?;
        let init = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(self.exterior.iter().fold(init, |bb, p| BoundingBox {
            min_x: bb.min_x.min(p.x),
            min_y: bb.min_y.min(p.y),
            max_x: bb.max_x.max(p.x),
            max_y: bb.max_y.max(p.y),
        }))
    }

    /// Even-odd containment test. Points inside a hole are outside.
    pub fn contains(&self, point: &Point) -> bool {
        ring_contains(&self.exterior, point) && !self.holes.iter().any(|h| ring_contains(h, point))
    }
}

fn ring_contains(ring: &[Point], p: &Point) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
