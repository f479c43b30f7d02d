//! SampleAreasHandler - Places new sample points inside areas.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::aggregation::AreaTable;
use crate::domain::foundation::{AreaId, DomainError, ErrorCode, Point};
use crate::ports::PointSampler;

/// Command to draw new sample locations.
#[derive(Debug, Clone)]
pub struct SampleAreasCommand {
    /// Points to place per area, aligned with the area table order.
    pub counts: Vec<usize>,
}

/// A new sample location tagged with its area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledPoint {
    pub loc_id: AreaId,
    pub geometry: Point,
}

/// Handler for drawing sample points.
pub struct SampleAreasHandler {
    areas: Arc<AreaTable>,
    sampler: Arc<dyn PointSampler>,
}

impl SampleAreasHandler {
    pub fn new(areas: Arc<AreaTable>, sampler: Arc<dyn PointSampler>) -> Self {
        Self { areas, sampler }
    }

    /// Returns the new points grouped by area in table order.
    ///
    /// # Errors
    /// - `DimensionMismatch` if `counts` is not aligned with the area table
    /// - `SamplingFailed` if an area cannot hold its requested points
    pub fn handle(&self, cmd: SampleAreasCommand) -> Result<Vec<SampledPoint>, DomainError> {
        if cmd.counts.len() != self.areas.len() {
            return Err(DomainError::new(
                ErrorCode::DimensionMismatch,
                format!(
                    "Length of counts must be {}, got {}",
                    self.areas.len(),
                    cmd.counts.len()
                ),
            ));
        }

        let mut points = Vec::with_capacity(cmd.counts.iter().sum());
        for (area, &n) in self.areas.areas().iter().zip(&cmd.counts) {
            if n == 0 {
                continue;
            }
            let placed = self.sampler.sample(&area.loc_id, &area.geometry, n)?;
            debug!(loc_id = %area.loc_id, points = placed.len(), "Sampled area");
            points.extend(placed.into_iter().map(|geometry| SampledPoint {
                loc_id: area.loc_id.clone(),
                geometry,
            }));
        }

        info!(points = points.len(), "Generated sample points");
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregation::Area;
    use crate::domain::foundation::Polygon;
    use crate::ports::SamplingError;

    /// Returns the polygon's first vertex `n` times.
    struct CornerSampler;

    impl PointSampler for CornerSampler {
        fn sample(&self, loc_id: &AreaId, polygon: &Polygon, n: usize) -> Result<Vec<Point>, SamplingError> {
            let corner = polygon
                .exterior()
                .first()
                .copied()
                .ok_or_else(|| SamplingError::DegenerateGeometry(loc_id.clone()))?;
            Ok(vec![corner; n])
        }
    }

    fn areas() -> Arc<AreaTable> {
        Arc::new(
            AreaTable::new(vec![
                Area::new("a", Polygon::rectangle(0.0, 0.0, 1.0, 1.0)),
                Area::new("b", Polygon::rectangle(5.0, 5.0, 6.0, 6.0)),
                Area::new("c", Polygon::new(vec![])),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn places_requested_points_per_area() {
        let handler = SampleAreasHandler::new(areas(), Arc::new(CornerSampler));
        let points = handler
            .handle(SampleAreasCommand {
                counts: vec![2, 1, 0],
            })
            .unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].loc_id, AreaId::from("a"));
        assert_eq!(points[1].loc_id, AreaId::from("a"));
        assert_eq!(points[2].loc_id, AreaId::from("b"));
        assert_eq!(points[2].geometry, Point::new(5.0, 5.0));
    }

    #[test]
    fn zero_count_areas_are_never_sampled() {
        // Area "c" would fail if the sampler were called for it.
        let handler = SampleAreasHandler::new(areas(), Arc::new(CornerSampler));
        assert!(handler
            .handle(SampleAreasCommand {
                counts: vec![0, 0, 0],
            })
            .unwrap()
            .is_empty());
    }

    #[test]
    fn misaligned_counts_are_rejected() {
        let handler = SampleAreasHandler::new(areas(), Arc::new(CornerSampler));
        let err = handler
            .handle(SampleAreasCommand { counts: vec![1, 1] })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DimensionMismatch);
    }

    #[test]
    fn sampler_failures_surface_as_sampling_errors() {
        let handler = SampleAreasHandler::new(areas(), Arc::new(CornerSampler));
        let err = handler
            .handle(SampleAreasCommand {
                counts: vec![0, 0, 1],
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SamplingFailed);
        assert_eq!(err.details.get("loc_id"), Some(&"c".to_string()));
    }
}
