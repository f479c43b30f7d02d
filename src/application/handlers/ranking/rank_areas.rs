//! RankAreasHandler - Ranks areas by their aggregated variables.

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::aggregation::AggregationState;
use crate::domain::analysis::{DecisionMatrix, Ranker, Ranking, RankingMethods};
use crate::domain::foundation::{AreaId, DomainError};

/// Command to rank areas.
#[derive(Debug, Clone, Default)]
pub struct RankAreasCommand {
    /// Areas to rank; `None` ranks every area in table order.
    pub loc_ids: Option<Vec<AreaId>>,
    /// One entry per criterion: `true` when higher is better.
    pub is_benefit: Vec<bool>,
    /// Explicit weights; `None` derives them with `methods.weighting`.
    pub weights: Option<Vec<f64>>,
    pub methods: RankingMethods,
    /// Build the decision matrix with a parallel fan-out.
    pub parallel: bool,
}

impl RankAreasCommand {
    pub fn new(is_benefit: Vec<bool>) -> Self {
        Self {
            is_benefit,
            ..Self::default()
        }
    }

    pub fn with_loc_ids(mut self, loc_ids: Vec<AreaId>) -> Self {
        self.loc_ids = Some(loc_ids);
        self
    }

    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_methods(mut self, methods: RankingMethods) -> Self {
        self.methods = methods;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Handler for ranking areas.
pub struct RankAreasHandler {
    state: Arc<AggregationState>,
}

impl RankAreasHandler {
    pub fn new(state: Arc<AggregationState>) -> Self {
        Self { state }
    }

    pub fn handle(&self, cmd: RankAreasCommand) -> Result<Ranking, DomainError> {
        // 1. Resolve the areas to rank
        let loc_ids = cmd
            .loc_ids
            .unwrap_or_else(|| self.state.areas().loc_ids());

        // 2. Build the decision matrix
        let matrix = if cmd.parallel {
            DecisionMatrix::build_par(&self.state, &loc_ids)?
        } else {
            DecisionMatrix::build(&self.state, &loc_ids)?
        };
        debug!(
            alternatives = matrix.n_alternatives(),
            criteria = matrix.n_criteria(),
            parallel = cmd.parallel,
            "Built decision matrix"
        );

        // 3. Rank
        let ranking = Ranker::new(cmd.methods).rank(&matrix, &cmd.is_benefit, cmd.weights.as_deref())?;

        info!(
            areas = ranking.len(),
            best = ranking.get(0).map(|e| e.loc_id.to_string()).unwrap_or_default(),
            scoring = %cmd.methods.scoring,
            "Ranked areas"
        );

        Ok(ranking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregation::{Area, AreaTable, Measurement, MeasurementTable, StatisticProcedure};
    use crate::domain::foundation::{ErrorCode, Point, Polygon};

    fn state() -> Arc<AggregationState> {
        let areas = AreaTable::new(vec![
            Area::new("north", Polygon::rectangle(0.0, 1.0, 1.0, 2.0)),
            Area::new("south", Polygon::rectangle(0.0, 0.0, 1.0, 1.0)),
            Area::new("east", Polygon::rectangle(1.0, 0.0, 2.0, 1.0)),
        ])
        .unwrap();
        let measurements = MeasurementTable::new(vec![
            Measurement::new("north", Point::new(0.5, 1.5), 9.0),
            Measurement::new("north", Point::new(0.4, 1.4), 7.0),
            Measurement::new("south", Point::new(0.5, 0.5), 2.0),
        ]);
        Arc::new(AggregationState::new(
            Arc::new(measurements),
            Arc::new(areas),
            vec![StatisticProcedure::max(), StatisticProcedure::count()],
        ))
    }

    #[test]
    fn ranks_every_area_by_default() {
        let handler = RankAreasHandler::new(state());
        // High max is good, many samples already is bad.
        let ranking = handler.handle(RankAreasCommand::new(vec![true, false])).unwrap();

        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking.get(0).unwrap().loc_id, AreaId::from("east"));
    }

    #[test]
    fn parallel_build_gives_same_ranking() {
        let handler = RankAreasHandler::new(state());
        let seq = handler.handle(RankAreasCommand::new(vec![true, false])).unwrap();
        let par = handler
            .handle(RankAreasCommand::new(vec![true, false]).parallel(true))
            .unwrap();
        assert_eq!(seq.loc_ids_in_order(), par.loc_ids_in_order());
    }

    #[test]
    fn explicit_subset_is_ranked_in_isolation() {
        let handler = RankAreasHandler::new(state());
        let ranking = handler
            .handle(
                RankAreasCommand::new(vec![true, true])
                    .with_loc_ids(vec![AreaId::from("south"), AreaId::from("north")]),
            )
            .unwrap();
        assert_eq!(
            ranking.loc_ids_in_order(),
            vec![AreaId::from("north"), AreaId::from("south")]
        );
    }

    #[test]
    fn mismatched_orientation_is_a_configuration_error() {
        let handler = RankAreasHandler::new(state());
        let err = handler.handle(RankAreasCommand::new(vec![true])).unwrap_err();
        assert_eq!(err.code, ErrorCode::DimensionMismatch);
        assert!(err.code.is_configuration());
    }

    #[test]
    fn repeated_area_in_request_is_rejected() {
        let handler = RankAreasHandler::new(state());
        for parallel in [false, true] {
            let err = handler
                .handle(
                    RankAreasCommand::new(vec![true, false])
                        .with_loc_ids(vec![AreaId::from("north"), AreaId::from("south"), AreaId::from("north")])
                        .parallel(parallel),
                )
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::DuplicateAreaId);
            assert_eq!(err.details.get("loc_id"), Some(&"north".to_string()));
        }
    }
}
