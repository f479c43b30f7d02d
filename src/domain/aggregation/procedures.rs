//! Statistic procedures - the closed set of per-area variable producers.
//!
//! Each procedure is a pure function of `(loc_id, state)`. Data sparsity
//! (unsampled area, too few points, non-significant test) is reported as a
//! NaN variable; only consistency faults and collaborator failures are errors.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::sync::Arc;
use tracing::{error, trace};

use super::{moran_test, AggregationError, AggregationState, KnnWeights};
use crate::domain::foundation::{AreaId, Point, Variable};
use crate::ports::RasterAccessor;

pub const DEFAULT_MORAN_K: usize = 5;
pub const DEFAULT_MORAN_P_THRESHOLD: f64 = 0.05;
pub const DEFAULT_MORAN_MIN_N: usize = 5;
pub const DEFAULT_MORAN_PERMUTATIONS: usize = 999;

/// Moran's I with permutation significance over a neighbor-expanded sample.
#[derive(Debug, Clone, PartialEq)]
pub struct MoranIProcedure {
    pub name: String,
    /// Neighbors pulled per local point, and neighbors per observation in the weights.
    pub k: usize,
    /// Statistics with `p_sim` at or above this are reported as NaN.
    pub p_threshold: f64,
    /// Local samples of this size or smaller are reported as NaN.
    pub min_n: usize,
    pub permutations: usize,
    /// Base seed; `None` draws from OS entropy on every call.
    pub seed: Option<u64>,
    /// Emit `<name>.p_sim` after the statistic.
    pub emit_p_value: bool,
}

impl Default for MoranIProcedure {
    fn default() -> Self {
        Self {
            name: "Moran.I".to_string(),
            k: DEFAULT_MORAN_K,
            p_threshold: DEFAULT_MORAN_P_THRESHOLD,
            min_n: DEFAULT_MORAN_MIN_N,
            permutations: DEFAULT_MORAN_PERMUTATIONS,
            seed: None,
            emit_p_value: false,
        }
    }
}

impl MoranIProcedure {
    fn p_value_name(&self) -> String {
        format!("{}.p_sim", self.name)
    }

    fn rng_for(&self, loc_id: &AreaId) -> ChaCha8Rng {
        match self.seed {
            // Per-area stream so results do not depend on evaluation order.
            Some(seed) => ChaCha8Rng::seed_from_u64(seed ^ fxhash::hash64(loc_id.as_str())),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    fn outputs(&self, statistic: f64, p_sim: f64) -> Vec<Variable> {
        let mut out = vec![Variable::new(self.name.clone(), statistic)];
        if self.emit_p_value {
            out.push(Variable::new(self.p_value_name(), p_sim));
        }
        out
    }

    fn compute(&self, loc_id: &AreaId, state: &AggregationState) -> Vec<Variable> {
        if state.is_unsampled(loc_id) {
            return self.outputs(f64::NAN, f64::NAN);
        }
        let subset = state.measurements_at(loc_id);
        if subset.len() <= self.min_n {
            return self.outputs(f64::NAN, f64::NAN);
        }

        let expanded = state.expand_to_k_nearest(&subset, self.k);
        let points: Vec<Point> = expanded.iter().map(|m| m.geometry).collect();
        let values: Vec<f64> = expanded.iter().map(|m| m.value).collect();
        let weights = KnnWeights::from_points(&points, self.k);

        let mut rng = self.rng_for(loc_id);
        match moran_test(&values, &weights, self.permutations, &mut rng) {
            Some(result) => {
                trace!(
                    loc_id = %loc_id,
                    i = result.i,
                    p_sim = result.p_sim,
                    n = values.len(),
                    "Moran's I computed"
                );
                let statistic = if result.is_significant(self.p_threshold) {
                    result.i
                } else {
                    f64::NAN
                };
                self.outputs(statistic, result.p_sim)
            }
            None => self.outputs(f64::NAN, f64::NAN),
        }
    }
}

/// Mean of a prior raster under the area polygon.
#[derive(Clone)]
pub struct PriorProcedure {
    pub name: String,
    /// Raster reference handed to the accessor (e.g. a file name).
    pub source: String,
    raster: Arc<dyn RasterAccessor>,
}

impl PriorProcedure {
    pub fn new(raster: Arc<dyn RasterAccessor>, source: impl Into<String>) -> Self {
        Self {
            name: "Prior".to_string(),
            source: source.into(),
            raster,
        }
    }

    fn compute(&self, loc_id: &AreaId, state: &AggregationState) -> Result<Variable, AggregationError> {
        let Some(area) = state.area(loc_id) else {
            return Ok(Variable::missing(self.name.clone()));
        };
        let values = self
            .raster
            .values_within(&self.source, &area.geometry)
            .map_err(|source| AggregationError::Raster {
                loc_id: loc_id.clone(),
                source,
            })?;
        Ok(Variable::new(self.name.clone(), mean(&values)))
    }
}

impl fmt::Debug for PriorProcedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorProcedure")
            .field("name", &self.name)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// A statistic computed per area, dispatched in registration order.
#[derive(Debug, Clone)]
pub enum StatisticProcedure {
    Max { name: String },
    Min { name: String },
    /// Population standard deviation.
    StdDev { name: String },
    Count { name: String },
    MoranI(MoranIProcedure),
    Prior(PriorProcedure),
}

impl StatisticProcedure {
    pub fn max() -> Self {
        StatisticProcedure::Max {
            name: "Max".to_string(),
        }
    }

    pub fn min() -> Self {
        StatisticProcedure::Min {
            name: "Min".to_string(),
        }
    }

    pub fn std_dev() -> Self {
        StatisticProcedure::StdDev {
            name: "Standard Deviation".to_string(),
        }
    }

    pub fn count() -> Self {
        StatisticProcedure::Count {
            name: "Count".to_string(),
        }
    }

    pub fn moran_i(procedure: MoranIProcedure) -> Self {
        StatisticProcedure::MoranI(procedure)
    }

    pub fn prior(raster: Arc<dyn RasterAccessor>, source: impl Into<String>) -> Self {
        StatisticProcedure::Prior(PriorProcedure::new(raster, source))
    }

    /// Replaces the display name.
    pub fn with_name(mut self, new_name: impl Into<String>) -> Self {
        let new_name = new_name.into();
        match &mut self {
            StatisticProcedure::Max { name }
            | StatisticProcedure::Min { name }
            | StatisticProcedure::StdDev { name }
            | StatisticProcedure::Count { name } => *name = new_name,
            StatisticProcedure::MoranI(p) => p.name = new_name,
            StatisticProcedure::Prior(p) => p.name = new_name,
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            StatisticProcedure::Max { name }
            | StatisticProcedure::Min { name }
            | StatisticProcedure::StdDev { name }
            | StatisticProcedure::Count { name } => name,
            StatisticProcedure::MoranI(p) => &p.name,
            StatisticProcedure::Prior(p) => &p.name,
        }
    }

    /// Names of the variables this procedure emits, in order.
    ///
    /// Fixed per configuration, independent of the queried area.
    pub fn output_names(&self) -> Vec<String> {
        match self {
            StatisticProcedure::MoranI(p) if p.emit_p_value => {
                vec![p.name.clone(), p.p_value_name()]
            }
            other => vec![other.name().to_string()],
        }
    }

    pub fn output_len(&self) -> usize {
        self.output_names().len()
    }

    /// Computes this procedure's variables for `loc_id`.
    pub fn compute(
        &self,
        loc_id: &AreaId,
        state: &AggregationState,
    ) -> Result<Vec<Variable>, AggregationError> {
        match self {
            StatisticProcedure::Max { name } => {
                self.aggregate(loc_id, state, name, |v| v.iter().copied().fold(f64::NEG_INFINITY, f64::max))
            }
            StatisticProcedure::Min { name } => {
                self.aggregate(loc_id, state, name, |v| v.iter().copied().fold(f64::INFINITY, f64::min))
            }
            StatisticProcedure::StdDev { name } => self.aggregate(loc_id, state, name, population_std),
            StatisticProcedure::Count { name } => self.aggregate(loc_id, state, name, |v| v.len() as f64),
            StatisticProcedure::MoranI(p) => Ok(p.compute(loc_id, state)),
            StatisticProcedure::Prior(p) => Ok(vec![p.compute(loc_id, state)?]),
        }
    }

    fn aggregate(
        &self,
        loc_id: &AreaId,
        state: &AggregationState,
        name: &str,
        reduce: impl Fn(&[f64]) -> f64,
    ) -> Result<Vec<Variable>, AggregationError> {
        if state.is_unsampled(loc_id) {
            return Ok(vec![Variable::missing(name)]);
        }
        let values = state.measurements().values_for(loc_id);
        if values.is_empty() {
            if state.areas().contains(loc_id) {
                error!(
                    loc_id = %loc_id,
                    procedure = name,
                    "Sampled area has no measurements"
                );
                return Err(AggregationError::InconsistentTables {
                    loc_id: loc_id.clone(),
                    procedure: name.to_string(),
                });
            }
            // Neither table knows this id.
            return Ok(vec![Variable::missing(name)]);
        }
        Ok(vec![Variable::new(name, reduce(&values))])
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
