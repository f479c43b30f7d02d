//! Ranker - runs normalize, weigh, score and rank over a decision matrix.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use super::{normalize, score, weigh, DecisionMatrix, RankingError, RankingMethods};
use crate::domain::foundation::AreaId;

/// One area's place in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedArea {
    pub loc_id: AreaId,
    pub score: f64,
    /// Position in the ranking, starting at 1.
    pub rank: usize,
}

/// Areas ordered best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    entries: Vec<RankedArea>,
    descending: bool,
    weights: Vec<f64>,
}

impl Ranking {
    pub fn iter(&self) -> impl Iterator<Item = &RankedArea> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[RankedArea] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at 0-based position `index` (rank `index + 1`).
    pub fn get(&self, index: usize) -> Option<&RankedArea> {
        self.entries.get(index)
    }

    pub fn rank_of(&self, loc_id: &AreaId) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| &e.loc_id == loc_id)
            .map(|e| e.rank)
    }

    pub fn loc_ids_in_order(&self) -> Vec<AreaId> {
        self.entries.iter().map(|e| e.loc_id.clone()).collect()
    }

    /// Whether higher scores ranked first.
    pub fn is_descending(&self) -> bool {
        self.descending
    }

    /// Weights actually applied, explicit or derived.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Ranks decision matrices with a fixed selection of methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    methods: RankingMethods,
}

impl Ranker {
    pub fn new(methods: RankingMethods) -> Self {
        Self { methods }
    }

    pub fn methods(&self) -> RankingMethods {
        self.methods
    }

    /// Ranks every row of `matrix`.
    ///
    /// `weights`, when given, replace the weighting stage and must have one
    /// entry per criterion; their sum is not checked.
    ///
    /// # Errors
    /// `DimensionMismatch` when `is_benefit` or `weights` do not match the
    /// criteria count. Checked before any stage runs.
    pub fn rank(
        &self,
        matrix: &DecisionMatrix,
        is_benefit: &[bool],
        weights: Option<&[f64]>,
    ) -> Result<Ranking, RankingError> {
        let m = matrix.n_criteria();
        if is_benefit.len() != m {
            return Err(RankingError::dimension_mismatch("is_benefit", m, is_benefit.len()));
        }
        if let Some(w) = weights {
            if w.len() != m {
                return Err(RankingError::dimension_mismatch("weights", m, w.len()));
            }
        }

        let z = normalize(matrix.values(), is_benefit, self.methods.normalization)?;
        debug!(
            method = %self.methods.normalization,
            alternatives = matrix.n_alternatives(),
            criteria = m,
            "Normalized decision matrix"
        );

        let weights = match weights {
            Some(w) => w.to_vec(),
            None => {
                let w = weigh(&z.values, self.methods.weighting, self.methods.correlation);
                debug!(method = %self.methods.weighting, weights = ?w, "Derived criterion weights");
                w
            }
        };

        let scores = score(&z, &weights, self.methods.scoring);
        debug!(method = %self.methods.scoring, descending = scores.descending, "Scored alternatives");

        let entries = rank_scores(matrix.ids(), &scores.values, scores.descending);
        Ok(Ranking {
            entries,
            descending: scores.descending,
            weights,
        })
    }
}

/// Stable sort by score, NaN last. Rank is the 1-based position, so equal
/// scores keep input order and still get distinct ranks.
fn rank_scores(ids: &[AreaId], scores: &[f64], descending: bool) -> Vec<RankedArea> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| compare_scores(scores[a], scores[b], descending));

    order
        .into_iter()
        .enumerate()
        .map(|(position, i)| RankedArea {
            loc_id: ids[i].clone(),
            score: scores[i],
            rank: position + 1,
        })
        .collect()
}

fn compare_scores(a: f64, b: f64, descending: bool) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if descending => b.total_cmp(&a),
        (false, false) => a.total_cmp(&b),
    }
}
