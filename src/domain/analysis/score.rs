//! Scoring stage - one scalar per alternative from normalized values and weights.

use super::{NormalizedMatrix, ScoringMethod};

/// Per-row scores and the direction in which they are better.
#[derive(Debug, Clone, PartialEq)]
pub struct Scores {
    pub values: Vec<f64>,
    /// `true` when a higher score is better.
    pub descending: bool,
}

/// Scores every row of `z` with `weights` (one per column).
///
/// Callers guarantee `weights.len() == z.values.ncols()`.
pub fn score(z: &NormalizedMatrix, weights: &[f64], method: ScoringMethod) -> Scores {
    match method {
        ScoringMethod::Saw => Scores {
            values: saw(z, weights),
            descending: true,
        },
        ScoringMethod::Topsis => {
            let (d_best, d_worst) = ideal_distances(z, weights);
            let values = d_best
                .iter()
                .zip(&d_worst)
                .map(|(&plus, &minus)| {
                    let total = plus + minus;
                    if total == 0.0 {
                        0.5
                    } else {
                        minus / total
                    }
                })
                .collect();
            Scores {
                values,
                descending: true,
            }
        }
        ScoringMethod::MultiplicativeExponential => Scores {
            values: mew(z, weights),
            descending: true,
        },
        ScoringMethod::ModifiedTopsis => {
            let (d_best, d_worst) = ideal_distances(z, weights);
            let best_min = d_best.iter().copied().fold(f64::INFINITY, f64::min);
            let worst_max = d_worst.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let values = d_best
                .iter()
                .zip(&d_worst)
                .map(|(&plus, &minus)| ((plus - best_min).powi(2) + (minus - worst_max).powi(2)).sqrt())
                .collect();
            Scores {
                values,
                descending: false,
            }
        }
    }
}

/// Weighted sum; cost columns contribute negatively.
fn saw(z: &NormalizedMatrix, weights: &[f64]) -> Vec<f64> {
    z.values
        .row_iter()
        .map(|row| {
            row.iter()
                .zip(weights)
                .zip(&z.is_benefit)
                .map(|((v, w), &benefit)| if benefit { w * v } else { -w * v })
                .sum()
        })
        .collect()
}

/// `prod_j v_ij ^ w_j` over benefit-oriented values `v`.
///
/// Cost columns are mirrored within their own range so that larger is
/// better; negative values are clamped to 0.
fn mew(z: &NormalizedMatrix, weights: &[f64]) -> Vec<f64> {
    let (n, m) = z.values.shape();
    let mirror: Vec<Option<f64>> = (0..m)
        .map(|j| {
            if z.is_benefit[j] || n == 0 {
                return None;
            }
            let (lo, hi) = z.values.column(j).iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), &v| (lo.min(v), hi.max(v)),
            );
            Some(lo + hi)
        })
        .collect();

    (0..n)
        .map(|i| {
            (0..m)
                .map(|j| {
                    let v = z.values[(i, j)];
                    let oriented = mirror[j].map_or(v, |span| span - v).max(0.0);
                    oriented.powf(weights[j])
                })
                .product()
        })
        .collect()
}

/// Euclidean distances of each weighted row to the ideal and anti-ideal points.
fn ideal_distances(z: &NormalizedMatrix, weights: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let (n, m) = z.values.shape();
    let weighted = |i: usize, j: usize| z.values[(i, j)] * weights[j];

    let mut best = vec![0.0; m];
    let mut worst = vec![0.0; m];
    for j in 0..m {
        let (lo, hi) = (0..n).map(|i| weighted(i, j)).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        );
        if z.is_benefit[j] {
            best[j] = hi;
            worst[j] = lo;
        } else {
            best[j] = lo;
            worst[j] = hi;
        }
    }

    (0..n)
        .map(|i| {
            let (plus, minus) = (0..m).fold((0.0, 0.0), |(plus, minus), j| {
                let v = weighted(i, j);
                (plus + (v - best[j]).powi(2), minus + (v - worst[j]).powi(2))
            });
            (plus.sqrt(), minus.sqrt())
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn normalized(rows: &[&[f64]], is_benefit: &[bool]) -> NormalizedMatrix {
        NormalizedMatrix {
            values: DMatrix::from_fn(rows.len(), rows[0].len(), |i, j| rows[i][j]),
            is_benefit: is_benefit.to_vec(),
        }
    }

    #[test]
    fn saw_is_weighted_sum() {
        let z = normalized(&[&[1.0, 1.0], &[0.0, 0.0], &[0.6, 0.5]], &[true, true]);
        let s = score(&z, &[0.5, 0.5], ScoringMethod::Saw);
        assert!(s.descending);
        assert_eq!(s.values, vec![1.0, 0.0, 0.55]);
    }

    #[test]
    fn saw_subtracts_cost_columns() {
        let z = normalized(&[&[0.5, 0.1], &[0.5, 0.4]], &[true, false]);
        let s = score(&z, &[0.5, 0.5], ScoringMethod::Saw);
        assert!(s.values[0] > s.values[1]);
    }

    #[test]
    fn topsis_closeness_is_one_for_ideal_row() {
        let z = normalized(&[&[1.0, 1.0], &[0.0, 0.0], &[0.5, 0.5]], &[true, true]);
        let s = score(&z, &[0.5, 0.5], ScoringMethod::Topsis);
        assert_eq!(s.values[0], 1.0);
        assert_eq!(s.values[1], 0.0);
        assert!((s.values[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn topsis_identical_rows_score_half() {
        let z = normalized(&[&[0.3], &[0.3]], &[true]);
        let s = score(&z, &[1.0], ScoringMethod::Topsis);
        assert_eq!(s.values, vec![0.5, 0.5]);
    }

    #[test]
    fn modified_topsis_is_ascending_and_zero_for_ideal_row() {
        let z = normalized(&[&[1.0, 1.0], &[0.0, 0.0], &[0.5, 0.5]], &[true, true]);
        let s = score(&z, &[0.5, 0.5], ScoringMethod::ModifiedTopsis);
        assert!(!s.descending);
        assert_eq!(s.values[0], 0.0);
        assert!(s.values[1] > s.values[2]);
    }

    #[test]
    fn mew_is_weighted_product() {
        let z = normalized(&[&[1.0, 1.0], &[0.25, 1.0], &[0.0, 0.5]], &[true, true]);
        let s = score(&z, &[0.5, 0.5], ScoringMethod::MultiplicativeExponential);
        assert!(s.descending);
        assert_eq!(s.values[0], 1.0);
        assert!((s.values[1] - 0.5).abs() < 1e-12);
        assert_eq!(s.values[2], 0.0);
    }

    #[test]
    fn mew_mirrors_cost_columns() {
        let z = normalized(&[&[0.2], &[0.8], &[0.5]], &[false]);
        let s = score(&z, &[1.0], ScoringMethod::MultiplicativeExponential);
        assert!((s.values[0] - 0.8).abs() < 1e-12);
        assert!((s.values[1] - 0.2).abs() < 1e-12);
        assert!(s.values[0] > s.values[2] && s.values[2] > s.values[1]);
    }

    #[test]
    fn topsis_respects_cost_orientation() {
        let z = normalized(&[&[0.2], &[0.8]], &[false]);
        let s = score(&z, &[1.0], ScoringMethod::Topsis);
        assert_eq!(s.values, vec![1.0, 0.0]);
    }
}
