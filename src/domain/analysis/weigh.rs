//! Weighting stage - automatic criterion weights from a normalized matrix.

use nalgebra::DMatrix;
use tracing::warn;

use super::{correlation_matrix, CorrelationMethod, WeightingMethod};

/// Derives one weight per column of the normalized matrix `z`.
///
/// Weights are non-negative and sum to 1. When every raw weight is zero
/// (for example all columns constant, or fewer than two rows for the
/// dispersion-based methods) equal weights are returned instead.
///
/// `correlation` is only consulted by [`WeightingMethod::Critic`] and
/// [`WeightingMethod::Vic`].
pub fn weigh(z: &DMatrix<f64>, method: WeightingMethod, correlation: CorrelationMethod) -> Vec<f64> {
    let m = z.ncols();
    if m == 0 {
        return Vec::new();
    }
    let raw = match method {
        WeightingMethod::Mean => vec![1.0; m],
        WeightingMethod::Entropy => entropy_diversity(z),
        WeightingMethod::StandardDeviation => std_devs(z),
        WeightingMethod::Critic => critic(z, correlation),
        WeightingMethod::Vic => vic(z, correlation),
    };
    normalize_weights(raw, method)
}

fn normalize_weights(raw: Vec<f64>, method: WeightingMethod) -> Vec<f64> {
    let m = raw.len();
    let clean: Vec<f64> = raw
        .into_iter()
        .map(|w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect();
    let total: f64 = clean.iter().sum();
    if total <= 0.0 {
        warn!(method = %method, "All criteria carry zero information; using equal weights");
        return vec![1.0 / m as f64; m];
    }
    clean.into_iter().map(|w| w / total).collect()
}

/// Population standard deviation of every column.
fn std_devs(z: &DMatrix<f64>) -> Vec<f64> {
    let n = z.nrows() as f64;
    z.column_iter()
        .map(|col| {
            if n == 0.0 {
                return 0.0;
            }
            let mean = col.sum() / n;
            (col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt()
        })
        .collect()
}

/// Degree of diversification `1 - e_j` with `e_j` the normalized Shannon entropy.
fn entropy_diversity(z: &DMatrix<f64>) -> Vec<f64> {
    let n = z.nrows();
    if n < 2 {
        return vec![0.0; z.ncols()];
    }
    let ln_n = (n as f64).ln();
    z.column_iter()
        .map(|col| {
            let total: f64 = col.iter().map(|v| v.max(0.0)).sum();
            if total <= 0.0 {
                return 0.0;
            }
            let entropy: f64 = col
                .iter()
                .map(|v| v.max(0.0) / total)
                .filter(|&p| p > 0.0)
                .map(|p| -p * p.ln())
                .sum::<f64>()
                / ln_n;
            let diversity = 1.0 - entropy;
            // Rounding leaves uniform columns a hair above zero.
            if diversity < 1e-12 {
                0.0
            } else {
                diversity
            }
        })
        .collect()
}

/// `sd_j * sum_{k != j} (1 - r_jk)`.
fn critic(z: &DMatrix<f64>, correlation: CorrelationMethod) -> Vec<f64> {
    let sd = std_devs(z);
    let r = correlation_matrix(z, correlation);
    let m = z.ncols();
    (0..m)
        .map(|j| {
            let conflict: f64 = (0..m).filter(|&k| k != j).map(|k| 1.0 - r[(j, k)]).sum();
            sd[j] * conflict
        })
        .collect()
}

/// `sd_j / (1 + sum_{k != j} |r_jk|)`.
fn vic(z: &DMatrix<f64>, correlation: CorrelationMethod) -> Vec<f64> {
    let sd = std_devs(z);
    let r = correlation_matrix(z, correlation);
    let m = z.ncols();
    (0..m)
        .map(|j| {
            let dependence: f64 = (0..m).filter(|&k| k != j).map(|k| r[(j, k)].abs()).sum();
            sd[j] / (1.0 + dependence)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(cols: &[&[f64]]) -> DMatrix<f64> {
        DMatrix::from_fn(cols[0].len(), cols.len(), |i, j| cols[j][i])
    }

    fn sums_to_one(w: &[f64]) -> bool {
        (w.iter().sum::<f64>() - 1.0).abs() < 1e-12
    }

    #[test]
    fn mean_weights_are_equal() {
        let z = columns(&[&[0.1, 0.9], &[0.5, 0.5], &[1.0, 0.0], &[0.3, 0.2]]);
        assert_eq!(weigh(&z, WeightingMethod::Mean, CorrelationMethod::Pearson), vec![0.25; 4]);
    }

    #[test]
    fn critic_gives_zero_to_constant_column() {
        let z = columns(&[&[0.0, 0.5, 1.0, 0.2], &[0.5, 0.5, 0.5, 0.5], &[1.0, 0.0, 0.3, 0.9]]);
        for corr in CorrelationMethod::all() {
            let w = weigh(&z, WeightingMethod::Critic, *corr);
            assert_eq!(w[1], 0.0, "{corr}");
            assert!(w.iter().all(|v| *v >= 0.0));
            assert!(sums_to_one(&w));
        }
    }

    #[test]
    fn critic_prefers_less_redundant_columns() {
        // Columns 0 and 1 are identical; column 2 is independent with equal spread.
        let a = [0.0, 1.0, 0.0, 1.0];
        let c = [0.0, 0.0, 1.0, 1.0];
        let z = columns(&[&a[..], &a[..], &c[..]]);
        let w = weigh(&z, WeightingMethod::Critic, CorrelationMethod::Pearson);
        assert!(w[2] > w[0]);
        assert!((w[0] - w[1]).abs() < 1e-12);
    }

    #[test]
    fn vic_favors_independent_column_and_drops_constant_one() {
        let a = [0.0, 1.0, 0.0, 1.0];
        let c = [0.0, 0.0, 1.0, 1.0];
        let flat = [0.5, 0.5, 0.5, 0.5];
        let z = columns(&[&a[..], &a[..], &c[..], &flat[..]]);
        let w = weigh(&z, WeightingMethod::Vic, CorrelationMethod::Pearson);

        // Columns 0 and 1 each carry |r| = 1 to the other; column 2 carries none.
        assert!((w[2] - 2.0 * w[0]).abs() < 1e-12);
        assert!((w[0] - w[1]).abs() < 1e-12);
        assert_eq!(w[3], 0.0);
        assert!(sums_to_one(&w));
    }

    #[test]
    fn entropy_ignores_uniform_column() {
        let z = columns(&[&[0.25, 0.25, 0.25, 0.25], &[0.0, 0.1, 0.2, 0.7]]);
        let w = weigh(&z, WeightingMethod::Entropy, CorrelationMethod::Pearson);
        assert_eq!(w[0], 0.0);
        assert!((w[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn std_dev_weights_follow_spread() {
        let z = columns(&[&[0.0, 1.0], &[0.25, 0.75]]);
        let w = weigh(&z, WeightingMethod::StandardDeviation, CorrelationMethod::Pearson);
        assert!((w[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!(sums_to_one(&w));
    }

    #[test]
    fn all_constant_columns_fall_back_to_equal() {
        let z = columns(&[&[1.0, 1.0, 1.0], &[0.5, 0.5, 0.5]]);
        for method in WeightingMethod::all() {
            assert_eq!(weigh(&z, *method, CorrelationMethod::DistanceCorrelation), vec![0.5, 0.5]);
        }
    }
}
