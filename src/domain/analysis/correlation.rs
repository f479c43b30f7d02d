//! Column correlation measures used by CRITIC weighting.

use nalgebra::DMatrix;

use super::CorrelationMethod;

/// Symmetric `m x m` correlation matrix between the columns of `z`.
///
/// Pearson correlations involving a zero-variance column are 0. The
/// diagonal is 1 except for zero-variance columns, where it is 0.
///
/// `DistanceCorrelation` materializes one `n x n` double-centered distance
/// matrix per column, so it costs O(m n^2) memory and O(m^2 n^2) time.
pub fn correlation_matrix(z: &DMatrix<f64>, method: CorrelationMethod) -> DMatrix<f64> {
    match method {
        CorrelationMethod::Pearson => pearson_matrix(z),
        CorrelationMethod::AbsPearson => pearson_matrix(z).map(f64::abs),
        CorrelationMethod::DistanceCorrelation => distance_correlation_matrix(z),
    }
}

fn pearson_matrix(z: &DMatrix<f64>) -> DMatrix<f64> {
    let (n, m) = z.shape();
    let centered: Vec<Vec<f64>> = (0..m)
        .map(|j| {
            let col = z.column(j);
            let mean = col.sum() / n as f64;
            col.iter().map(|v| v - mean).collect()
        })
        .collect();
    let norms: Vec<f64> = centered
        .iter()
        .map(|c| c.iter().map(|v| v * v).sum::<f64>().sqrt())
        .collect();

    DMatrix::from_fn(m, m, |a, b| {
        let denom = norms[a] * norms[b];
        if denom == 0.0 || n == 0 {
            return 0.0;
        }
        if a == b {
            return 1.0;
        }
        let dot: f64 = centered[a].iter().zip(&centered[b]).map(|(x, y)| x * y).sum();
        (dot / denom).clamp(-1.0, 1.0)
    })
}

/// Double-centered pairwise distance matrix of one column.
fn centered_distances(column: &[f64]) -> DMatrix<f64> {
    let n = column.len();
    let d = DMatrix::from_fn(n, n, |k, l| (column[k] - column[l]).abs());
    let row_means: Vec<f64> = (0..n).map(|k| d.row(k).sum() / n as f64).collect();
    let col_means: Vec<f64> = (0..n).map(|l| d.column(l).sum() / n as f64).collect();
    let grand = d.sum() / (n * n) as f64;
    DMatrix::from_fn(n, n, |k, l| d[(k, l)] - row_means[k] - col_means[l] + grand)
}

/// Squared distance covariance `dCov^2 = mean(A * B)`.
fn distance_covariance_sq(a: &DMatrix<f64>, b: &DMatrix<f64>) -> f64 {
    let n = a.nrows();
    if n == 0 {
        return 0.0;
    }
    (a.component_mul(b).sum() / (n * n) as f64).max(0.0)
}

fn distance_correlation_matrix(z: &DMatrix<f64>) -> DMatrix<f64> {
    let m = z.ncols();
    let centered: Vec<DMatrix<f64>> = (0..m)
        .map(|j| {
            let col: Vec<f64> = z.column(j).iter().copied().collect();
            centered_distances(&col)
        })
        .collect();
    let dvar: Vec<f64> = centered
        .iter()
        .map(|a| distance_covariance_sq(a, a))
        .collect();

    DMatrix::from_fn(m, m, |a, b| {
        let denom = (dvar[a] * dvar[b]).sqrt();
        if denom == 0.0 {
            return 0.0;
        }
        let dcor_sq = distance_covariance_sq(&centered[a], &centered[b]) / denom;
        dcor_sq.clamp(0.0, 1.0).sqrt()
    })
}
