//! Normalization stage - column rescaling and missing-value fill.

use nalgebra::DMatrix;

use super::{NormalizationMethod, RankingError};

/// Normalized matrix with the orientation of each output column.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMatrix {
    pub values: DMatrix<f64>,
    /// `true` where higher normalized values are better.
    pub is_benefit: Vec<bool>,
}

/// Rescales every column of `x` with `method`.
///
/// Column statistics ignore NaN. After rescaling, NaN becomes the best end
/// of its column: 1 for benefit columns, 0 for cost columns. Degenerate
/// columns map to a fixed finite value:
///
/// | method  | degenerate case | value       |
/// |---------|-----------------|-------------|
/// | Linear1 | `max == 0`      | 1           |
/// | Linear2 | `max == min`    | 1           |
/// | Linear3 | `sum == 0`      | `1/n`       |
/// | Vector  | `norm == 0`     | `1/sqrt(n)` |
///
/// # Errors
/// `DimensionMismatch` if `is_benefit` does not have one entry per column.
pub fn normalize(
    x: &DMatrix<f64>,
    is_benefit: &[bool],
    method: NormalizationMethod,
) -> Result<NormalizedMatrix, RankingError> {
    if is_benefit.len() != x.ncols() {
        return Err(RankingError::dimension_mismatch(
            "is_benefit",
            x.ncols(),
            is_benefit.len(),
        ));
    }

    let mut values = x.clone();
    let mut out_benefit = Vec::with_capacity(x.ncols());

    for (j, &benefit) in is_benefit.iter().enumerate() {
        let column: Vec<f64> = x.column(j).iter().copied().collect();
        let (scaled, benefit_out) = match method {
            NormalizationMethod::Linear1 => (max_ratio(&column, benefit), true),
            NormalizationMethod::Linear2 => (min_max(&column, benefit), true),
            NormalizationMethod::Linear3 => (sum_share(&column), benefit),
            NormalizationMethod::Vector => (vector(&column), benefit),
        };
        let fill = if benefit_out { 1.0 } else { 0.0 };
        for (i, v) in scaled.into_iter().enumerate() {
            values[(i, j)] = if v.is_nan() { fill } else { v };
        }
        out_benefit.push(benefit_out);
    }

    Ok(NormalizedMatrix {
        values,
        is_benefit: out_benefit,
    })
}

struct ColumnStats {
    n: usize,
    min: f64,
    max: f64,
    sum: f64,
    sum_sq: f64,
}

fn stats(column: &[f64]) -> ColumnStats {
    column.iter().filter(|v| !v.is_nan()).fold(
        ColumnStats {
            n: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            sum_sq: 0.0,
        },
        |s, &v| ColumnStats {
            n: s.n + 1,
            min: s.min.min(v),
            max: s.max.max(v),
            sum: s.sum + v,
            sum_sq: s.sum_sq + v * v,
        },
    )
}

fn max_ratio(column: &[f64], benefit: bool) -> Vec<f64> {
    let s = stats(column);
    column
        .iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else if benefit {
                if s.max == 0.0 {
                    1.0
                } else {
                    v / s.max
                }
            } else if v == 0.0 {
                1.0
            } else {
                s.min / v
            }
        })
        .collect()
}

fn min_max(column: &[f64], benefit: bool) -> Vec<f64> {
    let s = stats(column);
    let range = s.max - s.min;
    column
        .iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else if range == 0.0 {
                1.0
            } else if benefit {
                (v - s.min) / range
            } else {
                (s.max - v) / range
            }
        })
        .collect()
}

fn sum_share(column: &[f64]) -> Vec<f64> {
    let s = stats(column);
    column
        .iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else if s.sum == 0.0 {
                1.0 / s.n as f64
            } else {
                v / s.sum
            }
        })
        .collect()
}

fn vector(column: &[f64]) -> Vec<f64> {
    let s = stats(column);
    let norm = s.sum_sq.sqrt();
    column
        .iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else if norm == 0.0 {
                1.0 / (s.n as f64).sqrt()
            } else {
                v / norm
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f64]]) -> DMatrix<f64> {
        DMatrix::from_fn(rows.len(), rows[0].len(), |i, j| rows[i][j])
    }

    fn col(z: &NormalizedMatrix, j: usize) -> Vec<f64> {
        z.values.column(j).iter().copied().collect()
    }

    #[test]
    fn linear2_flips_cost_columns_to_benefit() {
        let x = matrix(&[&[10.0, 1.0], &[5.0, 5.0], &[8.0, 3.0]]);
        let z = normalize(&x, &[true, false], NormalizationMethod::Linear2).unwrap();

        assert_eq!(z.is_benefit, vec![true, true]);
        assert_eq!(col(&z, 0), vec![1.0, 0.0, 0.6]);
        assert_eq!(col(&z, 1), vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn linear1_uses_ratios() {
        let x = matrix(&[&[10.0, 2.0], &[5.0, 4.0]]);
        let z = normalize(&x, &[true, false], NormalizationMethod::Linear1).unwrap();
        assert_eq!(col(&z, 0), vec![1.0, 0.5]);
        assert_eq!(col(&z, 1), vec![1.0, 0.5]);
        assert_eq!(z.is_benefit, vec![true, true]);
    }

    #[test]
    fn linear3_and_vector_preserve_orientation() {
        let x = matrix(&[&[1.0, 3.0], &[3.0, 4.0]]);
        let z3 = normalize(&x, &[true, false], NormalizationMethod::Linear3).unwrap();
        assert_eq!(z3.is_benefit, vec![true, false]);
        assert_eq!(col(&z3, 0), vec![0.25, 0.75]);

        let zv = normalize(&x, &[true, false], NormalizationMethod::Vector).unwrap();
        assert_eq!(zv.is_benefit, vec![true, false]);
        assert_eq!(col(&zv, 1), vec![0.6, 0.8]);
    }

    #[test]
    fn constant_columns_stay_finite() {
        let x = matrix(&[&[4.0, 0.0], &[4.0, 0.0], &[4.0, 0.0], &[4.0, 0.0]]);
        for method in NormalizationMethod::all() {
            let z = normalize(&x, &[true, false], *method).unwrap();
            assert!(z.values.iter().all(|v| v.is_finite()), "{method}");
        }
        let z = normalize(&x, &[true, true], NormalizationMethod::Linear2).unwrap();
        assert_eq!(col(&z, 0), vec![1.0; 4]);
        let z = normalize(&x, &[true, true], NormalizationMethod::Vector).unwrap();
        assert_eq!(col(&z, 1), vec![0.5; 4]);
    }

    #[test]
    fn nan_fills_to_best_end_of_column() {
        let x = matrix(&[&[f64::NAN, 2.0], &[1.0, f64::NAN], &[3.0, 4.0]]);
        let z = normalize(&x, &[true, false], NormalizationMethod::Linear3).unwrap();
        assert_eq!(z.values[(0, 0)], 1.0);
        assert_eq!(z.values[(1, 1)], 0.0);
        assert_eq!(z.values[(2, 0)], 0.75);
    }

    #[test]
    fn all_nan_column_is_filled() {
        let x = matrix(&[&[f64::NAN], &[f64::NAN]]);
        let z = normalize(&x, &[true], NormalizationMethod::Linear2).unwrap();
        assert_eq!(col(&z, 0), vec![1.0, 1.0]);
    }

    #[test]
    fn is_benefit_length_must_match() {
        let x = matrix(&[&[1.0, 2.0]]);
        let err = normalize(&x, &[true], NormalizationMethod::Linear2).unwrap_err();
        assert!(matches!(err, RankingError::DimensionMismatch { expected: 2, actual: 1, .. }));
    }
}
