//! Global Moran's I with k-nearest-neighbor weights and permutation inference.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::KdTree;
use crate::domain::foundation::Point;

/// Row-standardized k-nearest-neighbor spatial weights.
///
/// Each observation's neighbors are its `k` nearest other observations
/// (all others when fewer exist), each weighted `1 / n_neighbors`.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnWeights {
    neighbors: Vec<Vec<usize>>,
}

impl KnnWeights {
    pub fn from_points(points: &[Point], k: usize) -> Self {
        let tree = KdTree::build(points.to_vec());
        let neighbors = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                tree.nearest(p, k + 1)
                    .into_iter()
                    .filter(|&j| j != i)
                    .take(k)
                    .collect()
            })
            .collect();
        Self { neighbors }
    }

    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.neighbors[i]
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Sum of all weights (`S0`). Equals the number of rows with neighbors.
    pub fn s0(&self) -> f64 {
        self.neighbors.iter().filter(|n| !n.is_empty()).count() as f64
    }

    /// Spatial lag `sum_j w_ij z_j` for observation `i`.
    fn lag(&self, i: usize, z: &[f64]) -> f64 {
        let n = &self.neighbors[i];
        if n.is_empty() {
            return 0.0;
        }
        n.iter().map(|&j| z[j]).sum::<f64>() / n.len() as f64
    }
}

/// Outcome of a Moran's I test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoranResult {
    /// Observed statistic.
    pub i: f64,
    /// Expected value under spatial randomness, `-1 / (n - 1)`.
    pub expected: f64,
    /// Pseudo p-value from the permutation reference distribution.
    pub p_sim: f64,
    pub permutations: usize,
}

impl MoranResult {
    pub fn is_significant(&self, threshold: f64) -> bool {
        self.p_sim < threshold
    }
}

/// Computes Moran's I and its permutation p-value.
///
/// Returns `None` when the statistic is undefined: fewer than two values,
/// zero variance, mismatched lengths, or weights without any neighbor.
pub fn moran_test<R: Rng + ?Sized>(
    values: &[f64],
    weights: &KnnWeights,
    permutations: usize,
    rng: &mut R,
) -> Option<MoranResult> {
    let n = values.len();
    if n < 2 || weights.len() != n {
        return None;
    }
    let s0 = weights.s0();
    if s0 == 0.0 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let z: Vec<f64> = values.iter().map(|v| v - mean).collect();
    let z2: f64 = z.iter().map(|v| v * v).sum();
    if z2 <= f64::EPSILON * n as f64 || !z2.is_finite() {
        return None;
    }

    let statistic = |z: &[f64]| -> f64 {
        let cross: f64 = (0..n).map(|i| z[i] * weights.lag(i, z)).sum();
        (n as f64 / s0) * cross / z2
    };

    let observed = statistic(&z);

    let mut shuffled = z.clone();
    let mut larger = 0usize;
    for _ in 0..permutations {
        shuffled.shuffle(rng);
        if statistic(&shuffled) >= observed {
            larger += 1;
        }
    }
    if permutations - larger < larger {
        larger = permutations - larger;
    }

    Some(MoranResult {
        i: observed,
        expected: -1.0 / (n as f64 - 1.0),
        p_sim: (larger as f64 + 1.0) / (permutations as f64 + 1.0),
        permutations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn line(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, 0.0)).collect()
    }

    #[test]
    fn weights_exclude_self_and_cap_at_available_points() {
        let w = KnnWeights::from_points(&line(3), 5);
        assert_eq!(w.neighbors(0), &[1, 2]);
        assert_eq!(w.neighbors(1).len(), 2);
        assert!(!w.neighbors(1).contains(&1));
        assert_eq!(w.s0(), 3.0);
    }

    #[test]
    fn smooth_gradient_is_positively_autocorrelated() {
        let points = line(30);
        let values: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let w = KnnWeights::from_points(&points, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let result = moran_test(&values, &w, 999, &mut rng).unwrap();
        assert!(result.i > 0.5, "I = {}", result.i);
        assert!(result.is_significant(0.05), "p = {}", result.p_sim);
    }

    #[test]
    fn alternating_values_are_negatively_autocorrelated() {
        let points = line(20);
        let values: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let w = KnnWeights::from_points(&points, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let result = moran_test(&values, &w, 499, &mut rng).unwrap();
        assert!(result.i < 0.0);
        assert!(result.expected < 0.0);
    }

    #[test]
    fn constant_values_are_undefined() {
        let w = KnnWeights::from_points(&line(6), 2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(moran_test(&[3.0; 6], &w, 99, &mut rng).is_none());
    }

    #[test]
    fn p_sim_is_bounded() {
        let points = line(12);
        let values = [5.0, 1.0, 4.0, 2.0, 8.0, 3.0, 9.0, 0.5, 7.0, 6.0, 2.5, 4.5];
        let w = KnnWeights::from_points(&points, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let result = moran_test(&values, &w, 199, &mut rng).unwrap();
        assert!(result.p_sim > 0.0 && result.p_sim <= 0.5 + 1.0 / 200.0);
    }
}
