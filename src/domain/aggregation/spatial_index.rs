//! Two-dimensional k-d tree for k-nearest-neighbor queries.
//!
//! Built per call and never mutated afterwards, so a tree can be shared
//! read-only between threads for the lifetime of one query batch.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::domain::foundation::Point;

#[derive(Debug, Clone)]
struct Node {
    point: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Neighbor candidate ordered by distance, then by stored index.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist_sq: f64,
    index: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist_sq
            .total_cmp(&other.dist_sq)
            .then(self.index.cmp(&other.index))
    }
}

/// Static k-d tree over a point set.
#[derive(Debug, Clone)]
pub struct KdTree {
    points: Vec<Point>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl KdTree {
    /// Builds the tree by recursive median splits on alternating axes.
    pub fn build(points: Vec<Point>) -> Self {
        let mut nodes = Vec::with_capacity(points.len());
        let mut order: Vec<usize> = (0..points.len()).collect();
        let root = Self::build_node(&points, &mut nodes, &mut order, 0);
        Self {
            points,
            nodes,
            root,
        }
    }

    fn build_node(
        points: &[Point],
        nodes: &mut Vec<Node>,
        order: &mut [usize],
        depth: usize,
    ) -> Option<usize> {
        if order.is_empty() {
            return None;
        }
        let axis = depth % 2;
        let mid = order.len() / 2;
        order.select_nth_unstable_by(mid, |&a, &b| {
            points[a]
                .coord(axis)
                .total_cmp(&points[b].coord(axis))
                .then(a.cmp(&b))
        });

        let slot = nodes.len();
        nodes.push(Node {
            point: order[mid],
            axis,
            left: None,
            right: None,
        });

        let (lower, rest) = order.split_at_mut(mid);
        let upper = &mut rest[1..];
        let left = Self::build_node(points, nodes, lower, depth + 1);
        let right = Self::build_node(points, nodes, upper, depth + 1);
        nodes[slot].left = left;
        nodes[slot].right = right;
        Some(slot)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Indices of the `k` stored points nearest to `query`, nearest first.
    ///
    /// Equal distances are ordered by stored index. Returns fewer than `k`
    /// indices when the tree holds fewer points.
    pub fn nearest(&self, query: &Point, k: usize) -> Vec<usize> {
        self.nearest_with_distance(query, k)
            .into_iter()
            .map(|(index, _)| index)
            .collect()
    }

    /// Like [`KdTree::nearest`], also returning squared distances.
    pub fn nearest_with_distance(&self, query: &Point, k: usize) -> Vec<(usize, f64)> {
        let mut heap = BinaryHeap::with_capacity(k + 1);
        if let Some(root) = self.root {
            if k > 0 {
                self.search(root, query, k, &mut heap);
            }
        }
        heap.into_sorted_vec()
            .into_iter()
            .map(|c| (c.index, c.dist_sq))
            .collect()
    }

    fn search(&self, node: usize, query: &Point, k: usize, heap: &mut BinaryHeap<Candidate>) {
        let n = &self.nodes[node];
        let p = &self.points[n.point];
        let candidate = Candidate {
            dist_sq: query.distance_sq(p),
            index: n.point,
        };

        if heap.len() < k {
            heap.push(candidate);
        } else if heap.peek().is_some_and(|worst| candidate < *worst) {
            heap.pop();
            heap.push(candidate);
        }

        let diff = query.coord(n.axis) - p.coord(n.axis);
        let (near, far) = if diff < 0.0 {
            (n.left, n.right)
        } else {
            (n.right, n.left)
        };

        if let Some(near) = near {
            self.search(near, query, k, heap);
        }
        if let Some(far) = far {
            let must_visit = heap.len() < k
                || heap
                    .peek()
                    .is_some_and(|worst| diff * diff <= worst.dist_sq);
            if must_visit {
                self.search(far, query, k, heap);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(points: &[Point], query: &Point, k: usize) -> Vec<usize> {
        let mut all: Vec<(f64, usize)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (query.distance_sq(p), i))
            .collect();
        all.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        all.into_iter().take(k).map(|(_, i)| i).collect()
    }

    fn grid(n: usize) -> Vec<Point> {
        let mut pts = Vec::new();
        for i in 0..n {
            for j in 0..n {
                pts.push(Point::new(i as f64 * 1.3, (j as f64 * 0.7) + (i % 3) as f64 * 0.11));
            }
        }
        pts
    }

    #[test]
    fn nearest_matches_brute_force() {
        let points = grid(9);
        let tree = KdTree::build(points.clone());
        for q in [
            Point::new(0.0, 0.0),
            Point::new(4.4, 2.1),
            Point::new(-3.0, 9.0),
            Point::new(10.5, 5.55),
        ] {
            for k in [1, 3, 5, 12] {
                assert_eq!(tree.nearest(&q, k), brute_force(&points, &q, k));
            }
        }
    }

    #[test]
    fn stored_point_is_its_own_nearest() {
        let points = grid(4);
        let tree = KdTree::build(points.clone());
        for (i, p) in points.iter().enumerate() {
            assert_eq!(tree.nearest(p, 1), vec![i]);
        }
    }

    #[test]
    fn k_larger_than_point_count_returns_all() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        let tree = KdTree::build(points);
        assert_eq!(tree.nearest(&Point::new(0.9, 0.0), 5), vec![1, 0]);
    }

    #[test]
    fn empty_tree_returns_nothing() {
        let tree = KdTree::build(Vec::new());
        assert!(tree.is_empty());
        assert!(tree.nearest(&Point::new(0.0, 0.0), 3).is_empty());
    }

    #[test]
    fn duplicate_points_break_ties_by_index() {
        let p = Point::new(1.0, 1.0);
        let tree = KdTree::build(vec![p, p, p, Point::new(5.0, 5.0)]);
        assert_eq!(tree.nearest(&p, 2), vec![0, 1]);
    }
}
