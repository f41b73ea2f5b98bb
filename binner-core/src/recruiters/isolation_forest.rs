//! Recruiter 4.H.3: an isolation forest recruiter.
//!
//! No crate in the workspace provides isolation forests, so this builds the standard
//! structure directly: a forest of random isolation trees, each splitting a random feature at
//! a random threshold until every point is alone in its leaf or a depth limit is hit. A point's
//! anomaly score is the harmonic-number-normalized average path length across the forest —
//! the usual isolation-forest score, in `[0, 1]` with higher meaning more anomalous.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

enum Node {
    Leaf { size: usize },
    Internal { feature: usize, threshold: f64, left: Box<Node>, right: Box<Node> },
}

fn subsample_size(n: usize) -> usize { n.min(256) }

fn build_tree(points: &[usize], features: &[Vec<f64>], dim: usize, depth: usize, max_depth: usize, rng: &mut SmallRng) -> Node {
    if points.len() <= 1 || depth >= max_depth {
        return Node::Leaf { size: points.len() };
    }
    let feature = rng.gen_range(0..dim);
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for &p in points {
        let v = features[p][feature];
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if (hi - lo).abs() < 1e-12 {
        return Node::Leaf { size: points.len() };
    }
    let threshold = rng.gen_range(lo..hi);
    let (left, right): (Vec<usize>, Vec<usize>) = points.iter().partition(|&&p| features[p][feature] < threshold);
    if left.is_empty() || right.is_empty() {
        return Node::Leaf { size: points.len() };
    }
    Node::Internal {
        feature,
        threshold,
        left: Box::new(build_tree(&left, features, dim, depth + 1, max_depth, rng)),
        right: Box::new(build_tree(&right, features, dim, depth + 1, max_depth, rng)),
    }
}

/// Average number of comparisons in an unsuccessful binary-tree search over `n` items; used to
/// normalize path lengths so leaves holding more than one point still contribute a (fractional)
/// path-length estimate instead of being treated as already fully isolated.
fn average_path_length_of_unsuccessful_search(n: usize) -> f64 {
    if n <= 1 { return 0.0; }
    let n = n as f64;
    2.0 * (harmonic_number(n - 1.0)) - (2.0 * (n - 1.0) / n)
}

fn harmonic_number(n: f64) -> f64 {
    // Euler-Mascheroni approximation, accurate to within 1e-4 for n >= 1.
    const EULER_MASCHERONI: f64 = 0.5772156649015329;
    n.ln() + EULER_MASCHERONI + 1.0 / (2.0 * n) - 1.0 / (12.0 * n * n)
}

fn path_length(node: &Node, point: &[f64], depth: usize) -> f64 {
    match node {
        Node::Leaf { size } => depth as f64 + average_path_length_of_unsuccessful_search(*size),
        Node::Internal { feature, threshold, left, right } => {
            if point[*feature] < *threshold {
                path_length(left, point, depth + 1)
            } else {
                path_length(right, point, depth + 1)
            }
        }
    }
}

struct IsolationForest {
    trees: Vec<Node>,
    subsample_n: usize,
}

impl IsolationForest {
    fn fit(features: &[Vec<f64>], dim: usize, n_trees: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let n = features.len();
        let sub_n = subsample_size(n);
        let max_depth = (sub_n.max(2) as f64).log2().ceil() as usize;

        let trees = (0..n_trees).map(|_| {
            let mut indices: Vec<usize> = (0..n).collect();
            for i in (1..indices.len()).rev() {
                let j = rng.gen_range(0..=i);
                indices.swap(i, j);
            }
            indices.truncate(sub_n);
            build_tree(&indices, features, dim, 0, max_depth, &mut rng)
        }).collect();

        IsolationForest { trees, subsample_n: sub_n }
    }

    fn score(&self, point: &[f64]) -> f64 {
        let mean_path: f64 = self.trees.iter().map(|t| path_length(t, point, 0)).sum::<f64>() / self.trees.len() as f64;
        let c = average_path_length_of_unsuccessful_search(self.subsample_n).max(1e-12);
        2f64.powf(-mean_path / c)
    }
}

/// Returns, per candidate row, whether it is recruited (its anomaly score lies inside the
/// anchor-score IQR bounds). Returns `None` if the anchor has too few trusted subcontigs.
pub fn isolation_forest_recruit(anchor_features: &[Vec<f64>], candidate_features: &[Vec<f64>], dim: usize,
                                 n_trees: usize, iqr_k: f64, seed: u64) -> Option<Vec<bool>> {
    if anchor_features.len() < 2 { return None; }

    let forest = IsolationForest::fit(anchor_features, dim, n_trees, seed);
    let anchor_scores: Vec<f64> = anchor_features.iter().map(|x| forest.score(x)).collect();
    let (lower, upper) = binner_stats::iqr_bounds(&anchor_scores, iqr_k);

    Some(candidate_features.iter()
        .map(|x| forest.score(x))
        .map(|s| s >= lower && s <= upper)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_far_outlier_scores_higher_than_inlier_cluster() {
        let anchor: Vec<Vec<f64>> = (0..30).map(|i| vec![(i as f64) * 0.01, 0.0]).collect();
        let forest = IsolationForest::fit(&anchor, 2, 100, 7);
        let inlier_score = forest.score(&[0.1, 0.0]);
        let outlier_score = forest.score(&[1000.0, 1000.0]);
        assert!(outlier_score > inlier_score);
    }

    #[test]
    fn test_insufficient_anchor_data_returns_none() {
        let anchor = vec![vec![1.0, 1.0]];
        assert!(isolation_forest_recruit(&anchor, &anchor, 2, 50, 0.5, 1).is_none());
    }
}
