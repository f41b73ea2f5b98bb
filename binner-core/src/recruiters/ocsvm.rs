//! Recruiter 4.H.2: a one-class support vector machine recruiter.
//!
//! No example in the workspace implements an SVM solver, so this approximates the RBF
//! one-class SVM decision boundary with its kernel-density equivalent: an RBF Parzen-window
//! density estimated from the anchor's own points, thresholded at the quantile that leaves a
//! `nu` fraction of the anchor's own points below it (the same role `nu` plays in a real
//! one-class SVM: an upper bound on the fraction of training points treated as outliers).

use binner_stats::percentile;

fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn rbf_kernel(a: &[f64], b: &[f64], gamma: f64) -> f64 {
    (-gamma * squared_euclidean(a, b)).exp()
}

fn density_scores(reference: &[Vec<f64>], queries: &[Vec<f64>], gamma: f64) -> Vec<f64> {
    queries.iter().map(|q| {
        reference.iter().map(|r| rbf_kernel(q, r, gamma)).sum::<f64>() / reference.len() as f64
    }).collect()
}

/// Returns, per candidate row, whether it is recruited (an inlier under the fitted boundary).
/// Returns `None` if the anchor has too few trusted subcontigs to fit a boundary.
pub fn ocsvm_recruit(anchor_features: &[Vec<f64>], candidate_features: &[Vec<f64>], gamma: f64, nu: f64) -> Option<Vec<bool>> {
    if anchor_features.len() < 2 { return None; }

    let mut anchor_scores = density_scores(anchor_features, anchor_features, gamma);
    anchor_scores.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let threshold = percentile(&anchor_scores, nu * 100.0);

    let candidate_scores = density_scores(anchor_features, candidate_features, gamma);
    Some(candidate_scores.into_iter().map(|s| s >= threshold).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_near_anchor_cluster_recruited_far_one_not() {
        let anchor: Vec<Vec<f64>> = (0..20).map(|i| vec![(i as f64) * 0.01, 0.0]).collect();
        let candidates = vec![vec![0.1, 0.0], vec![1000.0, 1000.0]];
        let result = ocsvm_recruit(&anchor, &candidates, 1e-4, 0.1).unwrap();
        assert!(result[0]);
        assert!(!result[1]);
    }

    #[test]
    fn test_insufficient_anchor_data_returns_none() {
        let anchor = vec![vec![1.0, 1.0]];
        assert!(ocsvm_recruit(&anchor, &anchor, 1e-4, 0.9).is_none());
    }
}
