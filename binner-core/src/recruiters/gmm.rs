//! Recruiter 4.H.1: a Gaussian mixture fit to an anchor's trusted subcontigs, with anomaly
//! bounds taken from the Tukey IQR of the anchor's own scores (k = 3.0).

use nalgebra::{DMatrix, DVector};
use binner_stats::{Distribution, Estimable, MultiNormalDistribution, OnlineMultivariateStatistics, iqr_bounds};
use binner_clustering::em::expectation_maximization;
use binner_clustering::kmeans::KMeans;
use binner_datastructures::euclidean_distance;

const GMM_IQR_K: f64 = 3.0;
const RIDGE: f64 = 1e-6;

fn components_for(n_anchor: usize) -> usize {
    (n_anchor / 5).clamp(1, 3)
}

fn fit_mixture(anchor_features: &[Vec<f64>], dim: usize, seed: u64) -> Option<(Vec<MultiNormalDistribution>, Vec<f64>)> {
    let n = anchor_features.len();
    if n < 2 { return None; }
    let k = components_for(n).min(n);

    let mut kmeans = KMeans::new(k, anchor_features.to_vec(), dim, euclidean_distance, seed);
    kmeans.cluster(1e-4);
    let assignments = kmeans.assignments().clone();

    let mut stats: Vec<OnlineMultivariateStatistics> = (0..k).map(|_| OnlineMultivariateStatistics::new(dim)).collect();
    for (i, &c) in assignments.iter().enumerate() { stats[c].accumulate(&anchor_features[i]); }

    let mut distributions = Vec::with_capacity(k);
    let mut weights = vec![0.0; k];
    for (c, s) in stats.iter().enumerate() {
        let mut dist = MultiNormalDistribution::new(dim);
        let mean = if s.count() > 0 { DVector::from_vec(s.avg().clone()) } else { DVector::<f64>::zeros(dim) };
        let mut sigma = DMatrix::<f64>::identity(dim, dim);
        if s.count() >= 2 {
            let cov = s.cov();
            for i in 0..dim {
                for j in 0..dim { sigma[(i, j)] = cov[i][j]; }
                sigma[(i, i)] = sigma[(i, i)].max(RIDGE) + RIDGE;
            }
        }
        dist.set_parameters(&mean, &sigma);
        distributions.push(dist);
        weights[c] = s.count().max(1) as f64;
    }
    let total: f64 = weights.iter().sum();
    for w in weights.iter_mut() { *w /= total; }

    expectation_maximization(&mut distributions, &anchor_features.to_vec(), &mut weights, 1e-4);
    Some((distributions, weights))
}

fn mixture_score(distributions: &[MultiNormalDistribution], weights: &[f64], x: &Vec<f64>) -> f64 {
    let p: f64 = distributions.iter().zip(weights).map(|(d, w)| w * d.pdf(x)).sum();
    p.max(1e-300).ln()
}

/// Returns, per candidate row, whether it is recruited (inside the anchor-score IQR bounds).
/// Returns `None` if the anchor has too few trusted subcontigs to fit a mixture.
pub fn gmm_recruit(anchor_features: &[Vec<f64>], candidate_features: &[Vec<f64>], dim: usize, seed: u64) -> Option<Vec<bool>> {
    let (distributions, weights) = fit_mixture(anchor_features, dim, seed)?;

    let anchor_scores: Vec<f64> = anchor_features.iter().map(|x| mixture_score(&distributions, &weights, x)).collect();
    let (lower, upper) = iqr_bounds(&anchor_scores, GMM_IQR_K);

    Some(candidate_features.iter()
        .map(|x| mixture_score(&distributions, &weights, x))
        .map(|score| score >= lower && score <= upper)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_near_anchor_mean_are_recruited() {
        let anchor: Vec<Vec<f64>> = (0..20).map(|i| vec![(i as f64) * 0.01, 0.0]).collect();
        let candidates = vec![vec![0.1, 0.0], vec![500.0, 500.0]];
        let result = gmm_recruit(&anchor, &candidates, 2, 42).unwrap();
        assert!(result[0]);
        assert!(!result[1]);
    }

    #[test]
    fn test_insufficient_anchor_data_returns_none() {
        let anchor = vec![vec![1.0, 1.0]];
        let candidates = vec![vec![1.0, 1.0]];
        assert!(gmm_recruit(&anchor, &candidates, 2, 42).is_none());
    }
}
