//! Optional preprocessing pass for 4.H: discards candidate subcontigs that land in clusters
//! containing no anchor subcontigs at all, so the one-class recruiters never have to score
//! obviously unrelated candidates.

use std::collections::{HashMap, HashSet};
use binner_clustering::kmeans::KMeans;
use binner_datastructures::euclidean_distance;

/// Returns, per candidate subcontig, whether its contig passes the k-means denoising gate: at
/// least `accept_fraction` of its subcontigs must land in a cluster that also holds at least
/// one anchor subcontig.
pub fn kmeans_denoise_filter(anchor_features: &[Vec<f64>], candidate_features: &[Vec<f64>],
                              candidate_contig_ids: &[String], dim: usize, max_clusters: usize,
                              accept_fraction: f64, seed: u64) -> Vec<bool> {
    let n_anchor = anchor_features.len();
    let n_candidate = candidate_features.len();
    if n_candidate == 0 { return vec![]; }

    let mut joined: Vec<Vec<f64>> = Vec::with_capacity(n_anchor + n_candidate);
    joined.extend_from_slice(anchor_features);
    joined.extend_from_slice(candidate_features);

    let k = max_clusters.min(joined.len()).max(1);
    let mut kmeans = KMeans::new(k, joined, dim, euclidean_distance, seed);
    kmeans.cluster(1e-4);
    let assignments = kmeans.assignments();

    let anchor_containing: HashSet<usize> = assignments[..n_anchor].iter().copied().collect();

    let mut contig_total: HashMap<&str, usize> = HashMap::new();
    let mut contig_in_anchor_cluster: HashMap<&str, usize> = HashMap::new();
    for (i, contig_id) in candidate_contig_ids.iter().enumerate() {
        let cluster = assignments[n_anchor + i];
        *contig_total.entry(contig_id).or_insert(0) += 1;
        if anchor_containing.contains(&cluster) {
            *contig_in_anchor_cluster.entry(contig_id).or_insert(0) += 1;
        }
    }

    candidate_contig_ids.iter().map(|contig_id| {
        let total = contig_total[contig_id.as_str()] as f64;
        let hit = *contig_in_anchor_cluster.get(contig_id.as_str()).unwrap_or(&0) as f64;
        hit / total >= accept_fraction
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contig_entirely_outside_anchor_clusters_is_dropped() {
        let anchor: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64 * 0.01, 0.0]).collect();
        let mut candidates: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64 * 0.01, 0.0]).collect();
        candidates.extend((0..5).map(|i| vec![1000.0 + i as f64, 1000.0]));
        let contig_ids = vec!["near".to_string(); 5].into_iter()
            .chain(vec!["far".to_string(); 5])
            .collect::<Vec<_>>();
        let keep = kmeans_denoise_filter(&anchor, &candidates, &contig_ids, 2, 10, 0.95, 42);
        assert!(keep[0]);
        assert!(!keep[9]);
    }
}
