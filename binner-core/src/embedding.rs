//! Component 4.D: projects the concatenated TNF+coverage feature matrix into a low-dimensional
//! manifold that keeps points close in the embedding iff they were close (under the configured
//! metric) in the feature space.
//!
//! Neighbor selection happens once in the native feature space; the low-dimensional layout is
//! then refined by a short attraction/repulsion optimization over the resulting neighbor graph,
//! in the style of force-directed graph layout and neighbor embedding methods. Initialization
//! is attempted PCA-seeded first, falling back to a Laplacian eigenmap and finally to a
//! deterministic neighbor-expansion seed if an earlier strategy degenerates (e.g. a singular
//! covariance matrix): the same random seed always resolves to the same fallback path.

use nalgebra::{DMatrix, SymmetricEigen};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use binner_datastructures::{euclidean_distance, manhattan_distance};
use crate::params::EmbeddingMetric;

pub struct EmbeddingTable {
    pub subcontig_ids: Vec<String>,
    /// one row per subcontig, `embedding_dim` columns each
    pub rows: Vec<Vec<f64>>,
}

fn metric_fn(metric: EmbeddingMetric) -> fn(&Vec<f64>, &Vec<f64>, usize) -> f64 {
    match metric {
        EmbeddingMetric::Manhattan => manhattan_distance,
        EmbeddingMetric::Euclidean => euclidean_distance,
    }
}

/// Brute-force k nearest neighbors of every point under `distance_fn`. Acceptable at the
/// subcontig counts this pipeline operates on; a k-d tree's axis-aligned pruning assumes a
/// Euclidean-like bound and is not valid under the Manhattan metric this stage defaults to.
fn knn_graph(features: &[Vec<f64>], dim: usize, k: usize, distance_fn: fn(&Vec<f64>, &Vec<f64>, usize) -> f64) -> Vec<Vec<usize>> {
    let n = features.len();
    let k = k.min(n.saturating_sub(1));
    (0..n).map(|i| {
        let mut distances: Vec<(usize, f64)> = (0..n).filter(|&j| j != i)
            .map(|j| (j, distance_fn(&features[i], &features[j], dim)))
            .collect();
        distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        distances.into_iter().take(k).map(|(j, _)| j).collect()
    }).collect()
}

fn center_columns(features: &[Vec<f64>], dim: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let n = features.len() as f64;
    let mut means = vec![0.0; dim];
    for row in features { for c in 0..dim { means[c] += row[c]; } }
    for m in means.iter_mut() { *m /= n; }
    let centered = features.iter().map(|row| {
        (0..dim).map(|c| row[c] - means[c]).collect()
    }).collect();
    (centered, means)
}

/// PCA-seeded initialization: project the centered features onto their top `out_dim` principal
/// components via symmetric eigendecomposition of the covariance matrix.
fn init_pca(features: &[Vec<f64>], dim: usize, out_dim: usize) -> Option<Vec<Vec<f64>>> {
    let n = features.len();
    let (centered, _) = center_columns(features, dim);

    let mut cov = DMatrix::<f64>::zeros(dim, dim);
    for row in &centered {
        for i in 0..dim {
            for j in 0..dim {
                cov[(i, j)] += row[i] * row[j];
            }
        }
    }
    cov /= (n.max(2) - 1) as f64;

    let eigen = SymmetricEigen::new(cov);
    if eigen.eigenvalues.iter().any(|v| !v.is_finite()) { return None; }

    let mut order: Vec<usize> = (0..dim).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].partial_cmp(&eigen.eigenvalues[a]).unwrap());
    let top = &order[..out_dim.min(dim)];

    let projected: Vec<Vec<f64>> = centered.iter().map(|row| {
        top.iter().map(|&c| {
            let mut dot = 0.0;
            for i in 0..dim { dot += row[i] * eigen.eigenvectors[(i, c)]; }
            dot
        }).collect()
    }).collect();

    if projected.iter().flatten().any(|v: &f64| !v.is_finite()) { return None; }
    Some(projected)
}

/// Laplacian-eigenmap style initialization over the k-NN graph's weighted adjacency.
fn init_spectral(neighbors: &[Vec<usize>], features: &[Vec<f64>], dim: usize, distance_fn: fn(&Vec<f64>, &Vec<f64>, usize) -> f64, out_dim: usize) -> Option<Vec<Vec<f64>>> {
    let n = features.len();
    let mut weights = DMatrix::<f64>::zeros(n, n);
    for (i, nbrs) in neighbors.iter().enumerate() {
        for &j in nbrs {
            let d = distance_fn(&features[i], &features[j], dim);
            let w = (-d).exp().max(1e-12);
            weights[(i, j)] = weights[(i, j)].max(w);
            weights[(j, i)] = weights[(i, j)];
        }
    }
    let degrees: Vec<f64> = (0..n).map(|i| weights.row(i).sum()).collect();
    let mut laplacian = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            laplacian[(i, j)] = if i == j { degrees[i] - weights[(i, j)] } else { -weights[(i, j)] };
        }
    }

    let eigen = SymmetricEigen::new(laplacian);
    if eigen.eigenvalues.iter().any(|v| !v.is_finite()) { return None; }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[a].partial_cmp(&eigen.eigenvalues[b]).unwrap());
    // skip the trivial all-ones eigenvector at eigenvalue ~0
    let chosen: Vec<usize> = order.into_iter().skip(1).take(out_dim.min(n.saturating_sub(1))).collect();
    if chosen.len() < out_dim { return None; }

    let result: Vec<Vec<f64>> = (0..n).map(|i| chosen.iter().map(|&c| eigen.eigenvectors[(i, c)]).collect()).collect();
    if result.iter().flatten().any(|v: &f64| !v.is_finite()) { return None; }
    Some(result)
}

/// Deterministic fallback: place the first point at the origin, then every remaining point
/// near its nearest already-placed neighbor in the k-NN graph (or at a random position if it
/// has none placed yet), with small seeded jitter.
fn init_neighbor_expansion(neighbors: &[Vec<usize>], out_dim: usize, rng: &mut SmallRng) -> Vec<Vec<f64>> {
    let n = neighbors.len();
    let mut placed = vec![false; n];
    let mut coords = vec![vec![0.0; out_dim]; n];
    if n == 0 { return coords; }
    placed[0] = true;

    let mut frontier: Vec<usize> = vec![0];
    let mut remaining: std::collections::HashSet<usize> = (1..n).collect();
    while !remaining.is_empty() {
        let mut advanced = false;
        let mut next_frontier = Vec::new();
        for &i in &frontier {
            for &j in &neighbors[i] {
                if placed[j] { continue; }
                coords[j] = (0..out_dim).map(|d| coords[i][d] + rng.gen_range(-0.1..0.1)).collect();
                placed[j] = true;
                remaining.remove(&j);
                next_frontier.push(j);
                advanced = true;
            }
        }
        if !advanced {
            // isolated point with no unplaced neighbor reachable from the frontier
            if let Some(&j) = remaining.iter().next() {
                coords[j] = (0..out_dim).map(|_| rng.gen_range(-1.0..1.0)).collect();
                placed[j] = true;
                remaining.remove(&j);
                next_frontier.push(j);
            }
        }
        frontier = next_frontier;
    }
    coords
}

fn has_finite_spread(coords: &[Vec<f64>]) -> bool {
    coords.iter().flatten().all(|v: &f64| v.is_finite())
}

/// Refines `coords` by attracting each point toward its k-NN graph neighbors and repelling it
/// from a handful of randomly sampled non-neighbors, the way force-directed and neighbor
/// embedding layouts converge.
fn refine(coords: &mut Vec<Vec<f64>>, neighbors: &[Vec<usize>], out_dim: usize, iterations: usize, rng: &mut SmallRng) {
    let n = coords.len();
    if n < 2 { return; }
    let learning_rate = 1.0;
    for _ in 0..iterations {
        for i in 0..n {
            for &j in &neighbors[i] {
                let mut delta = vec![0.0; out_dim];
                let mut dist_sq = 0.0;
                for d in 0..out_dim {
                    delta[d] = coords[i][d] - coords[j][d];
                    dist_sq += delta[d] * delta[d];
                }
                let dist = dist_sq.sqrt().max(1e-6);
                let attraction = learning_rate * dist / (1.0 + dist_sq);
                for d in 0..out_dim {
                    let step = attraction * (delta[d] / dist);
                    coords[i][d] -= step;
                    coords[j][d] += step;
                }
            }
            let negative = rng.gen_range(0..n);
            if negative != i {
                let mut delta = vec![0.0; out_dim];
                let mut dist_sq = 0.0;
                for d in 0..out_dim {
                    delta[d] = coords[i][d] - coords[negative][d];
                    dist_sq += delta[d] * delta[d];
                }
                let dist = dist_sq.sqrt().max(1e-6);
                let repulsion = learning_rate / (1.0 + dist_sq);
                for d in 0..out_dim {
                    coords[i][d] += repulsion * (delta[d] / dist);
                }
            }
        }
    }
}

/// Builds the low-dimensional embedding for a row-aligned feature table.
pub fn embed(subcontig_ids: &[String], features: &[Vec<f64>], dim: usize, out_dim: usize,
             metric: EmbeddingMetric, seed: u64) -> EmbeddingTable {

    let n = features.len();
    if n == 0 {
        return EmbeddingTable { subcontig_ids: vec![], rows: vec![] };
    }

    let distance_fn = metric_fn(metric);
    let k = 15;
    let neighbors = knn_graph(features, dim, k, distance_fn);

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut coords = init_pca(features, dim, out_dim)
        .filter(|c| has_finite_spread(c))
        .or_else(|| init_spectral(&neighbors, features, dim, distance_fn, out_dim).filter(|c| has_finite_spread(c)))
        .unwrap_or_else(|| init_neighbor_expansion(&neighbors, out_dim, &mut rng));

    refine(&mut coords, &neighbors, out_dim, 50, &mut rng);

    EmbeddingTable { subcontig_ids: subcontig_ids.to_vec(), rows: coords }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_preserves_two_well_separated_blobs() {
        let mut ids = Vec::new();
        let mut features = Vec::new();
        for i in 0..15 {
            ids.push(format!("a{}", i));
            features.push(vec![0.0 + i as f64 * 0.01, 0.0, 0.0]);
        }
        for i in 0..15 {
            ids.push(format!("b{}", i));
            features.push(vec![50.0 + i as f64 * 0.01, 0.0, 0.0]);
        }
        let table = embed(&ids, &features, 3, 2, EmbeddingMetric::Manhattan, 42);
        assert_eq!(table.rows.len(), 30);
        let centroid_a: f64 = table.rows[0..15].iter().map(|r| r[0]).sum::<f64>() / 15.0;
        let centroid_b: f64 = table.rows[15..30].iter().map(|r| r[0]).sum::<f64>() / 15.0;
        assert!((centroid_a - centroid_b).abs() > 0.5);
    }

    #[test]
    fn test_embedding_is_deterministic_for_fixed_seed() {
        let ids: Vec<String> = (0..20).map(|i| format!("s{}", i)).collect();
        let features: Vec<Vec<f64>> = (0..20).map(|i| vec![(i as f64).sin(), (i as f64).cos()]).collect();
        let a = embed(&ids, &features, 2, 2, EmbeddingMetric::Manhattan, 7);
        let b = embed(&ids, &features, 2, 2, EmbeddingMetric::Manhattan, 7);
        assert_eq!(a.rows, b.rows);
    }

    #[test]
    fn test_empty_input_returns_empty_table() {
        let table = embed(&[], &[], 2, 2, EmbeddingMetric::Manhattan, 1);
        assert!(table.rows.is_empty());
    }
}
