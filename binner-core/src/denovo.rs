//! Components 4.E and 4.G: hierarchical density-based clustering over an embedding, shared by
//! the de-novo pass (4.E) and the anchor-tuned pass (4.G) — they differ only in
//! `min_cluster_size`/`min_samples`.

use binner_clustering::{cluster_density, DensityClusterResult};
use binner_datastructures::euclidean_distance;

/// Runs density-based clustering over an embedding's rows. The embedding is low-dimensional by
/// construction, so plain Euclidean distance is used here regardless of the metric 4.D used to
/// pick neighbors in the original feature space.
pub fn cluster_embedding(embedding_rows: &[Vec<f64>], dim: usize, min_cluster_size: usize, min_samples: usize) -> DensityClusterResult {
    cluster_density(embedding_rows.to_vec(), dim, euclidean_distance, min_cluster_size, min_samples)
}
