//! Clustering algorithms used by the binner: OPTICS-based density clustering, k-means
//! (used for the recruiters' pre-filtering pass), expectation-maximization (used to fit the
//! Bayesian Gaussian mixture recruiter), and a union-find structure for label unification.

// functions and structs used by more than one clustering approach
mod points_set;

// re-export symbols to the top-most level of the module's name space
pub use points_set::{DistanceByIndex, CartesianPoints, Neighbor, NeighborsOf, PointsWithDistance, EuclideanPoints};

// each clustering method is placed in its own module
pub mod optics;
pub mod em;
pub mod kmeans;
pub mod union_find;
pub mod density;

pub use optics::{Optics, OpticsPoints};
pub use density::{cluster_density, DensityClusterResult};
pub use union_find::UnionFind;

mod errors;
pub use errors::ClusteringError;
