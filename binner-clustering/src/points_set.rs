use std::fmt;
use std::ops::Index;

/// A set of points subjected to clustering.
///
/// The points themselves must provide a distance metrics that is used during the clustering
/// calculations.
pub trait DistanceByIndex {

    /// Returns the distance between two given points.
    ///
    /// # Arguments
    /// * `i` - index of the first point
    /// * `j` - index of the second point
    fn distance(&self, i: usize, j: usize) -> f64;

    /// Returns the total number of data points in this set
    fn count_points(&self) -> usize;
}

/// A single neighbor found within a given radius of a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// index of the neighboring point
    pub idx: usize,
    /// distance from the query point
    pub d: f64,
}

impl fmt::Display for Neighbor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{:.6}\n", self.idx, self.d)
    }
}

/// Provides the neighbors of a point within a given radius, sorted by increasing distance.
pub trait NeighborsOf {
    fn neighbors_of(&self, i: usize, eps: f64) -> Vec<Neighbor>;
}

/// A container for N-dimensional points of a generic indexable type `T`, paired with a distance
/// function that computes the distance between any two of them.
///
/// `T` is typically `Vec<f64>` or `[f64; D]`, i.e. anything that can be indexed to `f64`
/// coordinates.
pub struct CartesianPoints<T, D> where T: Index<usize, Output = f64>, D: Fn(&T, &T, usize) -> f64 {
    points: Vec<T>,
    dimensionality: usize,
    distance_fn: D,
}

impl<T, D> CartesianPoints<T, D> where T: Index<usize, Output = f64>, D: Fn(&T, &T, usize) -> f64 {

    /// Creates a new [`CartesianPoints`] wrapping a vector of points and a distance function.
    pub fn new(points: Vec<T>, dimensionality: usize, distance_fn: D) -> Self {
        CartesianPoints { points, dimensionality, distance_fn }
    }

    /// Borrows the underlying point at a given index
    pub fn point(&self, i: usize) -> &T { &self.points[i] }
}

impl<T, D> DistanceByIndex for CartesianPoints<T, D> where T: Index<usize, Output = f64>, D: Fn(&T, &T, usize) -> f64 {

    fn distance(&self, i: usize, j: usize) -> f64 {
        (self.distance_fn)(&self.points[i], &self.points[j], self.dimensionality)
    }

    fn count_points(&self) -> usize { self.points.len() }
}

impl<T, D> NeighborsOf for CartesianPoints<T, D> where T: Index<usize, Output = f64>, D: Fn(&T, &T, usize) -> f64 {

    /// Brute-force radius search: adequate for the per-batch point counts the recruiters and the
    /// de-novo clusterer operate on; swap for a k-d tree index if that ever becomes the bottleneck.
    fn neighbors_of(&self, i: usize, eps: f64) -> Vec<Neighbor> {
        let mut out: Vec<Neighbor> = (0..self.points.len())
            .filter(|&j| j != i)
            .map(|j| Neighbor { idx: j, d: self.distance(i, j) })
            .filter(|n| n.d <= eps)
            .collect();
        out.sort_by(|a, b| a.d.partial_cmp(&b.d).unwrap());
        out
    }
}

/// A set of points subjected to clustering, exposing the pairwise distance directly.
///
/// Kept for callers that already have a full Euclidean point matrix and do not need the
/// generic [`CartesianPoints`] wrapper.
pub trait PointsWithDistance {

    /// Returns the distance between two given points.
    fn distance(&self, i: usize, j: usize) -> f64;

    /// Returns the total number of data points in this set
    fn count_points(&self) -> usize;
}

/// A container for N-dimensional points of `Vec<f64>` type and Euclidean distance
pub struct EuclideanPoints {
    datapoints: Vec<Vec<f64>>,
}

impl EuclideanPoints {
    /// Creates a new [`EuclideanPoints`] object from a given vector of points.
    /// The input data structure is consumed by this process (i.e. moved)
    ///
    /// # Examples
    /// ```rust
    /// use binner_clustering::{EuclideanPoints, PointsWithDistance};
    /// let points: Vec<Vec<f64>> = vec![vec![0.0, 0.0], vec![0.5, 1.0], vec![1.5, 0.8]];
    /// let d = EuclideanPoints::new(points);
    /// assert!((1.118-d.distance(0, 1)).abs() < 0.001);
    /// ```
    pub fn new(data: Vec<Vec<f64>>) -> EuclideanPoints { EuclideanPoints { datapoints: data } }
}

impl PointsWithDistance for EuclideanPoints {

    fn distance(&self, i: usize, j: usize) -> f64 {
        let pi: &Vec<f64> = &self.datapoints[i];
        let pj: &Vec<f64> = &self.datapoints[j];
        let mut d: f64 = 0.0;
        for k in 0..pi.len() {
            let t = pi[k] - pj[k];
            d += t * t;
        }
        d.sqrt()
    }

    fn count_points(&self) -> usize { self.datapoints.len() }
}
