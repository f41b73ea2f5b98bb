//! Statistical building blocks shared by the binner's clustering and recruitment stages.
//!
//! This crate provides an on-line multivariate statistics accumulator,
//! [`OnlineMultivariateStatistics`], that computes running mean/variance/covariance without
//! holding the whole sample in memory — used by the TNF standardization step and by the
//! Gaussian mixture recruiter.
//!
//! It also defines the [`Distribution`] trait for probability distributions and the
//! [`Estimable`] trait for distributions that can fit their own parameters from a (possibly
//! weighted) sample; these are used by the expectation-maximization routine in
//! `binner-clustering` to fit the Bayesian Gaussian mixture recruiter.
//!
//! Finally, [`iqr_bounds()`] computes Tukey interquartile-range bounds, used by every one-class
//! recruiter to flag anomalous scores.
mod distributions;
mod descriptive;
mod iqr;

pub use descriptive::OnlineMultivariateStatistics;
pub use distributions::{NormalDistribution, MultiNormalDistribution, Estimable, Distribution};
pub use iqr::{iqr_bounds, percentile};
