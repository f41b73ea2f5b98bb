//! Tunable parameters for every stage, with the defaults named in the external interface and
//! a small set of named presets that scale the clustering/recruiter parameters together.

use serde::{Deserialize, Serialize};

use crate::errors::BinnerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbeddingMetric {
    Manhattan,
    Euclidean,
}

/// Per-recruiter threshold and weight, see component 4.H of the external interface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RecruiterThresholds {
    pub gmm: f64,
    pub svm: f64,
    pub iso: f64,
}

impl Default for RecruiterThresholds {
    fn default() -> Self { RecruiterThresholds { gmm: 0.50, svm: 0.00, iso: 0.74 } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    VeryRelaxed,
    Relaxed,
    Strict,
    VeryStrict,
}

impl Preset {
    pub fn parse(name: &str) -> Option<Preset> {
        match name {
            "very_relaxed" => Some(Preset::VeryRelaxed),
            "relaxed" => Some(Preset::Relaxed),
            "strict" => Some(Preset::Strict),
            "very_strict" => Some(Preset::VeryStrict),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    pub window_size: usize,
    pub overlap: usize,

    pub embedding_metric: EmbeddingMetric,
    pub embedding_dim: usize,
    pub random_seed: u64,

    pub denovo_min_cluster_size: usize,
    pub denovo_min_samples: usize,

    pub anchor_min_cluster_size: usize,
    pub anchor_min_samples: usize,

    pub ocsvm_nu: f64,
    pub ocsvm_gamma: f64,
    pub isolation_forest_trees: usize,

    pub recruiter_thresholds: RecruiterThresholds,
    pub ensemble_accept_threshold: f64,

    pub denoise_strong_probability: f64,
    pub denoise_strong_outlier: f64,
    pub denoise_noise_ratio: f64,
    pub denoise_link_minor: f64,

    /// whether the SVM recruiter threshold is applied strictly (`p > 0`) or inclusively
    /// (`p >= 0`); left configurable rather than guessed since a zero threshold otherwise
    /// accepts every inlier.
    pub svm_threshold_strict: bool,

    pub kmeans_denoise_enabled: bool,
    pub kmeans_denoise_max_clusters: usize,
    pub kmeans_denoise_accept_fraction: f64,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            window_size: 10_000,
            overlap: 2_000,
            embedding_metric: EmbeddingMetric::Manhattan,
            embedding_dim: 2,
            random_seed: 42,
            denovo_min_cluster_size: 75,
            denovo_min_samples: 10,
            anchor_min_cluster_size: 125,
            anchor_min_samples: 10,
            ocsvm_nu: 0.9,
            ocsvm_gamma: 1e-4,
            isolation_forest_trees: 1000,
            recruiter_thresholds: RecruiterThresholds::default(),
            ensemble_accept_threshold: 0.10,
            denoise_strong_probability: 0.95,
            denoise_strong_outlier: 0.05,
            denoise_noise_ratio: 0.51,
            denoise_link_minor: 0.49,
            svm_threshold_strict: true,
            kmeans_denoise_enabled: false,
            kmeans_denoise_max_clusters: 10,
            kmeans_denoise_accept_fraction: 0.95,
        }
    }
}

impl Params {
    /// Applies a named preset on top of the defaults, scaling cluster and recruiter
    /// parameters together the way the external interface's `presets` option describes.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        match preset {
            Preset::VeryRelaxed => {
                self.denovo_min_cluster_size = 50;
                self.anchor_min_cluster_size = 75;
                self.recruiter_thresholds = RecruiterThresholds { gmm: 0.35, svm: 0.00, iso: 0.60 };
                self.ensemble_accept_threshold = 0.05;
            }
            Preset::Relaxed => {
                self.denovo_min_cluster_size = 60;
                self.anchor_min_cluster_size = 100;
                self.recruiter_thresholds = RecruiterThresholds { gmm: 0.45, svm: 0.00, iso: 0.68 };
                self.ensemble_accept_threshold = 0.08;
            }
            Preset::Strict => {
                self.denovo_min_cluster_size = 100;
                self.anchor_min_cluster_size = 150;
                self.recruiter_thresholds = RecruiterThresholds { gmm: 0.60, svm: 0.00, iso: 0.80 };
                self.ensemble_accept_threshold = 0.15;
            }
            Preset::VeryStrict => {
                self.denovo_min_cluster_size = 150;
                self.anchor_min_cluster_size = 200;
                self.recruiter_thresholds = RecruiterThresholds { gmm: 0.70, svm: 0.00, iso: 0.85 };
                self.ensemble_accept_threshold = 0.20;
            }
        }
        self
    }

    /// Rejects out-of-range parameters before any stage runs.
    pub fn validate(&self) -> Result<(), BinnerError> {
        if self.overlap >= self.window_size {
            return Err(BinnerError::InvalidParameter {
                name: "overlap".into(),
                value: format!("overlap ({}) must be smaller than window_size ({})", self.overlap, self.window_size),
            });
        }
        if self.embedding_dim == 0 {
            return Err(BinnerError::InvalidParameter { name: "embedding_dim".into(), value: "0".into() });
        }
        if !(0.0..=1.0).contains(&self.ensemble_accept_threshold) {
            return Err(BinnerError::InvalidParameter {
                name: "ensemble_accept_threshold".into(),
                value: self.ensemble_accept_threshold.to_string(),
            });
        }
        if !(0.0..1.0).contains(&self.ocsvm_nu) {
            return Err(BinnerError::InvalidParameter { name: "ocsvm_nu".into(), value: self.ocsvm_nu.to_string() });
        }
        Ok(())
    }
}
