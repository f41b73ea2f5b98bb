//! One-class recruiters (4.H): given an anchor's trusted subcontigs and a pool of candidate
//! subcontigs sharing its embedding space, each recruiter independently flags candidates that
//! look like they belong to the anchor. Three recruiters vote (Gaussian mixture, kernel-density
//! one-class SVM, isolation forest); [`aggregate_recruiter`] turns subcontig-level flags into
//! per-contig recruitment rows that the ensemble combiner inner-joins.

pub mod gmm;
pub mod isolation_forest;
pub mod kmeans_filter;
pub mod ocsvm;

pub use gmm::gmm_recruit;
pub use isolation_forest::isolation_forest_recruit;
pub use kmeans_filter::kmeans_denoise_filter;
pub use ocsvm::ocsvm_recruit;

use std::collections::HashMap;

/// A single recruiter's verdict on one contig under one anchor: the fraction `p` of the
/// contig's subcontigs the recruiter flagged, the threshold-scaled score `s`, and `w` — `s`
/// scaled by the recruiter's share of the total recruiter weight, ready to sum across recruiters.
#[derive(Debug, Clone, PartialEq)]
pub struct RecruitmentRow {
    pub anchor_id: String,
    pub contig_id: String,
    pub p: f64,
    pub s: f64,
    pub w: f64,
}

/// Sum of `(1 - theta)` across the three recruiters' thresholds — the normalizing weight total
/// referenced by each recruiter's `w_scaled` computation.
pub fn total_weight(thresholds: &crate::params::RecruiterThresholds) -> f64 {
    (1.0 - thresholds.gmm) + (1.0 - thresholds.svm) + (1.0 - thresholds.iso)
}

/// Rolls up one recruiter's per-subcontig flags into per-contig rows, keeping only contigs whose
/// recruited fraction clears `theta` (strictly, unless `strict` is `false`, in which case `>=`
/// is used — this is how `svm_threshold_strict` relaxes the zero-threshold SVM recruiter).
pub fn aggregate_recruiter(anchor_id: &str, recruited: &[bool], subcontig_ids: &[String],
                            subcontig_to_contig: &HashMap<String, String>, theta: f64, weight: f64,
                            total_weight: f64, strict: bool) -> Vec<RecruitmentRow> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    let mut hits: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for (i, id) in subcontig_ids.iter().enumerate() {
        let contig_id = subcontig_to_contig.get(id).map(|s| s.as_str()).unwrap_or(id.as_str());
        if !totals.contains_key(contig_id) {
            order.push(contig_id);
        }
        *totals.entry(contig_id).or_insert(0) += 1;
        if recruited[i] {
            *hits.entry(contig_id).or_insert(0) += 1;
        }
    }

    order.sort_unstable();
    let mut rows = Vec::new();
    for contig_id in order {
        let total = totals[contig_id] as f64;
        let hit = *hits.get(contig_id).unwrap_or(&0) as f64;
        let p = hit / total;
        let passes = if strict { p > theta } else { p >= theta };
        if !passes {
            continue;
        }
        let s = (p - theta) / (1.0 - theta);
        rows.push(RecruitmentRow {
            anchor_id: anchor_id.to_string(),
            contig_id: contig_id.to_string(),
            p,
            s,
            w: s * weight / total_weight,
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RecruiterThresholds;

    #[test]
    fn test_total_weight_matches_fixed_constant() {
        let thresholds = RecruiterThresholds::default();
        assert!((total_weight(&thresholds) - 1.76).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_reproduces_ensemble_scenario_gmm_leg() {
        // Anchor-relative scenario: a contig with 4/5 subcontigs recruited under the GMM
        // recruiter (theta=0.50, weight=0.50) should score s=0.6, w=0.6*0.5/1.76=0.1705...
        let subcontig_ids: Vec<String> = (0..5).map(|i| format!("c1_{i}")).collect();
        let mut map = HashMap::new();
        for id in &subcontig_ids {
            map.insert(id.clone(), "c1".to_string());
        }
        let recruited = vec![true, true, true, true, false];
        let rows = aggregate_recruiter("anchorA", &recruited, &subcontig_ids, &map, 0.50, 0.50, 1.76, true);
        assert_eq!(rows.len(), 1);
        assert!((rows[0].p - 0.8).abs() < 1e-9);
        assert!((rows[0].s - 0.6).abs() < 1e-9);
        assert!((rows[0].w - 0.6 * 0.5 / 1.76).abs() < 1e-9);
    }

    #[test]
    fn test_contig_at_or_below_threshold_is_dropped() {
        let subcontig_ids: Vec<String> = vec!["c2_0".to_string()];
        let mut map = HashMap::new();
        map.insert("c2_0".to_string(), "c2".to_string());
        let recruited = vec![false];
        let rows = aggregate_recruiter("anchorA", &recruited, &subcontig_ids, &map, 0.0, 1.0, 1.76, true);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_non_strict_threshold_admits_equality() {
        let subcontig_ids: Vec<String> = vec!["c3_0".to_string()];
        let mut map = HashMap::new();
        map.insert("c3_0".to_string(), "c3".to_string());
        let recruited = vec![false];
        let strict_rows = aggregate_recruiter("anchorA", &recruited, &subcontig_ids, &map, 0.0, 1.0, 1.76, true);
        let lenient_rows = aggregate_recruiter("anchorA", &recruited, &subcontig_ids, &map, 0.0, 1.0, 1.76, false);
        assert!(strict_rows.is_empty());
        assert_eq!(lenient_rows.len(), 1);
        assert_eq!(lenient_rows[0].p, 0.0);
    }
}
