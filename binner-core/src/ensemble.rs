//! Ensemble combiner (4.I): inner-joins the three recruiters' per-contig tables on
//! `(anchor_id, contig_id)` and sums their weighted scores. A contig only reaches the ensemble
//! if all three recruiters produced a row for it — any recruiter dropping a contig (its
//! recruited fraction never cleared that recruiter's own threshold) removes it from
//! consideration entirely, by construction of the inner join.

use std::collections::HashMap;

use crate::recruiters::RecruitmentRow;

#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleRow {
    pub anchor_id: String,
    pub contig_id: String,
    pub ensemble_score: f64,
}

/// Inner-joins the GMM, SVM, and isolation-forest recruitment tables and accepts every contig
/// whose summed weighted score clears `accept_threshold`.
pub fn combine(gmm_rows: &[RecruitmentRow], svm_rows: &[RecruitmentRow], iso_rows: &[RecruitmentRow],
               accept_threshold: f64) -> Vec<EnsembleRow> {
    let svm_by_key: HashMap<(&str, &str), &RecruitmentRow> = svm_rows.iter()
        .map(|r| ((r.anchor_id.as_str(), r.contig_id.as_str()), r))
        .collect();
    let iso_by_key: HashMap<(&str, &str), &RecruitmentRow> = iso_rows.iter()
        .map(|r| ((r.anchor_id.as_str(), r.contig_id.as_str()), r))
        .collect();

    let mut out = Vec::new();
    for g in gmm_rows {
        let key = (g.anchor_id.as_str(), g.contig_id.as_str());
        let (Some(svm), Some(iso)) = (svm_by_key.get(&key), iso_by_key.get(&key)) else {
            continue;
        };
        let ensemble_score = g.w + svm.w + iso.w;
        if ensemble_score >= accept_threshold {
            out.push(EnsembleRow {
                anchor_id: g.anchor_id.clone(),
                contig_id: g.contig_id.clone(),
                ensemble_score,
            });
        }
    }
    out.sort_by(|a, b| a.anchor_id.cmp(&b.anchor_id).then(a.contig_id.cmp(&b.contig_id)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(anchor: &str, contig: &str, w: f64) -> RecruitmentRow {
        RecruitmentRow { anchor_id: anchor.to_string(), contig_id: contig.to_string(), p: 0.0, s: 0.0, w }
    }

    #[test]
    fn test_scenario_recruited_contig_matches_expected_ensemble_score() {
        // A/"x": gmm p=0.80 (theta .50,w .50) -> w=0.1705, svm p=0.60 (theta 0,w 1.0) -> w=0.3409,
        // iso p=0.90 (theta .74,w .26) -> w=0.0909. Sum ~= 0.602 >= 0.10 threshold.
        let gmm = vec![row("A", "x", 0.6 * 0.5 / 1.76)];
        let svm = vec![row("A", "x", 0.6 * 1.0 / 1.76)];
        let iso = vec![row("A", "x", (0.16 / 0.26) * 0.26 / 1.76)];
        let out = combine(&gmm, &svm, &iso, 0.10);
        assert_eq!(out.len(), 1);
        assert!((out[0].ensemble_score - 0.602).abs() < 1e-3);
    }

    #[test]
    fn test_contig_missing_from_one_recruiter_is_dropped_by_inner_join() {
        let gmm = vec![row("A", "y", 0.3)];
        let svm: Vec<RecruitmentRow> = vec![]; // svm never recruited contig y at all
        let iso = vec![row("A", "y", 0.2)];
        let out = combine(&gmm, &svm, &iso, 0.0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_ensemble_score_monotonic_in_each_recruiters_weight() {
        let gmm_low = vec![row("A", "z", 0.1)];
        let gmm_high = vec![row("A", "z", 0.2)];
        let svm = vec![row("A", "z", 0.1)];
        let iso = vec![row("A", "z", 0.1)];
        let low = combine(&gmm_low, &svm, &iso, 0.0);
        let high = combine(&gmm_high, &svm, &iso, 0.0);
        assert!(high[0].ensemble_score > low[0].ensemble_score);
    }
}
