//! Component 4.F: collapses per-subcontig cluster labels to one label per contig, then unifies
//! labels that keep co-occurring on the same contigs.

use std::collections::{BTreeMap, HashMap};
use binner_clustering::UnionFind;
use crate::params::Params;

#[derive(Debug, Clone)]
pub struct SubcontigClusterRow {
    pub subcontig_id: String,
    pub contig_id: String,
    pub label: i64,
    pub probability: f64,
    pub outlier_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContigDecision {
    pub contig_id: String,
    pub best_label: i64,
    pub link_label: Option<i64>,
}

/// Applies the per-contig noise rule, in lexicographic contig_id order so the result is
/// reproducible regardless of how the clustering stage parallelized its work.
fn decide_per_contig(rows: &[SubcontigClusterRow], params: &Params) -> Vec<ContigDecision> {
    let mut by_contig: BTreeMap<&str, Vec<&SubcontigClusterRow>> = BTreeMap::new();
    for row in rows { by_contig.entry(&row.contig_id).or_default().push(row); }

    by_contig.into_iter().map(|(contig_id, subcontigs)| {
        let n = subcontigs.iter().filter(|r| r.label == -1).count();
        let strong: Vec<&&SubcontigClusterRow> = subcontigs.iter()
            .filter(|r| r.label != -1
                && r.probability >= params.denoise_strong_probability
                && r.outlier_score <= params.denoise_strong_outlier)
            .collect();
        let s = strong.len();

        if s == 0 || n as f64 / (n + s) as f64 >= params.denoise_noise_ratio {
            return ContigDecision { contig_id: contig_id.to_string(), best_label: -1, link_label: None };
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for row in &strong { *counts.entry(row.label).or_insert(0) += 1; }
        let mut ranked: Vec<(i64, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let (p1, _) = ranked[0];
        let link_label = if ranked.len() > 1 {
            let (p2, c2) = ranked[1];
            let f2 = c2 as f64 / s as f64;
            if f2 >= params.denoise_link_minor { Some(p2) } else { None }
        } else { None };

        ContigDecision { contig_id: contig_id.to_string(), best_label: p1, link_label }
    }).collect()
}

/// Builds a union-find over every `(best_label, link_label)` pair and renames every non-noise
/// `best_label` to the minimum label in its connected component. Idempotent: a second pass over
/// already-unified decisions maps every label to itself, since each is already its component's
/// minimum and no further edges exist to merge components.
pub fn unify_labels(decisions: &mut Vec<ContigDecision>) {
    let max_label = decisions.iter()
        .flat_map(|d| std::iter::once(d.best_label).chain(d.link_label))
        .filter(|&l| l >= 0)
        .max();
    let Some(max_label) = max_label else { return };

    let mut uf = UnionFind::new(max_label as usize + 1);
    for decision in decisions.iter() {
        if decision.best_label >= 0 {
            if let Some(link) = decision.link_label {
                uf.union(decision.best_label as usize, link as usize);
            }
        }
    }
    let minimums = uf.component_minimums();
    for decision in decisions.iter_mut() {
        if decision.best_label >= 0 {
            decision.best_label = minimums[decision.best_label as usize] as i64;
        }
    }
}

/// Runs the full denoiser: per-contig label collapse followed by label unification.
pub fn denoise(rows: &[SubcontigClusterRow], params: &Params) -> Vec<ContigDecision> {
    let mut decisions = decide_per_contig(rows, params);
    unify_labels(&mut decisions);
    decisions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(subcontig_id: &str, contig_id: &str, label: i64, probability: f64, outlier_score: f64) -> SubcontigClusterRow {
        SubcontigClusterRow { subcontig_id: subcontig_id.into(), contig_id: contig_id.into(), label, probability, outlier_score }
    }

    #[test]
    fn test_denoiser_linking_scenario() {
        let rows = vec![
            row("c_0", "c", 0, 0.99, 0.01),
            row("c_1", "c", 0, 0.99, 0.01),
            row("c_2", "c", 1, 0.99, 0.01),
            row("c_3", "c", 1, 0.99, 0.01),
        ];
        let params = Params::default();
        let decisions = decide_per_contig(&rows, &params);
        assert_eq!(decisions[0].best_label, 0);
        assert_eq!(decisions[0].link_label, Some(1));
    }

    #[test]
    fn test_noise_rule_scenario() {
        let rows = vec![
            row("c_0", "c", -1, 0.5, 0.5),
            row("c_1", "c", -1, 0.5, 0.5),
            row("c_2", "c", 2, 0.99, 0.01),
        ];
        let params = Params::default();
        let decisions = decide_per_contig(&rows, &params);
        assert_eq!(decisions[0].best_label, -1);
        assert_eq!(decisions[0].link_label, None);
    }

    #[test]
    fn test_unification_collapses_linked_clusters_to_smaller_id() {
        let mut decisions = vec![
            ContigDecision { contig_id: "c1".into(), best_label: 0, link_label: Some(1) },
            ContigDecision { contig_id: "c2".into(), best_label: 1, link_label: None },
        ];
        unify_labels(&mut decisions);
        assert_eq!(decisions[0].best_label, 0);
        assert_eq!(decisions[1].best_label, 0);
    }

    #[test]
    fn test_unification_is_idempotent() {
        let mut decisions = vec![
            ContigDecision { contig_id: "c1".into(), best_label: 0, link_label: Some(1) },
            ContigDecision { contig_id: "c2".into(), best_label: 1, link_label: None },
            ContigDecision { contig_id: "c3".into(), best_label: -1, link_label: None },
        ];
        unify_labels(&mut decisions);
        let after_first = decisions.clone();
        unify_labels(&mut decisions);
        assert_eq!(decisions, after_first);
    }

    #[test]
    fn test_noise_contigs_stay_noise_after_unification() {
        let mut decisions = vec![ContigDecision { contig_id: "c1".into(), best_label: -1, link_label: None }];
        unify_labels(&mut decisions);
        assert_eq!(decisions[0].best_label, -1);
    }
}
