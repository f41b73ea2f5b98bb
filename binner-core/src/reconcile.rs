//! Intersection reconciler (4.J): for each anchor, combines the raw anchor table with the
//! anchored-cluster (4.G) and ensemble (4.I) outputs into a final label set.
//!
//! `anchors(a) ∪ (anchored_cluster(a) ∩ anchors(a)) ∪ (ensemble(a) ∩ anchors(a)) ∪
//! (anchored_cluster(a) ∩ ensemble(a))` — equivalently, the union of the pairwise intersections
//! among `{anchors, anchored_cluster, ensemble}`, plus the anchors themselves.

use std::collections::{BTreeSet, HashMap};

use crate::ensemble::EnsembleRow;

#[derive(Debug, Clone, PartialEq)]
pub struct FinalLabel {
    pub best_label: String,
    pub contig_id: String,
}

/// Runs the reconciliation for every anchor present in `anchors`. `anchored_clusters` and
/// `ensemble_rows` may be missing entries for an anchor (e.g. because every recruiter failed for
/// it); a missing set is treated as empty, per the isolated-failure semantics of 4.H/4.I.
pub fn reconcile(anchors: &HashMap<String, BTreeSet<String>>,
                  anchored_clusters: &HashMap<String, BTreeSet<String>>,
                  ensemble_rows: &[EnsembleRow]) -> Vec<FinalLabel> {
    let mut ensemble_by_anchor: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for row in ensemble_rows {
        ensemble_by_anchor.entry(row.anchor_id.as_str())
            .or_default()
            .insert(row.contig_id.as_str());
    }

    let empty = BTreeSet::new();
    let mut out = Vec::new();
    let mut anchor_ids: Vec<&String> = anchors.keys().collect();
    anchor_ids.sort();

    for anchor_id in anchor_ids {
        let anchor_set = &anchors[anchor_id];
        let cluster_set = anchored_clusters.get(anchor_id).unwrap_or(&empty);
        let ensemble_set = ensemble_by_anchor.get(anchor_id.as_str());

        let mut final_set: BTreeSet<&str> = anchor_set.iter().map(|s| s.as_str()).collect();
        final_set.extend(cluster_set.intersection(anchor_set).map(|s| s.as_str()));
        if let Some(ensemble_set) = ensemble_set {
            final_set.extend(anchor_set.iter().map(|s| s.as_str()).filter(|c| ensemble_set.contains(c)));
            final_set.extend(cluster_set.iter().map(|s| s.as_str()).filter(|c| ensemble_set.contains(c)));
        }

        for contig_id in final_set {
            out.push(FinalLabel { best_label: anchor_id.clone(), contig_id: contig_id.to_string() });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reconciliation_is_superset_of_the_anchor_set() {
        let mut anchors = HashMap::new();
        anchors.insert("A".to_string(), set(&["c1", "c2"]));
        let mut clusters = HashMap::new();
        clusters.insert("A".to_string(), set(&["c1", "c2", "c3"]));
        let ensemble = vec![];

        let out = reconcile(&anchors, &clusters, &ensemble);
        let contigs: BTreeSet<&str> = out.iter().map(|f| f.contig_id.as_str()).collect();
        assert!(contigs.contains("c1"));
        assert!(contigs.contains("c2"));
    }

    #[test]
    fn test_anchored_cluster_ensemble_intersection_pulls_in_a_non_anchor_contig() {
        let mut anchors = HashMap::new();
        anchors.insert("A".to_string(), set(&["c1"]));
        let mut clusters = HashMap::new();
        clusters.insert("A".to_string(), set(&["c1", "c4"]));
        let ensemble = vec![EnsembleRow { anchor_id: "A".to_string(), contig_id: "c4".to_string(), ensemble_score: 0.5 }];

        let out = reconcile(&anchors, &clusters, &ensemble);
        let contigs: BTreeSet<&str> = out.iter().map(|f| f.contig_id.as_str()).collect();
        assert!(contigs.contains("c4"));
    }

    #[test]
    fn test_missing_anchored_cluster_and_ensemble_still_emits_anchors() {
        let mut anchors = HashMap::new();
        anchors.insert("B".to_string(), set(&["c9"]));
        let clusters = HashMap::new();
        let ensemble = vec![];

        let out = reconcile(&anchors, &clusters, &ensemble);
        assert_eq!(out, vec![FinalLabel { best_label: "B".to_string(), contig_id: "c9".to_string() }]);
    }
}
