//! Component 4.G: groups anchor-tuned clusters by the anchors whose trusted contigs they
//! contain, assigning each cluster to at most one anchor.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A trusted-contig binding: `(anchor_id, contig_id)`, kept only at the maximum
/// `jacc_sim_max` score per pair upstream.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub anchor_id: String,
    pub contig_id: String,
}

/// Assigns each non-noise label from the denoised anchor-tuned clustering to the anchor with
/// the most intersecting contigs, ties broken by ascending anchor id, then builds each
/// anchor's anchored-cluster membership set.
///
/// `contig_labels` maps contig_id to its denoised `best_label` (−1 = noise).
/// `noise_contigs` is the set of contig ids with `best_label == -1`, needed because those
/// contigs still join an anchor's set when the anchor itself claims them directly.
pub fn anchored_clusters(anchors: &[Anchor], contig_labels: &HashMap<String, i64>) -> HashMap<String, BTreeSet<String>> {
    let mut anchor_own: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for a in anchors {
        anchor_own.entry(&a.anchor_id).or_default().insert(&a.contig_id);
    }

    // --- count, per non-noise label, how many contigs of each anchor intersect it
    let mut label_anchor_counts: HashMap<i64, BTreeMap<&str, usize>> = HashMap::new();
    for a in anchors {
        if let Some(&label) = contig_labels.get(&a.contig_id) {
            if label >= 0 {
                *label_anchor_counts.entry(label).or_default().entry(a.anchor_id.as_str()).or_insert(0) += 1;
            }
        }
    }

    // --- assign each label to the anchor with the highest count, ties broken by ascending anchor id
    let mut label_owner: HashMap<i64, &str> = HashMap::new();
    for (label, counts) in &label_anchor_counts {
        let owner = counts.iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(anchor_id, _)| *anchor_id);
        if let Some(owner) = owner { label_owner.insert(*label, owner); }
    }

    // --- group contigs by the label they belong to, for membership lookup
    let mut contigs_by_label: HashMap<i64, Vec<&str>> = HashMap::new();
    for (contig_id, &label) in contig_labels.iter() {
        contigs_by_label.entry(label).or_default().push(contig_id.as_str());
    }

    let mut result: HashMap<String, BTreeSet<String>> = HashMap::new();
    for a in anchors {
        result.entry(a.anchor_id.clone()).or_default();
    }
    for (anchor_id, own_contigs) in &anchor_own {
        let set = result.entry(anchor_id.to_string()).or_default();
        for c in own_contigs { set.insert(c.to_string()); }
    }
    for (label, owner) in &label_owner {
        if let Some(members) = contigs_by_label.get(label) {
            let set = result.entry(owner.to_string()).or_default();
            for c in members { set.insert(c.to_string()); }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_owned_by_anchor_with_most_intersections() {
        let anchors = vec![
            Anchor { anchor_id: "A1".into(), contig_id: "c1".into() },
            Anchor { anchor_id: "A1".into(), contig_id: "c2".into() },
            Anchor { anchor_id: "A2".into(), contig_id: "c3".into() },
        ];
        let mut labels = HashMap::new();
        labels.insert("c1".to_string(), 5);
        labels.insert("c2".to_string(), 5);
        labels.insert("c3".to_string(), 5);
        labels.insert("c4".to_string(), 5);

        let result = anchored_clusters(&anchors, &labels);
        assert!(result["A1"].contains("c4"));
        assert!(!result["A2"].contains("c4"));
    }

    #[test]
    fn test_ties_break_by_ascending_anchor_id() {
        let anchors = vec![
            Anchor { anchor_id: "Z".into(), contig_id: "c1".into() },
            Anchor { anchor_id: "A".into(), contig_id: "c2".into() },
        ];
        let mut labels = HashMap::new();
        labels.insert("c1".to_string(), 9);
        labels.insert("c2".to_string(), 9);
        labels.insert("c3".to_string(), 9);

        let result = anchored_clusters(&anchors, &labels);
        assert!(result["A"].contains("c3"));
        assert!(!result["Z"].contains("c3"));
    }

    #[test]
    fn test_anchors_own_contigs_regardless_of_label() {
        let anchors = vec![Anchor { anchor_id: "A1".into(), contig_id: "c1".into() }];
        let labels = HashMap::new();
        let result = anchored_clusters(&anchors, &labels);
        assert!(result["A1"].contains("c1"));
    }
}
