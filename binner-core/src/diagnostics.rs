//! Per-anchor diagnostics (§7): every isolated failure (insufficient training data, a
//! recruiter's model failing to fit) is recorded here instead of aborting the pipeline. A run
//! always produces a diagnostics table enumerating every anchor's per-stage status so downstream
//! consumers can filter recruited contigs by how much of the pipeline actually ran for them.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorStatus {
    Passed,
    RecruiterSkipped,
    AnchorSkipped,
}

impl AnchorStatus {
    fn as_str(&self) -> &'static str {
        match self {
            AnchorStatus::Passed => "passed",
            AnchorStatus::RecruiterSkipped => "recruiter_skipped",
            AnchorStatus::AnchorSkipped => "anchor_skipped",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecruiterKind {
    Gmm,
    Svm,
    Iso,
}

impl RecruiterKind {
    fn as_str(&self) -> &'static str {
        match self {
            RecruiterKind::Gmm => "gmm",
            RecruiterKind::Svm => "svm",
            RecruiterKind::Iso => "iso",
        }
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    anchor_status: HashMap<String, AnchorStatus>,
    skipped_recruiters: HashMap<String, Vec<RecruiterKind>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the whole anchor as skipped (e.g. it has fewer than 2 trusted subcontigs).
    pub fn record_anchor_skipped(&mut self, anchor_id: &str) {
        self.anchor_status.insert(anchor_id.to_string(), AnchorStatus::AnchorSkipped);
    }

    /// Marks one recruiter as having failed to fit for this anchor; the anchor itself may still
    /// pass overall if the remaining recruiters succeed.
    pub fn record_recruiter_skipped(&mut self, anchor_id: &str, recruiter: RecruiterKind) {
        self.skipped_recruiters.entry(anchor_id.to_string()).or_default().push(recruiter);
        self.anchor_status.entry(anchor_id.to_string())
            .and_modify(|s| if *s == AnchorStatus::Passed { *s = AnchorStatus::RecruiterSkipped })
            .or_insert(AnchorStatus::RecruiterSkipped);
    }

    pub fn record_anchor_passed(&mut self, anchor_id: &str) {
        self.anchor_status.entry(anchor_id.to_string()).or_insert(AnchorStatus::Passed);
    }

    pub fn status_of(&self, anchor_id: &str) -> AnchorStatus {
        self.anchor_status.get(anchor_id).copied().unwrap_or(AnchorStatus::Passed)
    }

    /// Renders the diagnostics as sorted `(anchor_id, status, skipped_recruiters)` rows, ready
    /// for a tab-separated write.
    pub fn rows(&self) -> Vec<(String, &'static str, String)> {
        let mut anchor_ids: Vec<&String> = self.anchor_status.keys().collect();
        anchor_ids.sort();
        anchor_ids.into_iter().map(|id| {
            let status = self.anchor_status[id].as_str();
            let skipped = self.skipped_recruiters.get(id)
                .map(|v| v.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(","))
                .unwrap_or_default();
            (id.clone(), status, skipped)
        }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_defaults_to_passed_when_untouched() {
        let diag = Diagnostics::new();
        assert_eq!(diag.status_of("unknown"), AnchorStatus::Passed);
    }

    #[test]
    fn test_recruiter_skip_does_not_override_anchor_skip() {
        let mut diag = Diagnostics::new();
        diag.record_anchor_skipped("A");
        diag.record_recruiter_skipped("A", RecruiterKind::Svm);
        assert_eq!(diag.status_of("A"), AnchorStatus::AnchorSkipped);
    }

    #[test]
    fn test_rows_are_sorted_by_anchor_id() {
        let mut diag = Diagnostics::new();
        diag.record_anchor_passed("B");
        diag.record_anchor_passed("A");
        let rows = diag.rows();
        assert_eq!(rows[0].0, "A");
        assert_eq!(rows[1].0, "B");
    }
}
