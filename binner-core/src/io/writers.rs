//! Writes the five tab-separated output tables described in §6.

use std::collections::HashMap;
use std::io::Write;

use binner_io::out_writer;

use crate::denoise::{ContigDecision, SubcontigClusterRow};
use crate::reconcile::FinalLabel;

fn best_label_by_contig(decisions: &[ContigDecision]) -> HashMap<&str, i64> {
    decisions.iter().map(|d| (d.contig_id.as_str(), d.best_label)).collect()
}

/// Writes `<mg>.denovo_clusters.tsv` and `<mg>.denovo_noise.tsv`: per-subcontig cluster rows
/// joined with their contig's collapsed `best_label`, split by whether that label is noise.
pub fn write_denovo_tables(clusters_path: &str, noise_path: &str, rows: &[SubcontigClusterRow],
                           decisions: &[ContigDecision]) -> std::io::Result<()> {
    let best_label = best_label_by_contig(decisions);
    let mut clusters_out = out_writer(clusters_path, false);
    let mut noise_out = out_writer(noise_path, false);

    writeln!(clusters_out, "subcontig_id\tlabel\tprobabilities\toutlier_score\tcontig_id\tbest_label")?;
    writeln!(noise_out, "subcontig_id\tlabel\tprobabilities\toutlier_score\tcontig_id\tbest_label")?;

    let mut sorted_rows: Vec<&SubcontigClusterRow> = rows.iter().collect();
    sorted_rows.sort_by(|a, b| a.subcontig_id.cmp(&b.subcontig_id));

    for row in sorted_rows {
        let label = best_label.get(row.contig_id.as_str()).copied().unwrap_or(-1);
        let line = format!("{}\t{}\t{}\t{}\t{}\t{}\n",
            row.subcontig_id, row.label, row.probability, row.outlier_score, row.contig_id, label);
        if label == -1 {
            noise_out.write_all(line.as_bytes())?;
        } else {
            clusters_out.write_all(line.as_bytes())?;
        }
    }
    Ok(())
}

/// Writes a `(best_label, contig_id)` table: shared schema for `hdbscan_clusters.tsv`,
/// `ocsvm_clusters.tsv`, and `inter_clusters.tsv`.
pub fn write_label_contig_table(path: &str, rows: &[(String, String)]) -> std::io::Result<()> {
    let mut out = out_writer(path, false);
    writeln!(out, "best_label\tcontig_id")?;
    let mut sorted: Vec<&(String, String)> = rows.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    for (label, contig_id) in sorted {
        writeln!(out, "{label}\t{contig_id}")?;
    }
    Ok(())
}

pub fn anchored_cluster_rows(anchored_clusters: &HashMap<String, std::collections::BTreeSet<String>>) -> Vec<(String, String)> {
    anchored_clusters.iter()
        .flat_map(|(anchor_id, contigs)| contigs.iter().map(move |c| (anchor_id.clone(), c.clone())))
        .collect()
}

pub fn ensemble_rows_as_label_contig(rows: &[crate::ensemble::EnsembleRow]) -> Vec<(String, String)> {
    rows.iter().map(|r| (r.anchor_id.clone(), r.contig_id.clone())).collect()
}

pub fn final_label_rows(rows: &[FinalLabel]) -> Vec<(String, String)> {
    rows.iter().map(|r| (r.best_label.clone(), r.contig_id.clone())).collect()
}

/// Writes the diagnostics table: `(anchor_id, status, skipped_recruiters)`.
pub fn write_diagnostics(path: &str, diagnostics: &crate::diagnostics::Diagnostics) -> std::io::Result<()> {
    let mut out = out_writer(path, false);
    writeln!(out, "anchor_id\tstatus\tskipped_recruiters")?;
    for (anchor_id, status, skipped) in diagnostics.rows() {
        writeln!(out, "{anchor_id}\t{status}\t{skipped}")?;
    }
    Ok(())
}
