//! Component 4.B: tetranucleotide-frequency featurization.
//!
//! Every subcontig gets a 136-dimensional vector: the 256 possible 4-mers collapsed onto
//! their reverse partners, pseudocounted, length-normalized, centered-log-ratio transformed,
//! and finally standardized column-wise across the whole subcontig population.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use binner_stats::OnlineMultivariateStatistics;

const BASES: [char; 4] = ['a', 'c', 'g', 't'];

/// Fixed lexicographic order of the 136 kept 4-mers, each the lexicographically smaller of a
/// `{kmer, reversed(kmer)}` pair (or the kmer itself when it is its own reversal).
pub static KEPT_KMERS: Lazy<Vec<String>> = Lazy::new(build_kept_kmers);

fn all_4mers() -> Vec<String> {
    let mut out = Vec::with_capacity(256);
    for a in BASES {
        for b in BASES {
            for c in BASES {
                for d in BASES {
                    out.push([a, b, c, d].iter().collect());
                }
            }
        }
    }
    out
}

fn reverse_string(s: &str) -> String { s.chars().rev().collect() }

fn build_kept_kmers() -> Vec<String> {
    let mut representatives: Vec<String> = all_4mers().into_iter()
        .map(|k| { let r = reverse_string(&k); if r < k { r } else { k } })
        .collect();
    representatives.sort();
    representatives.dedup();
    representatives
}

/// Maps each of the 256 4-mers to the column index of its collapsed representative in
/// [`KEPT_KMERS`].
static KMER_TO_COLUMN: Lazy<HashMap<String, usize>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(256);
    let index_of: HashMap<&str, usize> =
        KEPT_KMERS.iter().enumerate().map(|(i, k)| (k.as_str(), i)).collect();
    for kmer in all_4mers() {
        let reversed = reverse_string(&kmer);
        let representative = if reversed < kmer { reversed } else { kmer.clone() };
        map.insert(kmer, index_of[representative.as_str()]);
    }
    map
});

/// Counts the 256 possible 4-mers in `sequence` (case-insensitive) and folds them down to the
/// 136 reverse-collapsed counts. 4-mers containing a non-ACGT character are skipped.
pub fn raw_tnf_counts(sequence: &str) -> Vec<f64> {
    let mut counts = vec![0.0f64; KEPT_KMERS.len()];
    let lower = sequence.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    if bytes.len() < 4 { return counts; }
    for window in bytes.windows(4) {
        let kmer = match std::str::from_utf8(window) { Ok(s) => s, Err(_) => continue };
        if !kmer.chars().all(|c| BASES.contains(&c)) { continue; }
        if let Some(&col) = KMER_TO_COLUMN.get(kmer) { counts[col] += 1.0; }
    }
    counts
}

/// Turns raw collapsed counts into a proportion-then-length-normalized, CLR-transformed row.
/// `sequence_length` is the length of the subcontig the counts were drawn from.
pub fn clr_transform_row(raw_counts: &[f64], sequence_length: usize) -> Vec<f64> {
    let pseudo: Vec<f64> = raw_counts.iter().map(|c| c + 1.0).collect();
    let sum: f64 = pseudo.iter().sum();
    let proportions: Vec<f64> = pseudo.iter().map(|c| (c / sum) / sequence_length as f64).collect();
    let log_props: Vec<f64> = proportions.iter().map(|p| p.ln()).collect();
    let mean_log: f64 = log_props.iter().sum::<f64>() / log_props.len() as f64;
    log_props.into_iter().map(|l| l - mean_log).collect()
}

/// Row-aligned result of featurizing a whole subcontig population: 136 standardized columns.
pub struct TnfTable {
    pub subcontig_ids: Vec<String>,
    /// one row per subcontig, 136 columns each
    pub rows: Vec<Vec<f64>>,
}

/// Computes TNF features for every subcontig and standardizes each of the 136 columns to zero
/// mean, unit variance across the whole population.
pub fn compute_tnf_table(subcontigs: &[crate::contig::Subcontig]) -> TnfTable {
    let dim = KEPT_KMERS.len();
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(subcontigs.len());
    let mut subcontig_ids: Vec<String> = Vec::with_capacity(subcontigs.len());

    let mut stats = OnlineMultivariateStatistics::new(dim);
    for subcontig in subcontigs {
        let raw = raw_tnf_counts(&subcontig.sequence);
        let clr = clr_transform_row(&raw, subcontig.sequence.len().max(1));
        stats.accumulate(&clr);
        subcontig_ids.push(subcontig.id.clone());
        rows.push(clr);
    }

    let means = stats.avg().clone();
    let std_devs: Vec<f64> = stats.var().iter().map(|v| v.sqrt().max(1e-12)).collect();
    for row in rows.iter_mut() {
        for col in 0..dim {
            row[col] = (row[col] - means[col]) / std_devs[col];
        }
    }

    TnfTable { subcontig_ids, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kept_kmers_has_136_entries() {
        assert_eq!(KEPT_KMERS.len(), 136);
    }

    #[test]
    fn test_palindromic_kmer_maps_to_itself() {
        // "acgt" reversed is "tgca"; not a palindrome. "atta" reversed is "attа"? check a true palindrome: "acca" reversed -> "acca"
        let kmer = "acca";
        assert_eq!(reverse_string(kmer), kmer);
        let col = KMER_TO_COLUMN[kmer];
        assert_eq!(KEPT_KMERS[col], kmer);
    }

    #[test]
    fn test_reverse_pair_shares_column() {
        let forward = "acgt";
        let backward = reverse_string(forward);
        assert_eq!(KMER_TO_COLUMN[forward], KMER_TO_COLUMN[backward.as_str()]);
    }

    #[test]
    fn test_clr_row_sums_to_zero() {
        let raw = raw_tnf_counts(&"acgt".repeat(50));
        let clr = clr_transform_row(&raw, 200);
        let sum: f64 = clr.iter().sum();
        assert!(sum.abs() < 1e-6);
    }

    #[test]
    fn test_non_acgt_characters_do_not_panic() {
        let raw = raw_tnf_counts("acgtnnnnacgt");
        assert_eq!(raw.len(), 136);
    }

    #[test]
    fn test_standardized_columns_have_zero_mean_unit_variance() {
        let subcontigs: Vec<crate::contig::Subcontig> = (0..30).map(|i| {
            let seq: String = (0..200).map(|j| ['a', 'c', 'g', 't'][(i + j) % 4]).collect();
            crate::contig::Subcontig { id: format!("s{}", i), contig_id: "c".into(), ordinal: i, start: 0, sequence: seq }
        }).collect();
        let table = compute_tnf_table(&subcontigs);
        for col in 0..136 {
            let column: Vec<f64> = table.rows.iter().map(|r| r[col]).collect();
            let mean: f64 = column.iter().sum::<f64>() / column.len() as f64;
            assert!(mean.abs() < 1e-6, "column {} mean {} not ~0", col, mean);
        }
    }
}
