//! Component 4.C: joins a per-sample coverage table onto the subcontig universe.

use std::collections::HashMap;
use binner_io::{open_file, IoError};
use std::io::BufRead;

/// Per-subcontig, per-sample abundance values, column order stable across runs.
pub struct CoverageTable {
    pub sample_names: Vec<String>,
    rows_by_subcontig: HashMap<String, Vec<f64>>,
}

impl CoverageTable {
    /// Reads a tab-separated coverage table with a header `subcontig_id\tsample_1\t...`.
    pub fn read_tsv(path: &str) -> Result<CoverageTable, IoError> {
        let reader = open_file(path).map_err(IoError::Io)?;
        let mut lines = reader.lines();
        let header = lines.next().ok_or_else(|| IoError::MalformedInput {
            path: path.to_string(), reason: "empty coverage file".to_string(),
        })?.map_err(IoError::Io)?;
        let header_fields: Vec<&str> = header.split('\t').collect();
        if header_fields.first() != Some(&"subcontig_id") {
            return Err(IoError::MissingColumn { path: path.to_string(), column: "subcontig_id".to_string() });
        }
        let sample_names: Vec<String> = header_fields[1..].iter().map(|s| s.to_string()).collect();

        let mut rows_by_subcontig = HashMap::new();
        for line in lines {
            let line = line.map_err(IoError::Io)?;
            if line.is_empty() { continue; }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != header_fields.len() {
                return Err(IoError::MalformedInput {
                    path: path.to_string(),
                    reason: format!("row has {} fields, expected {}", fields.len(), header_fields.len()),
                });
            }
            let subcontig_id = fields[0].to_string();
            let mut values = Vec::with_capacity(sample_names.len());
            for value in &fields[1..] {
                let parsed: f64 = value.parse().map_err(|_| IoError::MalformedInput {
                    path: path.to_string(), reason: format!("non-numeric coverage value '{}'", value),
                })?;
                if parsed < 0.0 {
                    return Err(IoError::MalformedInput {
                        path: path.to_string(), reason: format!("negative coverage value '{}'", value),
                    });
                }
                values.push(parsed);
            }
            if rows_by_subcontig.insert(subcontig_id.clone(), values).is_some() {
                return Err(IoError::DuplicateKey { path: path.to_string(), key: subcontig_id });
            }
        }

        Ok(CoverageTable { sample_names, rows_by_subcontig })
    }

    pub fn n_samples(&self) -> usize { self.sample_names.len() }

    /// Coverage row for `subcontig_id`, zero-filled if the id is absent from the table.
    pub fn row_for(&self, subcontig_id: &str) -> Vec<f64> {
        self.rows_by_subcontig.get(subcontig_id)
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.sample_names.len()])
    }
}

/// Aligns a coverage table to the subcontig universe produced by 4.A: unknown ids are
/// zero-filled, ids outside the universe are dropped.
pub fn join_coverage(subcontig_ids: &[String], coverage: &CoverageTable) -> Vec<Vec<f64>> {
    subcontig_ids.iter().map(|id| coverage.row_for(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_tsv(contents: &str) -> String {
        let path = format!("/tmp/binner_coverage_test_{}.tsv", std::process::id());
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_subcontig_is_zero_filled() {
        let path = write_temp_tsv("subcontig_id\tsample_1\tsample_2\nctgA_0\t1.5\t2.5\n");
        let table = CoverageTable::read_tsv(&path).unwrap();
        let ids = vec!["ctgA_0".to_string(), "ctgA_1".to_string()];
        let joined = join_coverage(&ids, &table);
        assert_eq!(joined[0], vec![1.5, 2.5]);
        assert_eq!(joined[1], vec![0.0, 0.0]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_rejects_non_numeric_value() {
        let path = write_temp_tsv("subcontig_id\tsample_1\nctgA_0\tNaNish\n");
        let result = CoverageTable::read_tsv(&path);
        assert!(result.is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_rejects_duplicate_subcontig_id() {
        let path = write_temp_tsv("subcontig_id\tsample_1\nctgA_0\t1.0\nctgA_0\t2.0\n");
        let result = CoverageTable::read_tsv(&path);
        assert!(result.is_err());
        std::fs::remove_file(path).ok();
    }
}
