//! Reads the anchor table: `(anchor_id, q_contig_id, jacc_sim, jacc_sim_max)`, tab-separated.
//! Only rows at `jacc_sim_max == 1.0` are kept, per the contract in §6.

use std::collections::{BTreeSet, HashMap};
use std::io::BufRead;

use binner_io::{open_file, IoError};

fn parse_header<'a>(header: &'a str, path: &str) -> Result<HashMap<&'a str, usize>, IoError> {
    let columns: HashMap<&str, usize> = header.split('\t').enumerate().map(|(i, c)| (c, i)).collect();
    for required in ["anchor_id", "q_contig_id", "jacc_sim", "jacc_sim_max"] {
        if !columns.contains_key(required) {
            return Err(IoError::MissingColumn { path: path.to_string(), column: required.to_string() });
        }
    }
    Ok(columns)
}

/// Reads the anchor table, keeping only rows at maximum Jaccard similarity, and groups them by
/// anchor id into the raw `anchors(a)` sets consumed by the intersection reconciler.
pub fn read_anchor_table(path: &str) -> Result<HashMap<String, BTreeSet<String>>, IoError> {
    let reader = open_file(path).map_err(IoError::Io)?;
    let mut lines = reader.lines();
    let header = lines.next()
        .ok_or_else(|| IoError::MalformedInput { path: path.to_string(), reason: "empty file".to_string() })?
        .map_err(IoError::Io)?;
    let columns = parse_header(&header, path)?;

    let anchor_idx = columns["anchor_id"];
    let contig_idx = columns["q_contig_id"];
    let jacc_max_idx = columns["jacc_sim_max"];

    let mut anchors: HashMap<String, BTreeSet<String>> = HashMap::new();
    for line in lines {
        let line = line.map_err(IoError::Io)?;
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let jacc_max: f64 = fields.get(jacc_max_idx)
            .ok_or_else(|| IoError::MalformedInput { path: path.to_string(), reason: format!("short row: {line}") })?
            .parse()
            .map_err(|_| IoError::MalformedInput { path: path.to_string(), reason: format!("non-numeric jacc_sim_max in: {line}") })?;
        if jacc_max != 1.0 {
            continue;
        }
        let anchor_id = fields[anchor_idx].to_string();
        let contig_id = fields[contig_idx].to_string();
        anchors.entry(anchor_id).or_default().insert(contig_id);
    }
    Ok(anchors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    #[test]
    fn test_keeps_only_max_jaccard_rows() {
        let path = "test_keeps_only_max_jaccard.tsv.tmp";
        let mut f = fs::File::create(path).unwrap();
        writeln!(f, "anchor_id\tq_contig_id\tjacc_sim\tjacc_sim_max").unwrap();
        writeln!(f, "A\tc1\t0.9\t1.0").unwrap();
        writeln!(f, "A\tc2\t0.5\t0.9").unwrap();
        drop(f);

        let anchors = read_anchor_table(path).unwrap();
        fs::remove_file(path).unwrap();

        assert_eq!(anchors.len(), 1);
        assert!(anchors["A"].contains("c1"));
        assert!(!anchors["A"].contains("c2"));
    }
}
