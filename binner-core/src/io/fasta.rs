//! Minimal FASTA reading: contig loading is a collaborator's job in the larger pipeline, but the
//! core still needs a way to turn a `(subcontig_id, sequence)` stream into [`Contig`] values
//! when it is run end to end from the command line.

use std::io::BufRead;

use binner_io::{open_file, IoError};

use crate::contig::Contig;

/// Reads every `>id` / sequence record from a FASTA file. Sequence lines are concatenated
/// verbatim (not uppercased) until the next header or end of file.
pub fn read_contigs(path: &str) -> Result<Vec<Contig>, IoError> {
    let reader = open_file(path).map_err(IoError::Io)?;
    let mut contigs = Vec::new();
    let mut current_id: Option<String> = None;
    let mut current_seq = String::new();

    for line in reader.lines() {
        let line = line.map_err(IoError::Io)?;
        if let Some(id) = line.strip_prefix('>') {
            if let Some(prev_id) = current_id.take() {
                contigs.push(Contig::new(prev_id, std::mem::take(&mut current_seq)));
            }
            current_id = Some(id.trim().split_whitespace().next().unwrap_or("").to_string());
        } else {
            current_seq.push_str(line.trim());
        }
    }
    if let Some(id) = current_id {
        contigs.push(Contig::new(id, current_seq));
    }

    for contig in &contigs {
        if contig.sequence.is_empty() {
            return Err(IoError::MalformedInput {
                path: path.to_string(),
                reason: format!("contig {} has an empty sequence", contig.id),
            });
        }
    }
    Ok(contigs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    #[test]
    fn test_reads_two_records_with_wrapped_sequence_lines() {
        let path = "test_reads_two_records.fasta.tmp";
        let mut f = fs::File::create(path).unwrap();
        writeln!(f, ">contig1 some description\nACGT\nACGT\n>contig2\nTTTT").unwrap();
        drop(f);

        let contigs = read_contigs(path).unwrap();
        fs::remove_file(path).unwrap();

        assert_eq!(contigs.len(), 2);
        assert_eq!(contigs[0].id, "contig1");
        assert_eq!(contigs[0].sequence, "ACGTACGT");
        assert_eq!(contigs[1].id, "contig2");
        assert_eq!(contigs[1].sequence, "TTTT");
    }
}
