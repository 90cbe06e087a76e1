//! A minimal in-memory read table and FASTA reader (`§4.7` "ambient,
//! minimal"). This is deliberately the thin version of the distributed
//! FASTA loader the system this crate was distilled from carries: enough
//! for the k-mer indexer and aligner to consume, not a hardened parser.

use std::io::BufRead;
use std::path::Path;

use crate::errors::PipelineError;
use crate::types::ReadId;

/// One read: its stable id, its raw base sequence, and the free-text
/// header it was loaded under (kept for diagnostics, not parsed further).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    /// Stable identifier, also this record's index into
    /// [`ReadTable::sequence`].
    pub id: ReadId,
    /// FASTA header line, without the leading `>`.
    pub header: String,
    /// Raw base sequence, upper-cased, with no embedded newlines.
    pub sequence: Vec<u8>,
}

/// An in-memory table of reads, indexed densely by [`ReadId`].
///
/// In a real distributed deployment each rank would hold only the reads
/// it owns (`ReadId % world_size`, per `§4.7`); since this crate keeps
/// every block of every matrix in one process's memory already (see
/// [`crate::impls::dist_matrix`]), the table simply holds every read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadTable {
    records: Vec<ReadRecord>,
}

impl ReadTable {
    /// Builds a table directly from records, assigning dense ids by
    /// position.
    #[must_use]
    pub fn from_records(mut records: Vec<(String, Vec<u8>)>) -> Self {
        let records = records
            .drain(..)
            .enumerate()
            .map(|(id, (header, sequence))| ReadRecord { id: id as ReadId, header, sequence })
            .collect();
        Self { records }
    }

    /// Parses a FASTA file: `>` header lines, sequence lines concatenated
    /// until the next `>` or end of file. No line-wrapping ambiguity
    /// handling beyond that concatenation (`§4.7`).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if the file cannot be opened or read,
    /// or [`PipelineError::MalformedInput`] if the file does not start
    /// with a header line.
    pub fn from_fasta(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| PipelineError::io(path, e))?;
        let reader = std::io::BufReader::new(file);

        let mut records = Vec::new();
        let mut current_header: Option<String> = None;
        let mut current_seq = Vec::new();

        for line in reader.lines() {
            let line = line.map_err(|e| PipelineError::io(path, e))?;
            let line = line.trim_end();
            if let Some(header) = line.strip_prefix('>') {
                if let Some(prev) = current_header.take() {
                    records.push((prev, std::mem::take(&mut current_seq)));
                }
                current_header = Some(header.to_string());
            } else if current_header.is_some() {
                current_seq.extend(line.as_bytes().iter().map(u8::to_ascii_uppercase));
            } else if !line.is_empty() {
                return Err(PipelineError::malformed(path, "sequence data before first header"));
            }
        }
        if let Some(prev) = current_header.take() {
            records.push((prev, current_seq));
        }

        Ok(Self::from_records(records))
    }

    /// Number of reads in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no reads.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrows the raw sequence of read `id`.
    #[must_use]
    pub fn sequence(&self, id: ReadId) -> &[u8] {
        &self.records[id as usize].sequence
    }

    /// Borrows the record for read `id`.
    #[must_use]
    pub fn record(&self, id: ReadId) -> &ReadRecord {
        &self.records[id as usize]
    }

    /// Iterates every record in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ReadRecord> {
        self.records.iter()
    }
}

/// Parses a `--idxmap` file: one `"<local> <global>"` pair of ids per
/// line, mapping a locally-numbered read to its globally stable id
/// (`§4.7`, `§6`).
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if the file cannot be read, or
/// [`PipelineError::MalformedInput`] if a line does not parse as two
/// whitespace-separated integers.
pub fn load_idxmap(path: impl AsRef<Path>) -> Result<Vec<(ReadId, ReadId)>, PipelineError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    let mut pairs = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let local = fields.next().and_then(|s| s.parse::<ReadId>().ok());
        let global = fields.next().and_then(|s| s.parse::<ReadId>().ok());
        match (local, global, fields.next()) {
            (Some(local), Some(global), None) => pairs.push((local, global)),
            _ => return Err(PipelineError::malformed(path, format!("expected '<local> <global>', got {line:?}"))),
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn from_records_assigns_dense_ids() {
        let table = ReadTable::from_records(vec![("r0".into(), b"ACGT".to_vec()), ("r1".into(), b"TTTT".to_vec())]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.sequence(1), b"TTTT");
        assert_eq!(table.record(0).header, "r0");
    }

    #[test]
    fn from_fasta_concatenates_wrapped_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">read0 some description\nACGT\nACGT\n>read1\nTTTT").unwrap();
        let table = ReadTable::from_fasta(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.sequence(0), b"ACGTACGT");
        assert_eq!(table.record(0).header, "read0 some description");
        assert_eq!(table.sequence(1), b"TTTT");
    }

    #[test]
    fn load_idxmap_parses_pairs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 17\n1 3").unwrap();
        let pairs = load_idxmap(file.path()).unwrap();
        assert_eq!(pairs, vec![(0, 17), (1, 3)]);
    }

    #[test]
    fn load_idxmap_rejects_malformed_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 17 99").unwrap();
        assert!(load_idxmap(file.path()).is_err());
    }
}
