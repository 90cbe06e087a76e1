//! Builds the reads × k-mers matrix `A` from a [`ReadTable`] by enumerating
//! fixed-length, fixed-stride k-mers (`§3`, `§4.3`).

use std::collections::HashMap;

use crate::impls::dist_matrix::DistMatrix;
use crate::reads::ReadTable;
use crate::types::{KmerId, PosInRead};

/// 2-bit DNA code for one base, or `None` for anything outside `{A,C,G,T}`
/// (ambiguity codes like `N` simply never participate in a k-mer).
fn base_code(base: u8) -> Option<u64> {
    match base {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

/// Packs `k` consecutive bases starting at `start` into a 2-bit-per-base
/// [`KmerId`], or `None` if any base in the window is ambiguous.
fn pack_kmer(sequence: &[u8], start: usize, k: usize) -> Option<KmerId> {
    let mut packed: u64 = 0;
    for &base in &sequence[start..start + k] {
        packed = (packed << 2) | base_code(base)?;
    }
    Some(packed)
}

/// Builds `A`: row `r` is read `r`, column `c` is the `c`-th distinct
/// k-mer observed (in first-seen order across reads in id order), and the
/// stored value at `(r, c)` is the position within read `r` of that
/// k-mer's first occurrence (`§3`: "`multiply(posH, posV)` produces a
/// CommonKmers holding the single pair" — the indexer only needs to
/// surface one position per occurrence for that to typecheck against
/// [`crate::semirings::kmer_intersection::KmerIntersectionSemiring`]).
///
/// `k` must be at most 32 (so a k-mer fits in a `u64` at 2 bits/base,
/// DNA-only per `--alph dna`) and `stride` must be at least 1; both are
/// validated by [`crate::config::Config`] before this is called.
#[must_use]
pub fn build_kmer_index(reads: &ReadTable, k: u16, stride: u32, grid_side: usize) -> DistMatrix<PosInRead> {
    debug_assert!(k >= 1 && k <= 32, "k-mer length must fit in a packed u64");
    debug_assert!(stride >= 1, "k-mer stride must be at least 1");

    let k = k as usize;
    let stride = stride as usize;
    let mut kmer_columns: HashMap<KmerId, u32> = HashMap::new();
    let mut triples = Vec::new();

    for record in reads.iter() {
        if record.sequence.len() < k {
            continue;
        }
        let last_start = record.sequence.len() - k;
        let mut start = 0;
        while start <= last_start {
            if let Some(kmer) = pack_kmer(&record.sequence, start, k) {
                let next_col = kmer_columns.len() as u32;
                let col = *kmer_columns.entry(kmer).or_insert(next_col);
                triples.push((record.id, col, start as PosInRead));
            }
            start += stride;
        }
    }

    let n_rows = reads.len() as u32;
    let n_cols = kmer_columns.len() as u32;
    DistMatrix::from_global_triples(n_rows, n_cols, grid_side, triples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_distinct_kmers_per_read() {
        let reads = ReadTable::from_records(vec![("r0".into(), b"ACGTACGT".to_vec()), ("r1".into(), b"ACGTTTTT".to_vec())]);
        let a = build_kmer_index(&reads, 4, 1, 1);
        // 5 distinct 4-mers total: ACGT, CGTA, GTAC, TACG, TTTT (CGTT, GTTT too).
        assert!(a.n_cols() >= 5);
        assert_eq!(a.n_rows(), 2);
        assert!(a.nnz() > 0);
    }

    #[test]
    fn stride_skips_positions() {
        let reads = ReadTable::from_records(vec![("r0".into(), b"ACGTACGTACGT".to_vec())]);
        let strided = build_kmer_index(&reads, 4, 4, 1);
        let dense = build_kmer_index(&reads, 4, 1, 1);
        assert!(strided.nnz() < dense.nnz());
    }

    #[test]
    fn ambiguous_bases_are_skipped() {
        let reads = ReadTable::from_records(vec![("r0".into(), b"ACGTNNNNACGT".to_vec())]);
        let a = build_kmer_index(&reads, 4, 1, 1);
        assert!(a.nnz() > 0);
    }
}
