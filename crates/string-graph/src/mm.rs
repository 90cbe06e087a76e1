//! Matrix Market output (`§6`): general coordinate format, sufficient for
//! the two files the pipeline writes (pre-TR overlap graph, post-TR
//! string graph) — not the full Matrix Market grammar for arbitrary
//! payload types, which `§1` explicitly leaves out of scope.

use std::io::Write;
use std::path::Path;

use crate::errors::PipelineError;
use crate::impls::dist_matrix::DistMatrix;
use crate::traits::ProcessGrid;

/// Writes `matrix` as a general Matrix Market coordinate file at `path`:
/// one header comment line, a `rows cols nnz` dimension line, then one
/// `i j <payload>` line per stored non-zero, `payload` formatted by
/// `handler`.
///
/// `matrix` is structurally symmetric (as `R` and the post-TR string
/// graph both are, by construction of `§4.5`'s symmetrize step), but
/// `CommonKmers`' payload is not value-symmetric across the diagonal —
/// `(i, j)` and `(j, i)` carry each other's `dir`/`sfx` reflected rather
/// than identical values (`kmer_intersection.rs`'s `transposed`). A
/// standards-compliant symmetric-format reader would reconstruct the
/// omitted triangle by mirroring the stored value, which would silently
/// produce the wrong directional data for every edge. The header is
/// therefore `general` and every stored non-zero, both `(i, j)` and
/// `(j, i)`, is written out explicitly.
///
/// # Errors
///
/// Propagates [`PipelineError::Collective`] from gathering the matrix's
/// non-zeros, and [`PipelineError::Io`] if the output file cannot be
/// created or written.
pub fn parallel_write_mm<V, G: ProcessGrid>(
    path: impl AsRef<Path>,
    grid: &G,
    matrix: &DistMatrix<V>,
    comment: &str,
    handler: impl Fn(&V) -> String,
) -> Result<(), PipelineError>
where
    V: Clone + Send + Sync,
{
    let path = path.as_ref();
    let mut triples = matrix.collective_triples(grid)?;
    triples.sort_unstable_by_key(|(row, col, _)| (*row, *col));

    let file = std::fs::File::create(path).map_err(|e| PipelineError::io(path, e))?;
    let mut writer = std::io::BufWriter::new(file);

    (|| -> std::io::Result<()> {
        writeln!(writer, "%%MatrixMarket matrix coordinate real general")?;
        writeln!(writer, "%{comment}")?;
        writeln!(writer, "{} {} {}", matrix.n_rows(), matrix.n_cols(), triples.len())?;
        for (row, col, value) in &triples {
            writeln!(writer, "{} {} {}", row + 1, col + 1, handler(value))?;
        }
        Ok(())
    })()
    .map_err(|e| PipelineError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::grid::SingleRankGrid;

    #[test]
    fn writes_every_stored_nonzero_with_one_indexed_coordinates() {
        let matrix = DistMatrix::from_global_triples(2, 2, 1, vec![(0, 0, 5), (0, 1, 7), (1, 0, 9)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("string-graph-mm-test-output.mtx");
        parallel_write_mm(&path, &SingleRankGrid, &matrix, "test matrix", |v| v.to_string()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();

        assert!(contents.starts_with("%%MatrixMarket matrix coordinate real general\n"));
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[2], "2 2 3");
        assert!(lines[3..].contains(&"1 1 5"));
        assert!(lines[3..].contains(&"1 2 7"));
        assert!(lines[3..].contains(&"2 1 9"));
    }
}
