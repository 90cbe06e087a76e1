//! A dense, brute-force `n × m` matrix and a quadratic reference SpGEMM,
//! used in tests to cross-check [`crate::spgemm`]'s SUMMA-style engine
//! against an unoptimized ground truth over the same semiring contract.

use crate::impls::dist_matrix::DistMatrix;
use crate::traits::Semiring;

/// A fully materialized dense matrix, `None` standing in for a
/// structural zero.
#[derive(Debug, Clone)]
pub struct DenseMatrix<V> {
    rows: usize,
    cols: usize,
    cells: Vec<Option<V>>,
}

impl<V> DenseMatrix<V> {
    fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, cells: (0..rows * cols).map(|_| None).collect() }
    }

    /// Borrows the value at `(row, col)`, if any.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&V> {
        self.cells[row * self.cols + col].as_ref()
    }

    fn set(&mut self, row: usize, col: usize, value: V) {
        self.cells[row * self.cols + col] = Some(value);
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }
}

/// Flattens a [`DistMatrix`] into a [`DenseMatrix`] by visiting every
/// block directly; only meant for the small matrices exercised in tests.
#[must_use]
pub fn to_dense<V: Clone>(matrix: &DistMatrix<V>) -> DenseMatrix<V> {
    let mut dense = DenseMatrix::new(matrix.n_rows() as usize, matrix.n_cols() as usize);
    for pr in 0..matrix.grid_side() {
        for pc in 0..matrix.grid_side() {
            let block = matrix.block(pr, pc);
            let (row_start, _) = matrix.row_range(pr);
            let (col_start, _) = matrix.col_range(pc);
            for (local_row, local_col, value) in block.iter() {
                dense.set((row_start + local_row) as usize, (col_start + local_col) as usize, value.clone());
            }
        }
    }
    dense
}

/// Computes `C = A · B` under semiring `S` by brute-force triple loop,
/// with no blocking, broadcasting, or parallelism: the oracle
/// [`crate::spgemm::spgemm`]'s SUMMA engine is checked against.
#[must_use]
pub fn naive_spgemm<S>(a: &DistMatrix<S::Left>, b: &DistMatrix<S::Right>) -> DenseMatrix<S::Output>
where
    S: Semiring,
    S::Left: Clone,
    S::Right: Clone,
    S::Output: Clone,
{
    assert_eq!(a.n_cols(), b.n_rows(), "inner dimensions must agree");
    let a_dense = to_dense(a);
    let b_dense = to_dense(b);
    let (n, m, p) = (a.n_rows() as usize, a.n_cols() as usize, b.n_cols() as usize);

    let mut out = DenseMatrix::new(n, p);
    for i in 0..n {
        for j in 0..p {
            let mut acc = S::id();
            let mut touched = false;
            for k in 0..m {
                if let (Some(left), Some(right)) = (a_dense.get(i, k), b_dense.get(k, j)) {
                    acc = S::add(acc, S::multiply(left, right));
                    touched = true;
                }
            }
            if touched {
                out.set(i, j, acc);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semirings::kmer_intersection::KmerIntersectionSemiring;

    #[test]
    fn to_dense_preserves_global_coordinates() {
        let m = DistMatrix::from_global_triples(4, 4, 2, vec![(3, 1, "x")]);
        let dense = to_dense(&m);
        assert_eq!(dense.get(3, 1), Some(&"x"));
        assert_eq!(dense.get(0, 0), None);
    }

    #[test]
    fn naive_spgemm_matches_hand_computed_intersection() {
        // A: reads 0,1 share k-mer column 0 at positions 5 and 9.
        let a = DistMatrix::from_global_triples(2, 1, 1, vec![(0, 0, 5u32), (1, 0, 9u32)]);
        let a_t = DistMatrix::from_global_triples(1, 2, 1, vec![(0, 0, 5u32), (0, 1, 9u32)]);
        let b = naive_spgemm::<KmerIntersectionSemiring>(&a, &a_t);
        let cell = b.get(0, 1).expect("reads 0 and 1 share a k-mer");
        assert_eq!(cell.seeds[0], Some((5, 9)));
    }
}
