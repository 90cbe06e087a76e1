//! The semiring-generic SpGEMM engine (`§4.2`): `C = A · B` over a
//! user-supplied [`Semiring`].
//!
//! A real SUMMA deployment broadcasts each of the √p row/column blocks
//! across the process grid at every step; since every block already
//! lives in this one process's memory (`crate::impls::dist_matrix`),
//! those broadcasts collapse to direct reads, and what is left of SUMMA's
//! structure is exactly its compute shape: every output block `(pr, pc)`
//! is the sum, over the inner grid index `s`, of `A[pr][s] · B[s][pc]`.
//! `rayon` parallelizes across output blocks; within a block the inner
//! product uses a Gustavson marker-map local multiply, adapted from
//! `other_examples/…deep_causality_sparse…mat_mult_impl.rs`'s numeric-ring
//! kernel to an arbitrary semiring.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::impls::dist_matrix::DistMatrix;
use crate::impls::local_block::LocalBlock;
use crate::traits::Semiring;

/// Accumulates one step's contribution (`A[pr][s] · B[s][pc]`) into
/// `acc`, keyed by local `(row, col)` within the output block, merging
/// with any prior step's contribution at the same cell via `S::add`.
/// This is the marker-map variant of Gustavson's algorithm: rather than a
/// dense reusable row buffer (which needs a cheap "empty" sentinel this
/// crate's arbitrary `Output` type cannot provide), a hash map plays the
/// same role of visiting only non-zero intermediate cells.
fn local_multiply<S: Semiring>(a_block: &LocalBlock<S::Left>, b_block: &LocalBlock<S::Right>, acc: &mut HashMap<(u32, u32), S::Output>)
where
    S::Output: Clone,
{
    for row in 0..a_block.local_rows() {
        let (a_cols, a_vals) = a_block.row(row);
        for (&inner, a_val) in a_cols.iter().zip(a_vals.iter()) {
            let (b_cols, b_vals) = b_block.row(inner);
            for (&col, b_val) in b_cols.iter().zip(b_vals.iter()) {
                let product = S::multiply(a_val, b_val);
                acc.entry((row, col)).and_modify(|existing| *existing = S::add(existing.clone(), product.clone())).or_insert(product);
            }
        }
    }
}

/// Computes `C = A · B` under semiring `S`. `A`'s column count must equal
/// `B`'s row count, and both must share the same process-grid side
/// (`§4.2`).
///
/// Cells equal to `S::id()` may be emitted (the engine does not filter
/// them); callers prune those with [`DistMatrix::prune`] as `§4.2`
/// specifies.
#[must_use]
pub fn spgemm<S>(a: &DistMatrix<S::Left>, b: &DistMatrix<S::Right>) -> DistMatrix<S::Output>
where
    S: Semiring,
    S::Left: Sync,
    S::Right: Sync,
    S::Output: Send + Clone,
{
    assert_eq!(a.grid_side(), b.grid_side(), "spgemm requires matching process grids");
    assert_eq!(a.n_cols(), b.n_rows(), "inner dimensions must agree");

    let grid_side = a.grid_side();
    let blocks: Vec<LocalBlock<S::Output>> = (0..grid_side * grid_side)
        .into_par_iter()
        .map(|idx| {
            let pr = idx / grid_side;
            let pc = idx % grid_side;
            let mut acc: HashMap<(u32, u32), S::Output> = HashMap::new();
            for s in 0..grid_side {
                local_multiply::<S>(a.block(pr, s), b.block(s, pc), &mut acc);
            }
            let (row_start, row_end) = a.row_range(pr);
            let (col_start, col_end) = b.col_range(pc);
            let triples: Vec<(u32, u32, S::Output)> = acc.into_iter().map(|((r, c), v)| (r, c, v)).collect();
            LocalBlock::from_triples(row_end - row_start, col_end - col_start, triples)
        })
        .collect();

    DistMatrix::from_blocks(a.n_rows(), b.n_cols(), grid_side, blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naive_structs::naive_spgemm;
    use crate::semirings::kmer_intersection::KmerIntersectionSemiring;

    #[test]
    fn matches_naive_oracle_on_shared_kmers() {
        // Three reads; reads 0 and 2 share a k-mer at positions (5, 9) via
        // an intermediate k-mer column, read 1 shares nothing.
        let a = DistMatrix::from_global_triples(3, 2, 2, vec![(0, 0, 5u32), (2, 0, 9u32), (1, 1, 3u32)]);
        let at = DistMatrix::from_global_triples(2, 3, 2, vec![(0, 0, 5u32), (0, 2, 9u32), (1, 1, 3u32)]);

        let fast = spgemm::<KmerIntersectionSemiring>(&a, &at);
        let naive = naive_spgemm::<KmerIntersectionSemiring>(&a, &at);

        for row in 0..3u32 {
            for col in 0..3u32 {
                let fast_cell = to_dense_cell(&fast, row, col);
                let naive_cell = naive.get(row as usize, col as usize).cloned();
                assert_eq!(fast_cell, naive_cell, "mismatch at ({row}, {col})");
            }
        }
    }

    fn to_dense_cell<V: Clone>(matrix: &DistMatrix<V>, row: u32, col: u32) -> Option<V> {
        crate::naive_structs::to_dense(matrix).get(row as usize, col as usize).cloned()
    }

    proptest::proptest! {
        /// Repeated SpGEMM runs on the same input and grid yield
        /// bitwise-identical output matrices (`§8` invariant 5) — the
        /// rayon-parallel block loop must not introduce any
        /// scheduling-order nondeterminism into the accumulated result.
        #[test]
        fn spgemm_is_deterministic(
            a_coords in proptest::collection::vec((0u32..4, 0u32..3, 0u32..50), 0..15),
            at_coords in proptest::collection::vec((0u32..3, 0u32..4, 0u32..50), 0..15),
        ) {
            let a = DistMatrix::from_global_triples(4, 3, 1, a_coords);
            let at = DistMatrix::from_global_triples(3, 4, 1, at_coords);

            let first = spgemm::<KmerIntersectionSemiring>(&a, &at);
            let second = spgemm::<KmerIntersectionSemiring>(&a, &at);

            for row in 0..4u32 {
                for col in 0..4u32 {
                    proptest::prop_assert_eq!(to_dense_cell(&first, row, col), to_dense_cell(&second, row, col));
                }
            }
        }
    }
}
