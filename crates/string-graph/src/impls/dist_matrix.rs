//! The distributed sparse-matrix substrate (`§4.1`, `§4.2`).
//!
//! A [`DistMatrix`] holds every [`LocalBlock`] of a logical √p × √p
//! block partition in one process's memory: nothing here actually crosses
//! an OS process boundary. This is a deliberate simplification of a
//! real MPI-backed deployment (see `DESIGN.md`) — the contract exposed by
//! `apply`/`prune`/`reduce`/`dim_apply`/`ewise_apply` is the one a
//! genuinely distributed implementation would also have to satisfy, so
//! [`crate::spgemm`] and [`crate::tr`] are written against it without
//! reference to how the blocks are actually stored.

use rayon::prelude::*;

use crate::errors::PipelineError;
use crate::impls::local_block::LocalBlock;
use crate::traits::ProcessGrid;

/// Which dimension a reduction or broadcast runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Per-row.
    Row,
    /// Per-column.
    Col,
}

/// Splits a `total`-length dimension into `parts` contiguous chunks as
/// evenly as possible, returning the `[start, end)` range for chunk
/// `idx`. This is a contiguous simplification of ScaLAPACK-style
/// block-cyclic distribution (`DESIGN.md`): since every block already
/// lives in the same process, wrap-around placement has no behavioral
/// consequence here, only a load-balance one this crate does not need to
/// optimize for.
fn block_bounds(total: u32, parts: usize, idx: usize) -> (u32, u32) {
    let base = total / parts as u32;
    let rem = total % parts as u32;
    let start = idx as u32 * base + (idx as u32).min(rem);
    let extra = u32::from(idx < rem as usize);
    (start, start + base + extra)
}

/// A logical `n_rows × n_cols` sparse matrix, partitioned into a
/// `grid_side × grid_side` array of [`LocalBlock`]s (`§4.1`).
#[derive(Debug, Clone)]
pub struct DistMatrix<V> {
    grid_side: usize,
    n_rows: u32,
    n_cols: u32,
    /// Row-major: `blocks[pr * grid_side + pc]`.
    blocks: Vec<LocalBlock<V>>,
}

impl<V> PartialEq for DistMatrix<V>
where
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.n_rows == other.n_rows && self.n_cols == other.n_cols && self.grid_side == other.grid_side && self.blocks == other.blocks
    }
}

impl<V> DistMatrix<V> {
    /// Builds an all-zero matrix of the given global shape.
    #[must_use]
    pub fn empty(n_rows: u32, n_cols: u32, grid_side: usize) -> Self {
        let blocks = (0..grid_side * grid_side)
            .map(|idx| {
                let pr = idx / grid_side;
                let pc = idx % grid_side;
                let (rs, re) = block_bounds(n_rows, grid_side, pr);
                let (cs, ce) = block_bounds(n_cols, grid_side, pc);
                LocalBlock::empty(re - rs, ce - cs)
            })
            .collect();
        Self { grid_side, n_rows, n_cols, blocks }
    }

    /// Builds a matrix from global `(row, col, value)` triples, routing
    /// each into the block that owns its coordinates.
    pub fn from_global_triples(n_rows: u32, n_cols: u32, grid_side: usize, triples: Vec<(u32, u32, V)>) -> Self {
        let mut per_block: Vec<Vec<(u32, u32, V)>> = (0..grid_side * grid_side).map(|_| Vec::new()).collect();
        for (row, col, value) in triples {
            let pr = Self::owner_index(row, n_rows, grid_side);
            let pc = Self::owner_index(col, n_cols, grid_side);
            let (rs, _) = block_bounds(n_rows, grid_side, pr);
            let (cs, _) = block_bounds(n_cols, grid_side, pc);
            per_block[pr * grid_side + pc].push((row - rs, col - cs, value));
        }
        let blocks = per_block
            .into_iter()
            .enumerate()
            .map(|(idx, triples)| {
                let pr = idx / grid_side;
                let pc = idx % grid_side;
                let (rs, re) = block_bounds(n_rows, grid_side, pr);
                let (cs, ce) = block_bounds(n_cols, grid_side, pc);
                LocalBlock::from_triples(re - rs, ce - cs, triples)
            })
            .collect();
        Self { grid_side, n_rows, n_cols, blocks }
    }

    /// Builds a matrix directly from already-partitioned blocks, in
    /// `[pr * grid_side + pc]` row-major order. Used by
    /// [`crate::spgemm::spgemm`], which computes each output block
    /// independently and has no need to route through global triples.
    pub(crate) fn from_blocks(n_rows: u32, n_cols: u32, grid_side: usize, blocks: Vec<LocalBlock<V>>) -> Self {
        debug_assert_eq!(blocks.len(), grid_side * grid_side);
        Self { grid_side, n_rows, n_cols, blocks }
    }

    fn owner_index(coordinate: u32, total: u32, grid_side: usize) -> usize {
        for idx in 0..grid_side {
            let (start, end) = block_bounds(total, grid_side, idx);
            if coordinate >= start && coordinate < end {
                return idx;
            }
        }
        grid_side - 1
    }

    /// Global row count.
    #[must_use]
    pub fn n_rows(&self) -> u32 {
        self.n_rows
    }

    /// Global column count.
    #[must_use]
    pub fn n_cols(&self) -> u32 {
        self.n_cols
    }

    /// Side of the logical process grid this matrix is partitioned over.
    #[must_use]
    pub fn grid_side(&self) -> usize {
        self.grid_side
    }

    /// Borrows the block owned by `(pr, pc)`.
    #[must_use]
    pub fn block(&self, pr: usize, pc: usize) -> &LocalBlock<V> {
        &self.blocks[pr * self.grid_side + pc]
    }

    /// The global row range owned by grid row `pr`.
    #[must_use]
    pub fn row_range(&self, pr: usize) -> (u32, u32) {
        block_bounds(self.n_rows, self.grid_side, pr)
    }

    /// The global column range owned by grid column `pc`.
    #[must_use]
    pub fn col_range(&self, pc: usize) -> (u32, u32) {
        block_bounds(self.n_cols, self.grid_side, pc)
    }

    /// The mathematical transpose: block `(pr, pc)` moves to `(pc, pr)`
    /// and is itself transposed, with no payload transformation — pairs
    /// with [`DistMatrix::apply`] for the payload-aware symmetrize in
    /// `§4.5` step 1.
    #[must_use]
    pub fn transpose(&self) -> Self
    where
        V: Clone,
    {
        let grid_side = self.grid_side;
        let mut blocks: Vec<Option<LocalBlock<V>>> = (0..grid_side * grid_side).map(|_| None).collect();
        for pr in 0..grid_side {
            for pc in 0..grid_side {
                blocks[pc * grid_side + pr] = Some(self.block(pr, pc).transpose());
            }
        }
        let blocks = blocks.into_iter().map(|b| b.expect("every (pr, pc) slot is visited exactly once")).collect();
        DistMatrix { grid_side, n_rows: self.n_cols, n_cols: self.n_rows, blocks }
    }

    /// Total stored non-zeros across every block.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.blocks.iter().map(LocalBlock::nnz).sum()
    }

    /// Maps every stored non-zero through `f`, called with *global*
    /// coordinates, in parallel across blocks (`§4.2`).
    pub fn apply<W: Send>(&self, f: impl Fn(u32, u32, &V) -> W + Sync) -> DistMatrix<W> {
        let grid_side = self.grid_side;
        let blocks = self
            .blocks
            .par_iter()
            .enumerate()
            .map(|(idx, block)| {
                let pr = idx / grid_side;
                let pc = idx % grid_side;
                let (rs, _) = block_bounds(self.n_rows, grid_side, pr);
                let (cs, _) = block_bounds(self.n_cols, grid_side, pc);
                block.map(|lr, lc, v| f(rs + lr, cs + lc, v))
            })
            .collect();
        DistMatrix { grid_side, n_rows: self.n_rows, n_cols: self.n_cols, blocks }
    }

    /// Keeps only the non-zeros for which `keep` (called with *global*
    /// coordinates) returns `true` (`§4.2`).
    #[must_use]
    pub fn prune(&self, keep: impl Fn(u32, u32, &V) -> bool + Sync) -> Self
    where
        V: Clone + Send + Sync,
    {
        let grid_side = self.grid_side;
        let blocks = self
            .blocks
            .par_iter()
            .enumerate()
            .map(|(idx, block)| {
                let pr = idx / grid_side;
                let pc = idx % grid_side;
                let (rs, _) = block_bounds(self.n_rows, grid_side, pr);
                let (cs, _) = block_bounds(self.n_cols, grid_side, pc);
                block.prune(|lr, lc, v| keep(rs + lr, cs + lc, v))
            })
            .collect();
        DistMatrix { grid_side, n_rows: self.n_rows, n_cols: self.n_cols, blocks }
    }

    /// Reduces every non-zero into a length-`n_rows` (or `n_cols`) vector
    /// via `monoid`, starting from `id` (`§4.2`).
    #[must_use]
    pub fn reduce(&self, axis: Axis, monoid: impl Fn(&V, &V) -> V, id: V) -> Vec<V>
    where
        V: Clone,
    {
        let len = match axis {
            Axis::Row => self.n_rows,
            Axis::Col => self.n_cols,
        } as usize;
        let mut acc = vec![id; len];
        for (pr, pc, block) in self.blocks_with_coords() {
            let (rs, _) = block_bounds(self.n_rows, self.grid_side, pr);
            let (cs, _) = block_bounds(self.n_cols, self.grid_side, pc);
            for (lr, lc, v) in block.iter() {
                let key = match axis {
                    Axis::Row => rs + lr,
                    Axis::Col => cs + lc,
                } as usize;
                acc[key] = monoid(&acc[key], v);
            }
        }
        acc
    }

    /// Combines every stored value with the entry of `vec` indexed by its
    /// row (or column), as in CombBLAS's `DimApply` (`§4.2`).
    #[must_use]
    pub fn dim_apply<S: Sync, W: Send>(&self, axis: Axis, vec: &[S], bin_op: impl Fn(&V, &S) -> W + Sync) -> DistMatrix<W> {
        self.apply(|r, c, v| {
            let key = match axis {
                Axis::Row => r,
                Axis::Col => c,
            } as usize;
            bin_op(v, &vec[key])
        })
    }

    /// Element-wise merges `self` and `other`, which must share shape and
    /// partitioning. `bin_op` is called once per coordinate present in
    /// either operand; returning `None` drops that coordinate from the
    /// result, matching a sparse element-wise union (`§4.2`).
    pub fn ewise_apply<R, Out>(&self, other: &DistMatrix<R>, mut bin_op: impl FnMut(Option<&V>, Option<&R>) -> Option<Out>) -> DistMatrix<Out> {
        assert_eq!(self.grid_side, other.grid_side, "ewise_apply requires matching partitioning");
        assert_eq!(self.n_rows, other.n_rows, "ewise_apply requires matching shape");
        assert_eq!(self.n_cols, other.n_cols, "ewise_apply requires matching shape");

        let blocks = self
            .blocks
            .iter()
            .zip(other.blocks.iter())
            .map(|(a, b)| Self::ewise_block(a, b, &mut bin_op))
            .collect();
        DistMatrix { grid_side: self.grid_side, n_rows: self.n_rows, n_cols: self.n_cols, blocks }
    }

    fn ewise_block<R, Out>(a: &LocalBlock<V>, b: &LocalBlock<R>, bin_op: &mut impl FnMut(Option<&V>, Option<&R>) -> Option<Out>) -> LocalBlock<Out> {
        let mut triples = Vec::new();
        for row in 0..a.local_rows() {
            let (a_cols, a_vals) = a.row(row);
            let (b_cols, b_vals) = b.row(row);
            let mut ai = 0usize;
            let mut bi = 0usize;
            while ai < a_cols.len() || bi < b_cols.len() {
                let take_a = bi >= b_cols.len() || (ai < a_cols.len() && a_cols[ai] <= b_cols[bi]);
                let take_b = ai >= a_cols.len() || (bi < b_cols.len() && b_cols[bi] <= a_cols[ai]);
                let col = if take_a { a_cols[ai] } else { b_cols[bi] };
                let av = if take_a { Some(&a_vals[ai]) } else { None };
                let bv = if take_b { Some(&b_vals[bi]) } else { None };
                if take_a {
                    ai += 1;
                }
                if take_b {
                    bi += 1;
                }
                if let Some(out) = bin_op(av, bv) {
                    triples.push((row, col, out));
                }
            }
        }
        LocalBlock::from_triples(a.local_rows(), a.local_cols(), triples)
    }

    fn blocks_with_coords(&self) -> impl Iterator<Item = (usize, usize, &LocalBlock<V>)> {
        self.blocks.iter().enumerate().map(move |(idx, block)| (idx / self.grid_side, idx % self.grid_side, block))
    }

    /// Gathers every stored non-zero as global `(row, col, value)`
    /// triples, via the grid's rank-ordered collective so the result is
    /// deterministic regardless of how ranks are scheduled (`§6`).
    ///
    /// # Errors
    ///
    /// Propagates [`PipelineError::Collective`] from the grid.
    pub fn collective_triples<G: ProcessGrid>(&self, grid: &G) -> Result<Vec<(u32, u32, V)>, PipelineError>
    where
        V: Clone + Send + Sync,
    {
        let grid_side = self.grid_side;
        let per_rank = grid.collect_in_rank_order(|rank| {
            let (pr, pc) = grid.coordinates_of(rank);
            let block = &self.blocks[pr * grid_side + pc];
            let (rs, _) = block_bounds(self.n_rows, grid_side, pr);
            let (cs, _) = block_bounds(self.n_cols, grid_side, pc);
            block.iter().map(|(lr, lc, v)| (rs + lr, cs + lc, v.clone())).collect::<Vec<_>>()
        })?;
        Ok(per_rank.into_iter().flatten().collect())
    }
}

impl<V> std::ops::AddAssign<&DistMatrix<V>> for DistMatrix<V>
where
    V: Clone + std::ops::Add<Output = V>,
{
    fn add_assign(&mut self, rhs: &DistMatrix<V>) {
        *self = self.ewise_apply(rhs, |a, b| match (a, b) {
            (Some(x), Some(y)) => Some(x.clone() + y.clone()),
            (Some(x), None) => Some(x.clone()),
            (None, Some(y)) => Some(y.clone()),
            (None, None) => None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_global_triples_routes_to_owning_block() {
        let m = DistMatrix::from_global_triples(4, 4, 2, vec![(0, 0, 1), (3, 3, 2), (1, 2, 3)]);
        assert_eq!(m.nnz(), 3);
        assert_eq!(*m.block(0, 0).get(0, 0).unwrap(), 1);
        assert_eq!(*m.block(1, 1).get(1, 1).unwrap(), 2);
        assert_eq!(*m.block(0, 1).get(1, 0).unwrap(), 3);
    }

    #[test]
    fn apply_preserves_global_coordinates() {
        let m = DistMatrix::from_global_triples(4, 4, 2, vec![(3, 3, 10)]);
        let mapped = m.apply(|r, c, v| (r, c, *v));
        assert_eq!(*mapped.block(1, 1).get(1, 1).unwrap(), (3, 3, 10));
    }

    #[test]
    fn reduce_sums_per_row() {
        let m = DistMatrix::from_global_triples(3, 3, 1, vec![(0, 0, 1), (0, 1, 2), (1, 2, 5)]);
        let sums = m.reduce(Axis::Row, |a, b| a + b, 0);
        assert_eq!(sums, vec![3, 5, 0]);
    }

    #[test]
    fn ewise_apply_unions_patterns() {
        let a = DistMatrix::from_global_triples(2, 2, 1, vec![(0, 0, 1)]);
        let b = DistMatrix::from_global_triples(2, 2, 1, vec![(0, 0, 10), (1, 1, 7)]);
        let sum = a.ewise_apply(&b, |x, y| match (x, y) {
            (Some(a), Some(b)) => Some(a + b),
            (Some(a), None) => Some(*a),
            (None, Some(b)) => Some(*b),
            (None, None) => None,
        });
        assert_eq!(*sum.block(0, 0).get(0, 0).unwrap(), 11);
        assert_eq!(*sum.block(0, 0).get(1, 1).unwrap(), 7);
        assert_eq!(sum.nnz(), 2);
    }

    proptest::proptest! {
        /// `transpose ∘ transpose = id` on both structure and payload (`§8`
        /// round-trip law 1), for arbitrary sparsity patterns on a fixed
        /// `4x6` grid split `2x2`.
        #[test]
        fn transpose_is_involutive(coords in proptest::collection::vec((0u32..4, 0u32..6, 0i64..100), 0..20)) {
            let triples: Vec<(u32, u32, i64)> = coords;
            let m = DistMatrix::from_global_triples(4, 6, 2, triples);
            let round_tripped = m.transpose().transpose();
            proptest::prop_assert_eq!(m, round_tripped);
        }
    }
}
