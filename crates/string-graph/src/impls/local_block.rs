//! Compressed-sparse-row storage for one block of a [`super::DistMatrix`]
//! (`§4.1`), grounded on the teacher's `CSR2D`. This crate fixes the index
//! types at `u32` instead of carrying the teacher's generic
//! `SparseIndex`/`RowIndex`/`ColumnIndex` parameters (`SPEC_FULL.md`,
//! `DESIGN.md`): the pipeline never needs more than one concrete width, and
//! hand-writing the teacher's `multi_ranged::Step` bounds without a
//! compiler to check them was judged too risky for this exercise.

/// One `grid_side × grid_side`-th block of a logical matrix, stored as
/// compressed sparse rows local to this block's own `0..local_rows`
/// index space. A block's global row/column range is tracked by its
/// owning [`super::DistMatrix`], not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBlock<V> {
    /// `offsets[r]..offsets[r + 1]` indexes into `column_indices`/`values`
    /// for local row `r`. Always has `local_rows + 1` entries.
    offsets: Vec<u32>,
    /// Column indices of each non-zero, local to this block.
    column_indices: Vec<u32>,
    /// Values parallel to `column_indices`.
    values: Vec<V>,
    /// Number of rows local to this block.
    local_rows: u32,
    /// Number of columns local to this block.
    local_cols: u32,
}

impl<V> LocalBlock<V> {
    /// An empty block of the given local shape.
    #[must_use]
    pub fn empty(local_rows: u32, local_cols: u32) -> Self {
        Self { offsets: vec![0; local_rows as usize + 1], column_indices: Vec::new(), values: Vec::new(), local_rows, local_cols }
    }

    /// Builds a block from `(row, col, value)` triples, local to this
    /// block's own index space. Triples need not arrive sorted; later
    /// duplicates at the same `(row, col)` overwrite earlier ones.
    pub fn from_triples(local_rows: u32, local_cols: u32, mut triples: Vec<(u32, u32, V)>) -> Self {
        triples.sort_by_key(|(r, c, _)| (*r, *c));
        triples.dedup_by_key(|(r, c, _)| (*r, *c));

        let mut offsets = Vec::with_capacity(local_rows as usize + 1);
        let mut column_indices = Vec::with_capacity(triples.len());
        let mut values = Vec::with_capacity(triples.len());

        offsets.push(0);
        let mut next_row = 0u32;
        for (row, col, value) in triples {
            while next_row <= row {
                offsets.push(column_indices.len() as u32);
                next_row += 1;
            }
            column_indices.push(col);
            values.push(value);
        }
        while (offsets.len() as u32) <= local_rows {
            offsets.push(column_indices.len() as u32);
        }

        Self { offsets, column_indices, values, local_rows, local_cols }
    }

    /// Number of rows local to this block.
    #[must_use]
    pub fn local_rows(&self) -> u32 {
        self.local_rows
    }

    /// Number of columns local to this block.
    #[must_use]
    pub fn local_cols(&self) -> u32 {
        self.local_cols
    }

    /// Number of stored non-zeros.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Column indices and values of local row `row`, in ascending column
    /// order.
    #[must_use]
    pub fn row(&self, row: u32) -> (&[u32], &[V]) {
        let start = self.offsets[row as usize] as usize;
        let end = self.offsets[row as usize + 1] as usize;
        (&self.column_indices[start..end], &self.values[start..end])
    }

    /// Looks up the value stored at `(row, col)`, if any.
    #[must_use]
    pub fn get(&self, row: u32, col: u32) -> Option<&V> {
        let (cols, vals) = self.row(row);
        cols.binary_search(&col).ok().map(|idx| &vals[idx])
    }

    /// Iterates every stored non-zero as `(row, col, &value)`, in
    /// row-major, ascending-column order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &V)> {
        (0..self.local_rows).flat_map(move |row| {
            let (cols, vals) = self.row(row);
            cols.iter().zip(vals.iter()).map(move |(&c, v)| (row, c, v))
        })
    }

    /// Transposes this block: the result has `local_cols` rows and
    /// `local_rows` columns.
    #[must_use]
    pub fn transpose(&self) -> Self
    where
        V: Clone,
    {
        let triples: Vec<(u32, u32, V)> = self.iter().map(|(r, c, v)| (c, r, v.clone())).collect();
        Self::from_triples(self.local_cols, self.local_rows, triples)
    }

    /// Maps every stored value through `f`, preserving sparsity structure.
    #[must_use]
    pub fn map<W>(&self, mut f: impl FnMut(u32, u32, &V) -> W) -> LocalBlock<W> {
        let values: Vec<W> = self.iter().map(|(r, c, v)| f(r, c, v)).collect();
        LocalBlock {
            offsets: self.offsets.clone(),
            column_indices: self.column_indices.clone(),
            values,
            local_rows: self.local_rows,
            local_cols: self.local_cols,
        }
    }

    /// Keeps only the non-zeros for which `keep` returns `true`, dropping
    /// the rest from the structure entirely (`§4.2` prune).
    #[must_use]
    pub fn prune(&self, mut keep: impl FnMut(u32, u32, &V) -> bool) -> Self
    where
        V: Clone,
    {
        let triples: Vec<(u32, u32, V)> =
            self.iter().filter(|(r, c, v)| keep(*r, *c, v)).map(|(r, c, v)| (r, c, v.clone())).collect();
        Self::from_triples(self.local_rows, self.local_cols, triples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_triples_sorts_and_dedups() {
        let block = LocalBlock::from_triples(2, 2, vec![(1, 0, "b"), (0, 1, "a"), (1, 0, "b-overwritten")]);
        assert_eq!(block.nnz(), 2);
        assert_eq!(block.row(0), (&[1][..], &["a"][..]));
        assert_eq!(block.row(1), (&[0][..], &["b-overwritten"][..]));
    }

    #[test]
    fn transpose_swaps_coordinates() {
        let block = LocalBlock::from_triples(2, 3, vec![(0, 2, 7), (1, 0, 9)]);
        let t = block.transpose();
        assert_eq!(t.local_rows(), 3);
        assert_eq!(t.local_cols(), 2);
        assert_eq!(t.get(2, 0), Some(&7));
        assert_eq!(t.get(0, 1), Some(&9));
    }

    #[test]
    fn prune_drops_filtered_entries() {
        let block = LocalBlock::from_triples(1, 3, vec![(0, 0, 1), (0, 1, 2), (0, 2, 3)]);
        let pruned = block.prune(|_, _, &v| v != 2);
        assert_eq!(pruned.nnz(), 2);
        assert_eq!(pruned.get(0, 1), None);
    }
}
