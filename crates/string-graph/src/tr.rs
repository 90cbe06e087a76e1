//! The transitive-reduction fixed-point driver (`§4.5`).

use tracing::{debug, info, instrument};

use crate::impls::dist_matrix::DistMatrix;
use crate::reads::ReadTable;
use crate::semirings::kmer_intersection::CommonKmers;
use crate::semirings::overlap_path::{MinPlusSemiring, OverlapPath};
use crate::spgemm::spgemm;
use crate::types::MAXITER;

/// Both matrices the driver produces: the symmetrized-but-not-yet-reduced
/// overlap graph (`R` after step 1) and the final transitively-reduced
/// string graph (`R` after step 4). `§6` calls for writing both as
/// separate Matrix Market files.
#[derive(Debug, Clone)]
pub struct TransitiveReductionOutput {
    /// The symmetric overlap graph, before any edge has been removed.
    pub symmetric_overlap_graph: DistMatrix<CommonKmers>,
    /// The post-reduction string graph.
    pub string_graph: DistMatrix<CommonKmers>,
}

/// Symmetrizes `matrix` by computing its structural transpose, reflecting
/// each cell's payload against both reads' lengths, then combining with
/// the original via `keep_valid_side` (`§4.5` step 1).
fn symmetrize(matrix: &DistMatrix<CommonKmers>, reads: &ReadTable) -> DistMatrix<CommonKmers> {
    let transposed = matrix.transpose().apply(|new_row, new_col, cell| {
        cell.transposed(reads.sequence(new_col).len() as u32, reads.sequence(new_row).len() as u32)
    });
    matrix.ewise_apply(&transposed, |a, b| match (a, b) {
        (Some(x), Some(y)) => Some(x.keep_valid_side(*y)),
        (Some(x), None) => Some(*x),
        (None, Some(y)) => Some(*y),
        (None, None) => None,
    })
}

/// Symmetrizes a boolean mask: `(i, j)` is present in the result iff
/// either `(i, j)` or `(j, i)` was present in `mask` (`§4.5` step 3d).
fn symmetrize_bool(mask: &DistMatrix<bool>) -> DistMatrix<bool> {
    let transposed = mask.transpose();
    mask.ewise_apply(&transposed, |a, b| if a.is_some() || b.is_some() { Some(true) } else { None })
}

/// Runs the fixed-point loop to completion and applies the removal,
/// given an already-symmetrized `r` (`§4.5` steps 2-4).
#[instrument(skip_all)]
fn run_fixed_point(r: &DistMatrix<CommonKmers>, fuzz: u32) -> DistMatrix<CommonKmers> {
    let mut p: DistMatrix<OverlapPath> = r.apply(|_, _, cell| OverlapPath::from_edge(cell));
    let mut t: DistMatrix<bool> = DistMatrix::empty(r.n_rows(), r.n_cols(), r.grid_side());
    let f = r.apply(|_, _, cell| cell.with_fuzz(fuzz));

    let mut previous_nnz = t.nnz();
    let mut idle_iterations = 0usize;
    let mut iteration = 0usize;

    while idle_iterations < MAXITER {
        iteration += 1;
        let n = spgemm::<MinPlusSemiring>(&p, r).prune(|_, _, path| !path.is_identity());

        let i_mask: DistMatrix<bool> = f.ewise_apply(&n, |f_cell, n_cell| match (f_cell, n_cell) {
            (Some(edge), Some(path)) if edge.dir >= 0 => {
                let direction = edge.dir as usize;
                (edge.sfx >= path.sfx[direction]).then_some(true)
            }
            _ => None,
        });
        let i_sym = symmetrize_bool(&i_mask);
        t = t.ewise_apply(&i_sym, |a, b| if a.is_some() || b.is_some() { Some(true) } else { None });

        p = n;

        let nnz = t.nnz();
        if nnz == previous_nnz {
            idle_iterations += 1;
        } else {
            idle_iterations = 0;
            previous_nnz = nnz;
        }
        debug!(iteration, t_nnz = nnz, idle_iterations, "transitive reduction iteration");
    }

    info!(iterations = iteration, marked = t.nnz(), "transitive reduction fixed point reached");

    let reduced = r.ewise_apply(&t, |cell, marked| match (cell, marked) {
        (Some(edge), Some(_)) => {
            let mut edge = *edge;
            edge.invalidate();
            Some(edge)
        }
        (Some(edge), None) => Some(*edge),
        (None, _) => None,
    });
    reduced.prune(|_, _, edge| !edge.is_invalid())
}

/// Runs the full transitive-reduction pipeline stage: symmetrize the
/// input overlap graph, iterate the min-plus fixed point, then apply the
/// removal (`§4.5`).
#[must_use]
pub fn transitive_reduction(overlap_graph: &DistMatrix<CommonKmers>, reads: &ReadTable, fuzz: u32) -> TransitiveReductionOutput {
    let symmetric_overlap_graph = symmetrize(overlap_graph, reads);
    let string_graph = run_fixed_point(&symmetric_overlap_graph, fuzz);
    TransitiveReductionOutput { symmetric_overlap_graph, string_graph }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reads_of_lengths(lengths: &[usize]) -> ReadTable {
        ReadTable::from_records(lengths.iter().enumerate().map(|(i, &len)| (format!("r{i}"), vec![b'A'; len])).collect())
    }

    fn edge(dir: i8, sfx: u32, sfx_t: u32) -> CommonKmers {
        CommonKmers { dir, dir_t: dir, sfx, sfx_t, begin_h: 0, end_h: sfx, begin_v: 0, end_v: sfx_t, ..CommonKmers::default() }
    }

    #[test]
    fn symmetrize_fills_in_missing_transpose_cell() {
        let reads = reads_of_lengths(&[20, 20]);
        let r = DistMatrix::from_global_triples(2, 2, 1, vec![(0, 1, edge(0, 10, 10))]);
        let symmetric = symmetrize(&r, &reads);
        assert!(symmetric.block(0, 0).get(1, 0).is_some());
    }

    #[test]
    fn two_hop_dominated_edge_is_removed() {
        // A direct 0->1 edge with suffix 30 is dominated by the two-hop
        // path 0->2->1 whose legs sum to 10 + 10 = 20 < 30, so transitive
        // reduction should drop the direct edge and keep the two legs.
        // All three edges share dir=0 (tail=0, head=0) so the two-hop
        // chain lands in the same directional slot as the direct edge.
        let reads = reads_of_lengths(&[40, 40, 40]);
        let direct = edge(0, 30, 30);
        let leg_a = edge(0, 10, 10); // 0 -> 2
        let leg_b = edge(0, 10, 10); // 2 -> 1
        let r0 = DistMatrix::from_global_triples(
            3,
            3,
            1,
            vec![(0, 1, direct), (0, 2, leg_a), (2, 1, leg_b)],
        );
        let result = transitive_reduction(&r0, &reads, 5);
        assert!(result.string_graph.block(0, 0).get(0, 1).is_none(), "dominated direct edge should have been removed");
        assert!(result.string_graph.block(0, 0).get(0, 2).is_some(), "supporting two-hop leg should survive");
    }

    proptest::proptest! {
        /// `symmetrize(symmetrize(R)) = symmetrize(R)` (`§8` round-trip law
        /// 2): a graph that has already had its missing transpose cells
        /// filled in is a fixed point of another pass.
        #[test]
        fn symmetrize_is_idempotent(dir in 0i8..=3, sfx in 0u32..40, sfx_t in 0u32..40) {
            let reads = reads_of_lengths(&[40, 40]);
            let r = DistMatrix::from_global_triples(2, 2, 1, vec![(0, 1, edge(dir, sfx, sfx_t))]);
            let once = symmetrize(&r, &reads);
            let twice = symmetrize(&once, &reads);
            proptest::prop_assert_eq!(once, twice);
        }
    }
}
