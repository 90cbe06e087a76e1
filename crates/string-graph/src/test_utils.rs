//! Builders for the literal end-to-end scenarios in `§8`, shared between
//! this crate's own tests and the integration test suite.

use crate::impls::dist_matrix::DistMatrix;
use crate::reads::ReadTable;
use crate::semirings::kmer_intersection::CommonKmers;
use crate::types::ReadId;

/// Builds a [`ReadTable`] of reads with the given lengths and an
/// arbitrary (but valid) base sequence — the TR driver only consults read
/// *lengths* via [`ReadTable::sequence`], never base content.
#[must_use]
pub fn reads_of_lengths(lengths: &[usize]) -> ReadTable {
    ReadTable::from_records(lengths.iter().enumerate().map(|(i, &len)| (format!("scenario-read-{i}"), vec![b'A'; len])).collect())
}

/// One directed overlap edge to seed a scenario's overlap graph with:
/// `(row, col, dir, sfx, sfx_t)`.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioEdge {
    /// Row-axis read.
    pub row: ReadId,
    /// Column-axis read.
    pub col: ReadId,
    /// Orientation, `{-1, 0, 1, 2, 3}`.
    pub dir: i8,
    /// Suffix length in the canonical direction.
    pub sfx: u32,
    /// Suffix length in the transposed direction.
    pub sfx_t: u32,
}

impl ScenarioEdge {
    /// Shorthand for the common case of a single directional suffix
    /// length shared by both sides (every `§8` scenario uses this).
    #[must_use]
    pub fn new(row: ReadId, col: ReadId, dir: i8, sfx: u32) -> Self {
        Self { row, col, dir, sfx, sfx_t: sfx }
    }
}

/// Builds a `DistMatrix<CommonKmers>` directly from scenario edges,
/// skipping k-mer enumeration and alignment entirely — `§8`'s scenarios
/// specify suffix lengths directly, as if the aligner had already run.
#[must_use]
pub fn overlap_graph_from_edges(read_count: u32, grid_side: usize, edges: &[ScenarioEdge]) -> DistMatrix<CommonKmers> {
    let triples = edges
        .iter()
        .map(|e| {
            let mut cell = CommonKmers { dir: e.dir, dir_t: e.dir, sfx: e.sfx, sfx_t: e.sfx_t, ..CommonKmers::default() };
            cell.end_h = cell.sfx;
            cell.end_v = cell.sfx_t;
            (e.row, e.col, cell)
        })
        .collect();
    DistMatrix::from_global_triples(read_count, read_count, grid_side, triples)
}

/// *Scenario S1* (`§8`): a linear chain R0-R1-R2, each direct overlap
/// suffix 40, with a direct R0-R2 edge of suffix 80 that an un-reduced
/// graph would otherwise keep.
#[must_use]
pub fn scenario_s1() -> (ReadTable, DistMatrix<CommonKmers>) {
    let reads = reads_of_lengths(&[100, 100, 100]);
    let graph = overlap_graph_from_edges(
        3,
        1,
        &[ScenarioEdge::new(0, 1, 0, 40), ScenarioEdge::new(1, 2, 0, 40), ScenarioEdge::new(0, 2, 0, 80)],
    );
    (reads, graph)
}

/// *Scenario S2* (`§8`): same topology as S1 but the direct R0-R2 suffix
/// is 75 — whether it survives depends on `fuzz`.
#[must_use]
pub fn scenario_s2() -> (ReadTable, DistMatrix<CommonKmers>) {
    let reads = reads_of_lengths(&[100, 100, 100]);
    let graph = overlap_graph_from_edges(
        3,
        1,
        &[ScenarioEdge::new(0, 1, 0, 40), ScenarioEdge::new(1, 2, 0, 40), ScenarioEdge::new(0, 2, 0, 75)],
    );
    (reads, graph)
}

/// *Scenario S3* (`§8`): two disconnected overlapping pairs.
#[must_use]
pub fn scenario_s3() -> (ReadTable, DistMatrix<CommonKmers>) {
    let reads = reads_of_lengths(&[100, 100, 100, 100]);
    let graph = overlap_graph_from_edges(4, 1, &[ScenarioEdge::new(0, 1, 0, 40), ScenarioEdge::new(2, 3, 0, 40)]);
    (reads, graph)
}

/// *Scenario S4* (`§8`): a four-read chain where every pair along the
/// chain shares a direct overlap (as long reads spanning several tile
/// positions would), so `B` already holds both the adjacent-step edges
/// and the two- and three-step ones that later get pruned.
#[must_use]
pub fn scenario_s4() -> (ReadTable, DistMatrix<CommonKmers>) {
    let reads = reads_of_lengths(&[100, 100, 100, 100]);
    let graph = overlap_graph_from_edges(
        4,
        1,
        &[
            ScenarioEdge::new(0, 1, 0, 30),
            ScenarioEdge::new(1, 2, 0, 30),
            ScenarioEdge::new(2, 3, 0, 30),
            ScenarioEdge::new(0, 2, 0, 60),
            ScenarioEdge::new(1, 3, 0, 60),
            ScenarioEdge::new(0, 3, 0, 90),
        ],
    );
    (reads, graph)
}

/// *Scenario S5* (`§8`): a pair of reads whose overlap graph is already
/// transitively reduced (a single direct edge, no alternate path), used to
/// check that running reduction again is a no-op.
#[must_use]
pub fn scenario_s5() -> (ReadTable, DistMatrix<CommonKmers>) {
    let reads = reads_of_lengths(&[100, 100]);
    let graph = overlap_graph_from_edges(2, 1, &[ScenarioEdge::new(0, 1, 0, 40)]);
    (reads, graph)
}

/// *Scenario S6* (`§8`): five shared k-mer positions, from which the
/// k-mer intersection semiring should retain only the two most distant.
#[must_use]
pub fn scenario_s6_positions() -> [crate::types::PosInRead; 5] {
    [10, 50, 90, 130, 170]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s1_has_expected_edges() {
        let (_, graph) = scenario_s1();
        assert_eq!(graph.nnz(), 3);
        assert_eq!(graph.block(0, 0).get(0, 2).unwrap().sfx, 80);
    }
}
