//! The [`ProcessGrid`] substrate abstraction (`§4.1`, `§5`).
//!
//! A process grid is a √p × √p logical arrangement of participants
//! ("ranks"). This crate never talks to real MPI — no binding for it
//! appears anywhere in the retrieval pack this crate was grounded on — so
//! every collective boundary (row/column broadcast inside SUMMA, the
//! barrier between pipeline stages, the rank-ordered collective write of a
//! Matrix Market file) is expressed through this trait instead, with one
//! in-process implementation ([`crate::impls::grid::ThreadGrid`]) standing
//! in for a real deployment's MPI-backed one.

use crate::errors::PipelineError;

/// A √p × √p logical process grid plus the handful of collective
/// operations the rest of the crate needs from it.
///
/// Every method here is a synchronization point (`§5`): callers must not
/// assume any ordering between ranks except what the method itself
/// guarantees.
pub trait ProcessGrid: Send + Sync {
    /// Total number of logical ranks, `p`.
    fn world_size(&self) -> usize;

    /// Side of the logical process grid, `√p`.
    fn grid_side(&self) -> usize;

    /// Maps a flat rank id to its `(row, column)` coordinates in the grid.
    fn coordinates_of(&self, rank: usize) -> (usize, usize);

    /// Maps `(row, column)` grid coordinates back to a flat rank id.
    fn rank_of(&self, row: usize, column: usize) -> usize;

    /// A pure synchronization point with no payload: every participant
    /// must reach it before any participant proceeds. Used between
    /// pipeline stages (`§5`: "every collective… is a synchronization
    /// point").
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Collective`] if a participant panicked
    /// while producing work that was meant to complete before the
    /// barrier; per `§7` this is always fatal.
    fn barrier(&self) -> Result<(), PipelineError>;

    /// Runs `per_rank` once for every rank, in parallel, and returns the
    /// results ordered by rank id. This is the grid's one genuinely
    /// "collective" data-producing primitive: it is how
    /// [`crate::mm::parallel_write_mm`] assembles a deterministic,
    /// rank-ordered output stream from per-rank local data.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Collective`] if any rank's closure
    /// panicked.
    fn collect_in_rank_order<T, F>(&self, per_rank: F) -> Result<Vec<T>, PipelineError>
    where
        T: Send,
        F: Fn(usize) -> T + Sync;
}
