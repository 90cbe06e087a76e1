//! In-process [`ProcessGrid`] implementations.

use rayon::prelude::*;

use crate::errors::PipelineError;
use crate::traits::ProcessGrid;

/// A degenerate `1 × 1` grid, for tests and small single-rank runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleRankGrid;

impl ProcessGrid for SingleRankGrid {
    fn world_size(&self) -> usize {
        1
    }

    fn grid_side(&self) -> usize {
        1
    }

    fn coordinates_of(&self, _rank: usize) -> (usize, usize) {
        (0, 0)
    }

    fn rank_of(&self, _row: usize, _column: usize) -> usize {
        0
    }

    fn barrier(&self) -> Result<(), PipelineError> {
        Ok(())
    }

    fn collect_in_rank_order<T, F>(&self, per_rank: F) -> Result<Vec<T>, PipelineError>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        Ok(vec![per_rank(0)])
    }
}

/// A `grid_side × grid_side` grid whose ranks are simulated as `rayon`
/// tasks rather than real MPI processes (`DESIGN.md`). Since every rank's
/// data already lives in this one process's memory, [`ThreadGrid::barrier`]
/// is a no-op: every rank is already synchronized with every other by
/// virtue of sharing a call stack. The one place genuine concurrency
/// matters is [`ThreadGrid::collect_in_rank_order`], which actually runs
/// each rank's closure on a `rayon` worker thread and reports a panicked
/// rank as a [`PipelineError::Collective`] rather than unwinding across
/// the collective boundary.
#[derive(Debug, Clone, Copy)]
pub struct ThreadGrid {
    grid_side: usize,
}

impl ThreadGrid {
    /// Builds a grid with the given side length. Panics if `grid_side` is
    /// zero, since a grid with no ranks cannot own any data.
    #[must_use]
    pub fn new(grid_side: usize) -> Self {
        assert!(grid_side >= 1, "a process grid needs at least one rank");
        Self { grid_side }
    }
}

impl ProcessGrid for ThreadGrid {
    fn world_size(&self) -> usize {
        self.grid_side * self.grid_side
    }

    fn grid_side(&self) -> usize {
        self.grid_side
    }

    fn coordinates_of(&self, rank: usize) -> (usize, usize) {
        (rank / self.grid_side, rank % self.grid_side)
    }

    fn rank_of(&self, row: usize, column: usize) -> usize {
        row * self.grid_side + column
    }

    fn barrier(&self) -> Result<(), PipelineError> {
        Ok(())
    }

    fn collect_in_rank_order<T, F>(&self, per_rank: F) -> Result<Vec<T>, PipelineError>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        (0..self.world_size())
            .into_par_iter()
            .map(|rank| {
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| per_rank(rank)))
                    .map_err(|_| PipelineError::Collective(format!("rank {rank} panicked")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_round_trip() {
        let grid = ThreadGrid::new(3);
        for rank in 0..grid.world_size() {
            let (row, col) = grid.coordinates_of(rank);
            assert_eq!(grid.rank_of(row, col), rank);
        }
    }

    #[test]
    fn collect_in_rank_order_is_ordered() {
        let grid = ThreadGrid::new(4);
        let results = grid.collect_in_rank_order(|rank| rank * 2).unwrap();
        let expected: Vec<usize> = (0..grid.world_size()).map(|rank| rank * 2).collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn collect_in_rank_order_reports_panics() {
        let grid = ThreadGrid::new(2);
        let err = grid.collect_in_rank_order(|rank| {
            if rank == 2 {
                panic!("boom");
            }
            rank
        });
        assert!(err.is_err());
    }
}
