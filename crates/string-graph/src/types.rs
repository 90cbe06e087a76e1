//! Shared scalar type aliases and tunable constants.
//!
//! These are pulled out of the data-model submodules so that every
//! component agrees on the same concrete widths without importing each
//! other's internals.

/// Globally unique identifier of a read, stable across the whole run.
pub type ReadId = u32;

/// Packed k-mer value (2 bits per base, so `k <= 32` for the DNA alphabet).
pub type KmerId = u64;

/// Non-negative position of a k-mer (or alignment endpoint) within a read.
pub type PosInRead = u32;

/// Sentinel standing in for "+infinity" in [`crate::semirings::overlap_path::OverlapPath`].
pub const INFINITY: u32 = u32::MAX;

/// Maximum number of seed-position pairs retained per [`crate::semirings::kmer_intersection::CommonKmers`]
/// cell. The spec's `--sc` default is 2; this crate fixes the storage at
/// compile time rather than growing a heap allocation per cell, since `2` is
/// the only value exercised by the documented scenarios (see
/// `DESIGN.md`, Open Question 3).
pub const MAX_SEEDS: usize = 2;

/// Slack, in base pairs, added to `R`'s suffix lengths to build `F` before
/// transitive selection (`§4.5` step 2).
pub const DEFAULT_FUZZ: u32 = 10;

/// Number of consecutive idle iterations (no change in `T.nnz`) before the
/// transitive-reduction fixed-point loop terminates.
pub const MAXITER: usize = 15;

/// Default number of alignments submitted to the aligner in one batch per
/// simulated device, mirroring `original_source/LoganGPU/RunLoganAligner.cpp`'s
/// `BATCH_SIZE` load-balancing constant.
pub const BATCH_SIZE: usize = 100_000;
