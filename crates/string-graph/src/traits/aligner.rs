//! The [`Aligner`] capability (`§6` "Aligner contract", `§9`
//! "Polymorphism").

use crate::types::{PosInRead, ReadId};

/// One seed to extend: a pair of reads plus the position in each where a
/// shared k-mer (or pair of k-mers, for the two-seed case) was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPair {
    /// Row-axis read.
    pub read_h: ReadId,
    /// Column-axis read.
    pub read_v: ReadId,
    /// Seed start position on the row-axis read.
    pub begin_h: PosInRead,
    /// Seed start position on the column-axis read.
    pub begin_v: PosInRead,
    /// Length, in bases, of the seed shared by both reads.
    pub seed_length: u32,
}

/// One alignment result: score plus the begin/end positions of the
/// extended alignment on both axes, in the same order as the submitted
/// batch (`§6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentRecord {
    /// Alignment score under `(match=1, mismatch=-1, gapOpen=-1, gapExt=-1)`.
    pub score: i32,
    /// Begin position of the alignment on the row-axis read.
    pub begin_h: PosInRead,
    /// Begin position of the alignment on the column-axis read.
    pub begin_v: PosInRead,
    /// End position (exclusive) of the alignment on the row-axis read.
    pub end_h: PosInRead,
    /// End position (exclusive) of the alignment on the column-axis read.
    pub end_v: PosInRead,
}

/// A batched pairwise aligner, selected once at startup and never swapped
/// mid-run (`§9`). The three shipped variants (`xdrop`, `full`, `none`) do
/// not share state, matching `§9`'s "Variants do not share state."
///
/// # Errors
///
/// Implementations do not fail: an unalignable pair simply scores as a
/// degenerate alignment (e.g. zero length) rather than raising an error,
/// since the caller (`§5`) guarantees the batch itself is well-formed.
pub trait Aligner: Send + Sync {
    /// Extends every seed in `seeds` against the corresponding read pair
    /// and returns one [`AlignmentRecord`] per seed, in the same order.
    ///
    /// `seqs_h[i]`/`seqs_v[i]` are the full base sequences of
    /// `seeds[i].read_h`/`seeds[i].read_v`; the seed gives the starting
    /// point for the extension.
    fn run_batch(
        &self,
        seqs_h: &[&[u8]],
        seqs_v: &[&[u8]],
        seeds: &[SeedPair],
    ) -> Vec<AlignmentRecord>;
}
