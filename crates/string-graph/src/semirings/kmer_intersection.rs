//! `CommonKmers`, the payload of `B = A·Aᵀ`, and the semiring used to build
//! it (`§4.3`).

use crate::traits::{AlignmentRecord, Semiring};
use crate::types::{PosInRead, MAX_SEEDS};

/// A non-zero cell of `B` (or, once enriched, of `R`/`P`): up to
/// [`MAX_SEEDS`] pairs of shared k-mer positions, plus — after the aligner
/// has run — the alignment endpoints and the two directional suffix
/// lengths that drive transitive reduction (`§3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonKmers {
    /// Shared k-mer position pairs `(posH, posV)`, sorted ascending, with
    /// unused slots `None`.
    pub seeds: [Option<(PosInRead, PosInRead)>; MAX_SEEDS],
    /// Number of populated slots in `seeds`.
    pub count: u8,
    /// Alignment score, valid once the aligner has enriched this cell.
    pub score: i32,
    /// Alignment begin position on the row-axis read.
    pub begin_h: PosInRead,
    /// Alignment end position (exclusive) on the row-axis read.
    pub end_h: PosInRead,
    /// Alignment begin position on the column-axis read.
    pub begin_v: PosInRead,
    /// Alignment end position (exclusive) on the column-axis read.
    pub end_v: PosInRead,
    /// Suffix length in the canonical `(row, col)` direction.
    pub sfx: u32,
    /// Suffix length in the transposed `(col, row)` direction.
    pub sfx_t: u32,
    /// Orientation in `{-1, 0, 1, 2, 3}`; `-1` means "invalid" (removed by
    /// transitive reduction or never assigned).
    pub dir: i8,
    /// Orientation of the transposed view, same domain as `dir`.
    pub dir_t: i8,
    /// Whether the alignment used the reverse complement of the
    /// column-axis read.
    pub reverse_complement: bool,
    /// Whether this cell was produced by transposing another cell.
    pub transpose: bool,
}

impl Default for CommonKmers {
    fn default() -> Self {
        Self {
            seeds: [None; MAX_SEEDS],
            count: 0,
            score: 0,
            begin_h: 0,
            end_h: 0,
            begin_v: 0,
            end_v: 0,
            sfx: 0,
            sfx_t: 0,
            dir: -1,
            dir_t: -1,
            reverse_complement: false,
            transpose: false,
        }
    }
}

impl CommonKmers {
    /// Whether this cell has been marked invalid by transitive reduction
    /// (or never received a direction at all).
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.dir == -1
    }

    /// Derives `(tail, head)` indicators from `dir`, as the min-plus
    /// semiring's `arrows()` helper (`§4.4`). Returns `None` for an
    /// invalid edge.
    #[must_use]
    pub fn arrows(&self) -> Option<(u8, u8)> {
        if self.dir < 0 {
            return None;
        }
        let d = self.dir as u8;
        Some((d >> 1, d & 1))
    }

    /// Reflects this cell's coordinate-dependent fields against both
    /// reads' lengths, swapping `sfx ↔ sfx_t`, `dir ↔ dir_t`, and flipping
    /// `transpose` — the payload half of `§4.5` step 1's symmetrize
    /// (`RT.Apply(TransposeSRing())` in the system this was distilled
    /// from). The seed pairs are swapped component-wise since the row and
    /// column axes have traded places.
    #[must_use]
    pub fn transposed(&self, row_read_len: PosInRead, col_read_len: PosInRead) -> Self {
        let mut seeds = [None; MAX_SEEDS];
        for (slot, seed) in seeds.iter_mut().zip(self.seeds.iter()) {
            *slot = seed.map(|(h, v)| (v, h));
        }
        Self {
            seeds,
            count: self.count,
            score: self.score,
            begin_h: col_read_len.saturating_sub(self.end_v),
            end_h: col_read_len.saturating_sub(self.begin_v),
            begin_v: row_read_len.saturating_sub(self.end_h),
            end_v: row_read_len.saturating_sub(self.begin_h),
            sfx: self.sfx_t,
            sfx_t: self.sfx,
            dir: self.dir_t,
            dir_t: self.dir,
            reverse_complement: self.reverse_complement,
            transpose: !self.transpose,
        }
    }

    /// Adds [`crate::types::DEFAULT_FUZZ`]-style slack to both suffix
    /// lengths, used to build `F` from `R` (`§4.5` step 2).
    #[must_use]
    pub fn with_fuzz(&self, fuzz: u32) -> Self {
        Self { sfx: self.sfx.saturating_add(fuzz), sfx_t: self.sfx_t.saturating_add(fuzz), ..*self }
    }

    /// Combines this cell with its transpose when symmetrizing `R`,
    /// keeping whichever side is valid (`§4.5` step 1). If both are
    /// valid, keeps `self` — alignment is deterministic and the two sides
    /// of a correctly-built graph should already agree.
    #[must_use]
    pub fn keep_valid_side(self, other: Self) -> Self {
        if self.is_invalid() && !other.is_invalid() { other } else { self }
    }

    /// Marks this edge invalid, as transitive reduction's removal step
    /// does (`§3` invariant 4).
    pub fn invalidate(&mut self) {
        self.dir = -1;
    }

    /// Folds a completed alignment into this cell, deriving `dir`/`dir_t`
    /// and the two suffix lengths from which end of each read the
    /// alignment reaches (`§3`, `§6` "Aligner contract"). Convention: bit
    /// 0 of `dir` is 0 when the alignment starts at the row read's first
    /// base (so any overhang trails off its tail) and 1 when it instead
    /// ends at the row read's last base (so any overhang leads in before
    /// its head); bit 1 follows the same rule for the column read. This
    /// keeps `dir`/`dir_t` consistent with [`CommonKmers::transposed`],
    /// which swaps exactly these two bits when it reflects a cell onto
    /// the opposite axis.
    #[must_use]
    pub fn enrich(&self, alignment: &AlignmentRecord, row_read_len: PosInRead, col_read_len: PosInRead, reverse_complement: bool) -> Self {
        let bit_h = u8::from(alignment.begin_h != 0);
        let bit_v = u8::from(alignment.begin_v != 0);
        let sfx = if bit_h == 0 { row_read_len.saturating_sub(alignment.end_h) } else { alignment.begin_h };
        let sfx_t = if bit_v == 0 { col_read_len.saturating_sub(alignment.end_v) } else { alignment.begin_v };
        Self {
            score: alignment.score,
            begin_h: alignment.begin_h,
            end_h: alignment.end_h,
            begin_v: alignment.begin_v,
            end_v: alignment.end_v,
            sfx,
            sfx_t,
            dir: (2 * bit_h + bit_v) as i8,
            dir_t: (2 * bit_v + bit_h) as i8,
            reverse_complement,
            ..*self
        }
    }
}

/// Squared Euclidean distance between two seed positions, used to pick the
/// two most geometrically separated seeds when more than
/// [`MAX_SEEDS`] candidates are available.
fn separation((h1, v1): (PosInRead, PosInRead), (h2, v2): (PosInRead, PosInRead)) -> u64 {
    let dh = i64::from(h1) - i64::from(h2);
    let dv = i64::from(v1) - i64::from(v2);
    (dh * dh + dv * dv) as u64
}

/// The k-mer intersection semiring used for `B = A · Aᵀ` (`§4.3`).
///
/// `multiply` pairs a row-read's k-mer position with a column-read's
/// k-mer position into a single-seed [`CommonKmers`]; `add` merges two
/// cells, retaining at most [`MAX_SEEDS`] pairs chosen to maximize
/// geometric separation, with ties broken by ascending `(posH, posV)`
/// order (Open Question 3, resolved in `DESIGN.md`).
pub struct KmerIntersectionSemiring;

impl Semiring for KmerIntersectionSemiring {
    type Left = PosInRead;
    type Right = PosInRead;
    type Output = CommonKmers;

    fn id() -> Self::Output {
        CommonKmers::default()
    }

    fn add(a: Self::Output, b: Self::Output) -> Self::Output {
        debug_assert_eq!(MAX_SEEDS, 2, "the S=2 merge rule below is specialized for MAX_SEEDS == 2");

        let mut candidates: Vec<(PosInRead, PosInRead)> =
            a.seeds.into_iter().chain(b.seeds).flatten().collect();
        candidates.sort_unstable();
        candidates.dedup();

        let mut merged = CommonKmers::default();
        if candidates.len() <= MAX_SEEDS {
            for (slot, c) in merged.seeds.iter_mut().zip(candidates.iter()) {
                *slot = Some(*c);
            }
            merged.count = candidates.len() as u8;
            return merged;
        }

        let mut best: Option<(usize, usize, u64)> = None;
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                let d = separation(candidates[i], candidates[j]);
                if best.is_none_or(|(_, _, best_d)| d > best_d) {
                    best = Some((i, j, d));
                }
            }
        }
        let (i, j, _) = best.expect("candidates.len() > MAX_SEEDS >= 2 implies at least one pair");
        merged.seeds[0] = Some(candidates[i]);
        merged.seeds[1] = Some(candidates[j]);
        merged.count = 2;
        merged
    }

    fn multiply(a: &Self::Left, b: &Self::Right) -> Self::Output {
        let mut cell = CommonKmers::default();
        cell.seeds[0] = Some((*a, *b));
        cell.count = 1;
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(h: PosInRead, v: PosInRead) -> CommonKmers {
        KmerIntersectionSemiring::multiply(&h, &v)
    }

    #[test]
    fn add_keeps_all_when_at_or_below_capacity() {
        let merged = KmerIntersectionSemiring::add(single(10, 20), single(30, 40));
        assert_eq!(merged.count, 2);
        assert_eq!(merged.seeds, [Some((10, 20)), Some((30, 40))]);
    }

    #[test]
    fn add_keeps_most_separated_pair() {
        // Five shared k-mers at 10,50,90,130,170 (scenario S6): merge down to
        // one seed each then fold pairwise, finally retaining the two most
        // distant positions (10 and 170).
        let positions = [10, 50, 90, 130, 170];
        let mut acc = KmerIntersectionSemiring::id();
        for p in positions {
            acc = KmerIntersectionSemiring::add(acc, single(p, p));
        }
        assert_eq!(acc.count, 2);
        assert_eq!(acc.seeds, [Some((10, 10)), Some((170, 170))]);
    }

    #[test]
    fn add_tie_breaks_lexicographically() {
        // Four candidates at the corners of a square: both diagonals
        // ((0,0)-(10,10) and (0,10)-(10,0)) tie for maximum separation.
        // The lexicographically-first pair in ascending-sorted candidate
        // order wins deterministically.
        let a = KmerIntersectionSemiring::add(single(0, 0), single(10, 0));
        let b = KmerIntersectionSemiring::add(single(0, 10), single(10, 10));
        let merged = KmerIntersectionSemiring::add(a, b);
        assert_eq!(merged.count, 2);
        assert_eq!(merged.seeds, [Some((0, 0)), Some((10, 10))]);
    }

    #[test]
    fn enrich_prefix_overlap_is_tail_on_both_axes() {
        // The alignment starts at base 0 on both reads, so any overhang
        // trails off each read's tail: dir = 0, sfx/sfx_t are the
        // remaining unaligned suffix of each read.
        let cell = single(5, 5);
        let alignment = AlignmentRecord { score: 38, begin_h: 0, end_h: 40, begin_v: 0, end_v: 40 };
        let enriched = cell.enrich(&alignment, 100, 100, false);
        assert_eq!(enriched.dir, 0);
        assert_eq!(enriched.dir_t, 0);
        assert_eq!(enriched.sfx, 60);
        assert_eq!(enriched.sfx_t, 60);
        assert_eq!(enriched.score, 38);
        assert!(!enriched.reverse_complement);
    }

    #[test]
    fn enrich_suffix_overlap_is_head_on_both_axes() {
        // The alignment ends at each read's last base, so the overhang
        // leads in before the head: bit set on both axes, dir = 3.
        let cell = single(90, 90);
        let alignment = AlignmentRecord { score: 20, begin_h: 80, end_h: 100, begin_v: 80, end_v: 100 };
        let enriched = cell.enrich(&alignment, 100, 100, false);
        assert_eq!(enriched.dir, 3);
        assert_eq!(enriched.dir_t, 3);
        assert_eq!(enriched.sfx, 80);
        assert_eq!(enriched.sfx_t, 80);
    }

    #[test]
    fn enrich_mixed_orientation_swaps_dir_and_dir_t_consistently() {
        // Row axis hits the tail (begins at 0), column axis hits the head
        // (ends at its last base): dir = 2*0 + 1 = 1, dir_t = 2*1 + 0 = 2,
        // matching the bit-swap `transposed` performs for the same shape.
        let cell = single(5, 95);
        let alignment = AlignmentRecord { score: 15, begin_h: 0, end_h: 30, begin_v: 70, end_v: 100 };
        let enriched = cell.enrich(&alignment, 100, 100, true);
        assert_eq!(enriched.dir, 1);
        assert_eq!(enriched.dir_t, 2);
        assert_eq!(enriched.sfx, 70);
        assert_eq!(enriched.sfx_t, 70);
        assert!(enriched.reverse_complement);
    }
}
