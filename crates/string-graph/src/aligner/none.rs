//! `--na`: skip alignment entirely (`§6`).

use crate::traits::aligner::{AlignmentRecord, SeedPair};
use crate::traits::Aligner;

/// Reports each seed back as its own zero-extension alignment: useful for
/// pipelines that only need overlap topology, not alignment scores.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAligner;

impl Aligner for NoAligner {
    fn run_batch(&self, _seqs_h: &[&[u8]], _seqs_v: &[&[u8]], seeds: &[SeedPair]) -> Vec<AlignmentRecord> {
        seeds
            .iter()
            .map(|seed| AlignmentRecord {
                score: 0,
                begin_h: seed.begin_h,
                begin_v: seed.begin_v,
                end_h: seed.begin_h + seed.seed_length,
                end_v: seed.begin_v + seed.seed_length,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_seed_as_zero_length_alignment() {
        let aligner = NoAligner;
        let seeds = [SeedPair { read_h: 0, read_v: 1, begin_h: 5, begin_v: 9, seed_length: 12 }];
        let result = aligner.run_batch(&[], &[], &seeds);
        assert_eq!(result, vec![AlignmentRecord { score: 0, begin_h: 5, begin_v: 9, end_h: 17, end_v: 21 }]);
    }
}
