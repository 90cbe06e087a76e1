//! The immutable configuration record built once at startup and threaded
//! through every pipeline stage (`§4.8`, `§9` "Global mutable state").
//!
//! Ported field-for-field from `original_source/src/main.cpp`'s global
//! variable list into a single struct with no interior mutability: once
//! built, a `Config` never changes, and every stage takes it by shared
//! reference.

use std::path::PathBuf;

use crate::errors::ConfigError;
use crate::types::MAX_SEEDS;

/// Sequence alphabet the input reads are drawn from. Only DNA is
/// supported end to end (`§4.3`'s packed-`u64` k-mer encoding is
/// 2-bits-per-base and has no other alphabet's encoding defined).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    /// `{A, C, G, T}`, 2 bits per base.
    Dna,
}

/// Which aligner variant enriches overlap candidates with alignment
/// endpoints (`§6` "Aligner contract", `§9` "Polymorphism").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignerKind {
    /// X-drop banded extension with the given drop threshold.
    XDrop {
        /// Score drop, relative to the best score seen so far, at which
        /// extension along a diagonal stops.
        threshold: i32,
    },
    /// Full dynamic-programming extension, no early termination.
    Full,
    /// No alignment: seeds are reported as-is with a zero-length
    /// alignment, for pipelines that only need overlap topology.
    None,
}

/// Scoring scheme for the aligner: `(match, mismatch, gapOpen, gapExt)`
/// (`§6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringScheme {
    /// Reward for a matching base pair.
    pub match_score: i32,
    /// Penalty for a mismatching base pair.
    pub mismatch_score: i32,
    /// Penalty for opening a gap.
    pub gap_open: i32,
    /// Penalty for extending an already-open gap.
    pub gap_extend: i32,
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self { match_score: 1, mismatch_score: -1, gap_open: -1, gap_extend: -1 }
    }
}

/// The immutable configuration for one pipeline run (`§4.8`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// FASTA input path (`-i`).
    pub input_file: PathBuf,
    /// Expected sequence count (`-c`), used to size distributed
    /// structures up front.
    pub sequence_count: u32,
    /// K-mer length (`-k`).
    pub kmer_length: u16,
    /// K-mer stride (`-s`, default 1).
    pub kmer_stride: u32,
    /// Max seeds retained per overlap cell (`--sc`, default 2). Must
    /// equal [`MAX_SEEDS`] (Open Question 3, `DESIGN.md`).
    pub max_seeds: usize,
    /// Alignment scoring scheme (`--ma`, `--mi`, `-g`, `-e`).
    pub scoring: ScoringScheme,
    /// Selected aligner (`--xa`, `--fa`, `--na`; exactly one of the three
    /// flags is accepted).
    pub aligner: AlignerKind,
    /// Index-map file path (`--idxmap`), required.
    pub idx_map_file: PathBuf,
    /// Input alphabet (`--alph`).
    pub alphabet: Alphabet,
}

impl Config {
    /// Validates the fields that a CLI parser cannot check by
    /// construction alone (`§7` "Configuration errors").
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kmer_length == 0 || self.kmer_length > 32 {
            return Err(ConfigError::InvalidKmerLength(self.kmer_length));
        }
        if self.kmer_stride == 0 {
            return Err(ConfigError::InvalidStride);
        }
        if self.max_seeds != MAX_SEEDS {
            return Err(ConfigError::TooManySeeds { requested: self.max_seeds, max: MAX_SEEDS });
        }
        if self.sequence_count == 0 {
            return Err(ConfigError::InvalidSequenceCount);
        }
        Ok(())
    }
}
