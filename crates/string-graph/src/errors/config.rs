//! Errors surfaced while parsing and validating CLI-derived configuration.

/// Errors that may occur when building a [`crate::config::Config`] from raw
/// CLI input. Reported on rank 0 to stderr and mapped to a negative exit
/// code by the binary (`§7`); never fatal to the process in the "abort"
/// sense, since nothing has started running yet.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required flag was not supplied.
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),
    /// The k-mer length is zero or exceeds what fits in a packed `u64` (32
    /// bases at 2 bits/base).
    #[error("k-mer length {0} is out of range (expected 1..=32)")]
    InvalidKmerLength(u16),
    /// The stride is zero.
    #[error("k-mer stride must be at least 1")]
    InvalidStride,
    /// `--sc` asked for more seeds per cell than this build supports.
    #[error("requested {requested} seeds per cell but this build retains at most {max}")]
    TooManySeeds {
        /// Value passed to `--sc`.
        requested: usize,
        /// Compile-time [`crate::types::MAX_SEEDS`] ceiling.
        max: usize,
    },
    /// `--alph` named an alphabet this build does not support.
    #[error("unknown alphabet: {0}")]
    UnknownAlphabet(String),
    /// More than one of `--xa`, `--fa`, `--na` was supplied, or none was.
    #[error("exactly one of --xa, --fa, --na must be given")]
    AmbiguousAlignerSelection,
    /// The expected sequence count was zero while the input path was
    /// non-empty, or otherwise nonsensical.
    #[error("expected sequence count must be greater than zero")]
    InvalidSequenceCount,
}
