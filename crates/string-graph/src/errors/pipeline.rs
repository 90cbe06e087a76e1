//! Errors surfaced once the pipeline is actually running.
//!
//! Per `§7`, none of these are locally recoverable: the caller's only
//! correct response is to abort the job with a diagnostic. They exist as a
//! typed enum (rather than a bare `anyhow::Error`) so library code stays
//! explicit about failure modes even though the binary crate ultimately
//! flattens them with `anyhow::Context`.

/// Fatal errors raised while running the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Opening, reading, or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path that was being read or written.
        path: std::path::PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },
    /// The FASTA or index-map file was present but malformed.
    #[error("malformed input at {path}: {reason}")]
    MalformedInput {
        /// Path of the offending file.
        path: std::path::PathBuf,
        /// Human-readable description of what was wrong.
        reason: String,
    },
    /// A simulated collective (broadcast, barrier, all-reduce) observed a
    /// participant count mismatch or a panicked worker. Stands in for an
    /// MPI failure in the real deployment this crate models (`§5`, `§7`).
    #[error("collective operation failed: {0}")]
    Collective(String),
    /// A local allocation or capacity invariant could not be satisfied
    /// (e.g. a [`crate::semirings::kmer_intersection::CommonKmers`] slot
    /// index out of range).
    #[error("capacity error: {0}")]
    Capacity(String),
}

impl PipelineError {
    /// Wraps a [`std::io::Error`] together with the path that triggered it.
    pub fn io(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Builds a [`PipelineError::MalformedInput`] from a path and a reason.
    pub fn malformed(path: impl Into<std::path::PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedInput { path: path.into(), reason: reason.into() }
    }
}
