//! Distributed sparse-matrix substrate and the two semirings that turn a
//! collection of long reads into a transitively-reduced string graph.
//!
//! The crate is organized the way the pipeline is organized: a generic
//! [`DistMatrix`](impls::DistMatrix) substrate at the bottom, a SpGEMM engine
//! parameterized by a [`Semiring`](traits::Semiring) capability bundle above
//! it, and the two concrete semirings ([`semirings::kmer_intersection`],
//! [`semirings::overlap_path`]) plus the [`tr`] fixed-point driver built on
//! top. FASTA distribution, the aligner's internal DP, and the CLI are
//! ambient collaborators rather than the algorithmic core, but they are
//! still real, working code — see `SPEC_FULL.md` at the workspace root for
//! the full rationale.

pub mod aligner;
pub mod config;
pub mod errors;
pub mod impls;
pub mod mm;
pub mod naive_structs;
pub mod reads;
pub mod semirings;
pub mod spgemm;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod tr;
pub mod traits;
pub mod types;

/// Prelude re-exporting the types most pipeline code needs.
pub mod prelude {
    pub use crate::{
        aligner::*,
        config::*,
        impls::*,
        semirings::kmer_intersection::*,
        semirings::overlap_path::*,
        traits::*,
        types::*,
    };
}
