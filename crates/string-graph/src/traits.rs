//! The three capability traits the rest of the crate is parameterized over:
//! a [`Semiring`] for SpGEMM, a [`ProcessGrid`] for the distributed
//! substrate, and an [`Aligner`] for seed-and-extend enrichment. Each is a
//! static capability bundle (`§9` "SpGEMM parameterization by semiring" /
//! "Polymorphism") rather than a dynamic plugin system: concrete
//! implementations are selected once at startup and never swapped mid-run.

pub mod aligner;
pub mod grid;
pub mod semiring;

pub use aligner::{Aligner, AlignmentRecord, SeedPair};
pub use grid::ProcessGrid;
pub use semiring::{Monoid, Semiring};
