//! Small, unoptimized reference structures used only to cross-check the
//! distributed substrate's output in tests — never on the hot path.

pub mod dense_overlap;

pub use dense_overlap::{naive_spgemm, to_dense, DenseMatrix};
