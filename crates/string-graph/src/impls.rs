//! Concrete implementations of the substrate traits (`§4.1`, `§4.2`).

pub mod dist_matrix;
pub mod grid;
pub mod kmer_index;
pub mod local_block;

pub use dist_matrix::{Axis, DistMatrix};
pub use grid::{SingleRankGrid, ThreadGrid};
pub use kmer_index::build_kmer_index;
pub use local_block::LocalBlock;
