//! The two concrete semirings the pipeline composes (`§4.3`, `§4.4`).

pub mod kmer_intersection;
pub mod overlap_path;
