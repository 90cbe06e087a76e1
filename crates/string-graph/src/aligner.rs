//! The three shipped [`crate::traits::Aligner`] implementations (`§6`, `§9`).
//!
//! Real, if simple, implementations rather than stubs: the `Aligner`
//! Non-goal scopes out the production X-drop kernel's internal DP tuning,
//! not the existence of working code behind the trait boundary the TR
//! driver's tests exercise end to end.

pub mod full;
pub mod none;
pub mod xdrop;

pub use full::FullAligner;
pub use none::NoAligner;
pub use xdrop::XDropAligner;
