//! Online hard example mining
//!
//! Ranks per-sample errors of one task and keeps the hardest valid samples.

mod selector;

pub use selector::{select_hardest, KeepPolicy, Selection};

/// Fraction of valid classification samples kept after ranking
pub const NUM_KEEP_RATIO: f32 = 0.7;
