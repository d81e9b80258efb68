//! Composite sample labels
//!
//! A target row is `[label(2), bbox(4), landmark(2P)]`. The 2-wide class
//! field encodes one of four sample kinds through a [`LabelMap`], and the
//! codec turns that field into per-[`Task`] validity masks.

mod codec;
mod layout;
mod map;

pub use codec::{class_pairs, validity_mask, ClassPair, Task, ValidityMask};
pub use layout::{TargetLayout, BBOX_WIDTH, DEFAULT_LANDMARK_POINTS, LABEL_WIDTH};
pub use map::{LabelMap, SampleKind};
