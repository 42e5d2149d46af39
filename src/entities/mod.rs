//! Entities module - the recursive structure model.
//!
//! A `Sequence` owns ordered `Section`s; sections and groups own ordered
//! `Item`s (poses or nested groups). Ownership is a strict tree, so values
//! clone freely and edits are whole-value replacements into the owning
//! collection (no in-place aliasing, no cycles).

pub mod group;
pub mod item;
pub mod pose;
pub mod section;
pub mod sequence;

pub use group::{GroupBlock, ItemSubstitute, RoundOverride};
pub use item::Item;
pub use pose::PoseStep;
pub use section::Section;
pub use sequence::Sequence;
