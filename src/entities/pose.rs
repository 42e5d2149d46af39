//! PoseStep - the atomic unit of practice.
//!
//! A pose step references one pose variation by catalog key and holds for a
//! fixed number of seconds. Steps are immutable value records: edits build a
//! replacement and swap it into the owning collection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single held pose with a fixed duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseStep {
    /// Stable identifier, never reused after creation
    pub uuid: Uuid,

    /// Pose/variation reference (key into the external pose catalog).
    /// Doubles as the narration text for this step.
    pub pose_ref: String,

    /// Hold duration in whole seconds
    pub duration_secs: u32,

    /// Excluded from auto-fit/rebalance passes. Not interpreted by the
    /// engine, but carried through flattening so downstream tooling sees it.
    #[serde(default)]
    pub locked: bool,
}

impl PoseStep {
    pub fn new(pose_ref: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            pose_ref: pose_ref.into(),
            duration_secs,
            locked: false,
        }
    }

    /// Builder-style lock toggle for sequence authoring code
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs as u64
    }
}
