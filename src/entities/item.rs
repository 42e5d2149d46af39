//! Item - enum wrapper for the two playable node types.
//!
//! Provides a unified interface for storing poses and nested groups in the
//! same ordered collection (Section.items, GroupBlock.items). The model is
//! a strict tree: groups own their items, never back-reference a parent.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::GroupBlock;
use super::pose::PoseStep;

/// Enum containing all item types a section or group can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Pose(PoseStep),
    Group(GroupBlock),
}

impl Item {
    /// Check if this is a pose step
    pub fn is_pose(&self) -> bool {
        matches!(self, Item::Pose(_))
    }

    /// Check if this is a group block
    pub fn is_group(&self) -> bool {
        matches!(self, Item::Group(_))
    }

    /// Stable identifier of the underlying entity
    pub fn uuid(&self) -> Uuid {
        match self {
            Item::Pose(p) => p.uuid,
            Item::Group(g) => g.uuid,
        }
    }

    /// Total duration in seconds (recursive for groups)
    pub fn duration_secs(&self) -> u64 {
        match self {
            Item::Pose(p) => p.duration_secs(),
            Item::Group(g) => g.duration_secs(),
        }
    }

    /// Get as PoseStep reference
    pub fn as_pose(&self) -> Option<&PoseStep> {
        match self {
            Item::Pose(p) => Some(p),
            _ => None,
        }
    }

    /// Get as PoseStep mutable reference
    pub fn as_pose_mut(&mut self) -> Option<&mut PoseStep> {
        match self {
            Item::Pose(p) => Some(p),
            _ => None,
        }
    }

    /// Get as GroupBlock reference
    pub fn as_group(&self) -> Option<&GroupBlock> {
        match self {
            Item::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Get as GroupBlock mutable reference
    pub fn as_group_mut(&mut self) -> Option<&mut GroupBlock> {
        match self {
            Item::Group(g) => Some(g),
            _ => None,
        }
    }
}

// Convenience From implementations
impl From<PoseStep> for Item {
    fn from(step: PoseStep) -> Self {
        Item::Pose(step)
    }
}

impl From<GroupBlock> for Item {
    fn from(group: GroupBlock) -> Self {
        Item::Group(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_pose() {
        let step = PoseStep::new("tree", 30);
        let uuid = step.uuid;
        let item: Item = step.into();

        assert!(item.is_pose());
        assert!(!item.is_group());
        assert_eq!(item.uuid(), uuid);
        assert_eq!(item.duration_secs(), 30);
    }

    #[test]
    fn test_item_group() {
        let group = GroupBlock::new(2).with_items(vec![PoseStep::new("cat", 10).into()]);
        let uuid = group.uuid;
        let item: Item = group.into();

        assert!(item.is_group());
        assert_eq!(item.uuid(), uuid);
        assert_eq!(item.duration_secs(), 20);
        assert!(item.as_pose().is_none());
        assert!(item.as_group().is_some());
    }
}
