/// Staged writes: partitioner changes queued until the next `apply_writes`.

use crate::math::AABB;
use super::handles::{CullingMode, StageNode};

/// Kind of change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Add,
    Update,
    Remove,
}

/// One queued change to a partitioner.
///
/// `bounds` are already checked against the index (and clamped if the
/// policy says so). They are unused for `Remove`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagedWrite {
    pub operation: WriteOperation,
    pub node: StageNode,
    pub bounds: AABB,
    pub culling: CullingMode,
}

impl StagedWrite {
    pub fn add(node: StageNode, bounds: AABB, culling: CullingMode) -> Self {
        Self { operation: WriteOperation::Add, node, bounds, culling }
    }

    pub fn update(node: StageNode, bounds: AABB, culling: CullingMode) -> Self {
        Self { operation: WriteOperation::Update, node, bounds, culling }
    }

    pub fn remove(node: StageNode, culling: CullingMode) -> Self {
        Self { operation: WriteOperation::Remove, node, bounds: AABB::default(), culling }
    }
}
