/// Spatial indexes behind a partitioner.
///
/// A VisibilityIndex stores culled stage nodes by their world-space AABB and
/// answers frustum queries. Implementations: loose octree, spatial hash,
/// brute force.
///
/// Ownership: the partitioner owns its index exclusively.

use std::collections::BTreeSet;
use crate::camera::Frustum;
use crate::config::OutOfBoundsPolicy;
use crate::error::Result;
use crate::{engine_err, engine_warn};
use crate::math::AABB;
use super::handles::{NodeKinds, StageNode};

/// Trait for spatial indexing of stage nodes.
pub trait VisibilityIndex: Send + Sync {
    /// Short backend name used in log messages.
    fn name(&self) -> &'static str;

    /// Insert a node with its world-space AABB. Inserting a node that is
    /// already indexed replaces its bounds.
    fn insert(&mut self, node: StageNode, world_aabb: &AABB) -> Result<()>;

    /// Remove a node. Returns `false` if it was not indexed.
    fn remove(&mut self, node: StageNode) -> bool;

    /// Move an indexed node to new bounds.
    ///
    /// # Errors
    ///
    /// `UnknownObject` if the node is not indexed.
    fn update(&mut self, node: StageNode, world_aabb: &AABB) -> Result<()>;

    /// Add every node of one of `kinds` that may be inside the frustum to
    /// `results`.
    fn query_frustum(&self, frustum: &Frustum, kinds: NodeKinds, results: &mut BTreeSet<StageNode>);

    /// Remove all nodes.
    fn clear(&mut self);

    /// Number of indexed nodes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bounds this index would store for `world_aabb`: the box itself, a
    /// clamped box, or `OutOfRange` when the index cannot hold it.
    fn check_bounds(&self, world_aabb: &AABB) -> Result<AABB>;
}

impl VisibilityIndex for Box<dyn VisibilityIndex> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn insert(&mut self, node: StageNode, world_aabb: &AABB) -> Result<()> {
        (**self).insert(node, world_aabb)
    }

    fn remove(&mut self, node: StageNode) -> bool {
        (**self).remove(node)
    }

    fn update(&mut self, node: StageNode, world_aabb: &AABB) -> Result<()> {
        (**self).update(node, world_aabb)
    }

    fn query_frustum(&self, frustum: &Frustum, kinds: NodeKinds, results: &mut BTreeSet<StageNode>) {
        (**self).query_frustum(frustum, kinds, results)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn check_bounds(&self, world_aabb: &AABB) -> Result<AABB> {
        (**self).check_bounds(world_aabb)
    }
}

/// Apply an out-of-bounds policy to `world_aabb` against `limits`.
///
/// Shared by the bounded backends.
pub(crate) fn fit_to_bounds(
    source: &str,
    limits: &AABB,
    world_aabb: &AABB,
    policy: OutOfBoundsPolicy,
) -> Result<AABB> {
    if limits.contains_aabb(world_aabb) {
        return Ok(*world_aabb);
    }

    match policy {
        OutOfBoundsPolicy::Reject => Err(engine_err!(source, OutOfRange,
            "{} is outside the index bounds {}", world_aabb, limits)),
        OutOfBoundsPolicy::Clamp => {
            let min = world_aabb.min().clamp(limits.min(), limits.max());
            let max = world_aabb.max().clamp(limits.min(), limits.max());
            let clamped = AABB::from_min_max(min, max);
            engine_warn!(source, "Clamped {} to {}", world_aabb, clamped);
            Ok(clamped)
        }
    }
}
