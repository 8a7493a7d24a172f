/// SpatialHashIndex: hierarchical grid spatial hash visibility index.
///
/// Unbounded apart from the 16-bit cell range of the hash. Updates are done
/// in place: only the keys that changed are touched.

use std::collections::BTreeSet;
use glam::Vec3;
use crate::camera::Frustum;
use crate::config::{OutOfBoundsPolicy, PartitionerConfig};
use crate::error::Result;
use crate::math::AABB;
use crate::spatial_hash::{SpatialHash, ROOT_CELL_SIZE};
use crate::{engine_err, engine_trace};
use super::handles::{NodeKinds, StageNode};
use super::index::{fit_to_bounds, VisibilityIndex};

const SOURCE: &str = "galaxy3d::SpatialHashIndex";

/// Region the hash can address: one unit inside the 16-bit cell range on
/// every side.
pub fn spatial_hash_limits() -> AABB {
    let limit = (ROOT_CELL_SIZE - 1) as f32;
    AABB::from_min_max(Vec3::splat(-limit), Vec3::splat(limit))
}

/// Spatial hash index over stage nodes.
pub struct SpatialHashIndex {
    hash: SpatialHash<StageNode>,
    limits: AABB,
    out_of_bounds: OutOfBoundsPolicy,
}

impl Default for SpatialHashIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialHashIndex {
    pub fn new() -> Self {
        Self {
            hash: SpatialHash::new(),
            limits: spatial_hash_limits(),
            out_of_bounds: OutOfBoundsPolicy::default(),
        }
    }

    /// Build from a validated config. `world_bounds` and `octree_levels`
    /// are not used by this backend.
    pub fn from_config(config: &PartitionerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self::new()
            .with_frustum_slices(config.frustum_slices)
            .with_out_of_bounds(config.out_of_bounds))
    }

    pub fn with_frustum_slices(mut self, slices: u32) -> Self {
        self.hash = self.hash.with_frustum_slices(slices);
        self
    }

    pub fn with_out_of_bounds(mut self, policy: OutOfBoundsPolicy) -> Self {
        self.out_of_bounds = policy;
        self
    }

    pub fn hash(&self) -> &SpatialHash<StageNode> {
        &self.hash
    }
}

// ===== VISIBILITY INDEX TRAIT =====

impl VisibilityIndex for SpatialHashIndex {
    fn name(&self) -> &'static str {
        "spatial hash"
    }

    fn insert(&mut self, node: StageNode, world_aabb: &AABB) -> Result<()> {
        // A fresh key set, not a union with the old one
        let stats = self.hash.update_object_for_box(world_aabb, node);
        engine_trace!(SOURCE, "Inserted {} under {} keys", node, stats.inserted);
        Ok(())
    }

    fn remove(&mut self, node: StageNode) -> bool {
        self.hash.remove_object(node)
    }

    fn update(&mut self, node: StageNode, world_aabb: &AABB) -> Result<()> {
        if !self.hash.contains(node) {
            return Err(engine_err!(SOURCE, UnknownObject,
                "cannot update {}: not in the spatial hash", node));
        }

        let stats = self.hash.update_object_for_box(world_aabb, node);
        if !stats.is_noop() {
            engine_trace!(SOURCE, "Moved {}: {} keys added, {} removed",
                node, stats.inserted, stats.removed);
        }
        Ok(())
    }

    fn query_frustum(&self, frustum: &Frustum, kinds: NodeKinds, results: &mut BTreeSet<StageNode>) {
        results.extend(
            self.hash
                .find_objects_within_frustum(frustum)
                .into_iter()
                .filter(|node| kinds.contains(node.kind())),
        );
    }

    fn clear(&mut self) {
        self.hash.clear();
    }

    fn len(&self) -> usize {
        self.hash.len()
    }

    fn check_bounds(&self, world_aabb: &AABB) -> Result<AABB> {
        fit_to_bounds(SOURCE, &self.limits, world_aabb, self.out_of_bounds)
    }
}

#[cfg(test)]
#[path = "spatial_hash_index_tests.rs"]
mod tests;
