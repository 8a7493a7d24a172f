/// OctreeIndex: loose octree visibility index over fixed world bounds.
///
/// Each node is stored in exactly one octree node, chosen from its bounding
/// sphere by `find_destination_for_sphere`. Because the octree is loose the
/// object always fits the node's loose cell, so a query only needs to test
/// node cells, never individual objects (unless `exact_object_test` is on).
///
/// A reverse lookup (node → octree node index, AABB) gives O(1) removal.

use std::collections::BTreeSet;
use rustc_hash::FxHashMap;
use crate::camera::Frustum;
use crate::config::{OutOfBoundsPolicy, PartitionerConfig};
use crate::engine_err;
use crate::error::Result;
use crate::math::AABB;
use crate::octree::{Level, LooseOctree};
use super::handles::{NodeKinds, StageNode};
use super::index::{fit_to_bounds, VisibilityIndex};

const SOURCE: &str = "galaxy3d::OctreeIndex";

/// Loose octree spatial index.
pub struct OctreeIndex {
    octree: LooseOctree<Vec<StageNode>>,
    /// Reverse lookup: stage node → (octree node index, world AABB)
    locations: FxHashMap<StageNode, (usize, AABB)>,
    out_of_bounds: OutOfBoundsPolicy,
    exact_object_test: bool,
}

impl OctreeIndex {
    /// Create an index over `world_bounds` with `levels` octree levels.
    /// Non-cubic bounds are grown to a cube.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `levels` exceeds `MAX_OCTREE_LEVELS`.
    pub fn new(world_bounds: &AABB, levels: Level) -> Result<Self> {
        Ok(Self {
            octree: LooseOctree::new(world_bounds, levels)?,
            locations: FxHashMap::default(),
            out_of_bounds: OutOfBoundsPolicy::default(),
            exact_object_test: false,
        })
    }

    /// Build from a validated config.
    pub fn from_config(config: &PartitionerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self::new(&config.world_bounds, config.octree_levels)?
            .with_out_of_bounds(config.out_of_bounds)
            .with_exact_object_test(config.exact_object_test))
    }

    pub fn with_out_of_bounds(mut self, policy: OutOfBoundsPolicy) -> Self {
        self.out_of_bounds = policy;
        self
    }

    /// Also test each object's own AABB against the frustum. Tighter
    /// results at the cost of one test per object in a visible node.
    pub fn with_exact_object_test(mut self, enabled: bool) -> Self {
        self.exact_object_test = enabled;
        self
    }

    pub fn octree(&self) -> &LooseOctree<Vec<StageNode>> {
        &self.octree
    }

    /// Octree node index a stage node is stored in.
    pub fn location(&self, node: StageNode) -> Option<usize> {
        self.locations.get(&node).map(|&(index, _)| index)
    }

    fn destination(&self, world_aabb: &AABB) -> Result<usize> {
        self.octree.find_destination_for_sphere(
            world_aabb.center(),
            world_aabb.max_dimension() * 0.5,
        )
    }

    fn store(&mut self, node: StageNode, target: usize, world_aabb: &AABB) {
        if let Some(octree_node) = self.octree.node_mut(target) {
            octree_node.data_mut().push(node);
        }
        self.locations.insert(node, (target, *world_aabb));
    }

    fn unlink(&mut self, node: StageNode, index: usize) {
        if let Some(octree_node) = self.octree.node_mut(index) {
            let objects = octree_node.data_mut();
            if let Some(pos) = objects.iter().position(|&n| n == node) {
                objects.swap_remove(pos);
            }
        }
    }
}

// ===== VISIBILITY INDEX TRAIT =====

impl VisibilityIndex for OctreeIndex {
    fn name(&self) -> &'static str {
        "octree"
    }

    fn insert(&mut self, node: StageNode, world_aabb: &AABB) -> Result<()> {
        let target = self.destination(world_aabb)?;

        if let Some((previous, _)) = self.locations.remove(&node) {
            self.unlink(node, previous);
        }

        self.store(node, target, world_aabb);
        Ok(())
    }

    fn remove(&mut self, node: StageNode) -> bool {
        match self.locations.remove(&node) {
            Some((index, _)) => {
                self.unlink(node, index);
                true
            }
            None => false,
        }
    }

    fn update(&mut self, node: StageNode, world_aabb: &AABB) -> Result<()> {
        let Some(&(current, _)) = self.locations.get(&node) else {
            return Err(engine_err!(SOURCE, UnknownObject,
                "cannot update {}: not in the octree", node));
        };

        let target = self.destination(world_aabb)?;

        if target == current {
            // Same node: only the stored AABB changes
            self.locations.insert(node, (current, *world_aabb));
            return Ok(());
        }

        self.unlink(node, current);
        self.store(node, target, world_aabb);
        Ok(())
    }

    fn query_frustum(&self, frustum: &Frustum, kinds: NodeKinds, results: &mut BTreeSet<StageNode>) {
        if self.locations.is_empty() {
            return;
        }

        self.octree.traverse_visible(frustum, |octree_node| {
            for &node in octree_node.data() {
                if !kinds.contains(node.kind()) {
                    continue;
                }

                if self.exact_object_test {
                    let visible = self.locations
                        .get(&node)
                        .is_some_and(|(_, aabb)| frustum.intersects_aabb(aabb));
                    if !visible {
                        continue;
                    }
                }

                results.insert(node);
            }
        });
    }

    fn clear(&mut self) {
        self.octree.traverse_mut(|octree_node| octree_node.data_mut().clear());
        self.locations.clear();
    }

    fn len(&self) -> usize {
        self.locations.len()
    }

    /// A box fits when its centre is inside the world cube and it is no
    /// wider than the root: the root's loose cell then holds any overhang.
    fn check_bounds(&self, world_aabb: &AABB) -> Result<AABB> {
        let bounds = self.octree.bounds();
        let fits = bounds.contains_point(world_aabb.center())
            && world_aabb.max_dimension() <= self.octree.root_width();

        if fits {
            return Ok(*world_aabb);
        }
        fit_to_bounds(SOURCE, &bounds, world_aabb, self.out_of_bounds)
    }
}

#[cfg(test)]
#[path = "octree_index_tests.rs"]
mod tests;
