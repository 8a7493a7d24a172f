/// BruteForceIndex: no spatial structure, every object is tested against
/// the frustum.
///
/// O(n) per query but exact. Suitable for small stages or as a baseline
/// for comparing the other backends.

use std::collections::BTreeSet;
use rustc_hash::FxHashMap;
use crate::camera::Frustum;
use crate::engine_err;
use crate::error::Result;
use crate::math::AABB;
use super::handles::{NodeKinds, StageNode};
use super::index::VisibilityIndex;

const SOURCE: &str = "galaxy3d::BruteForceIndex";

/// Flat map of node bounds.
#[derive(Default)]
pub struct BruteForceIndex {
    objects: FxHashMap<StageNode, AABB>,
}

impl BruteForceIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VisibilityIndex for BruteForceIndex {
    fn name(&self) -> &'static str {
        "brute force"
    }

    fn insert(&mut self, node: StageNode, world_aabb: &AABB) -> Result<()> {
        self.objects.insert(node, *world_aabb);
        Ok(())
    }

    fn remove(&mut self, node: StageNode) -> bool {
        self.objects.remove(&node).is_some()
    }

    fn update(&mut self, node: StageNode, world_aabb: &AABB) -> Result<()> {
        match self.objects.get_mut(&node) {
            Some(aabb) => {
                *aabb = *world_aabb;
                Ok(())
            }
            None => Err(engine_err!(SOURCE, UnknownObject,
                "cannot update {}: not indexed", node)),
        }
    }

    fn query_frustum(&self, frustum: &Frustum, kinds: NodeKinds, results: &mut BTreeSet<StageNode>) {
        results.extend(
            self.objects
                .iter()
                .filter(|(node, aabb)| kinds.contains(node.kind()) && frustum.intersects_aabb(aabb))
                .map(|(&node, _)| node),
        );
    }

    fn clear(&mut self) {
        self.objects.clear();
    }

    fn len(&self) -> usize {
        self.objects.len()
    }

    fn check_bounds(&self, world_aabb: &AABB) -> Result<AABB> {
        Ok(*world_aabb)
    }
}

#[cfg(test)]
#[path = "brute_force_index_tests.rs"]
mod tests;
