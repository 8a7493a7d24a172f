/// Partitioner: maps stage objects onto a visibility index.
///
/// Writes are staged: `add_*`, `update_*` and `remove_*` validate their
/// input immediately and queue a `StagedWrite`. The queue is applied in
/// order by `apply_writes`, which the host calls once per frame and which
/// every visibility query calls first, so a query never sees a
/// half-applied object.
///
/// Objects with `CullingMode::Never` bypass the index and are returned by
/// every query of their kind.

use std::collections::BTreeSet;
use rustc_hash::FxHashMap;
use crate::camera::{Camera, Frustum};
use crate::config::{IndexBackend, PartitionerConfig};
use crate::engine_err;
use crate::error::Result;
use crate::math::AABB;
use super::brute_force_index::BruteForceIndex;
use super::handles::{
    ActorKey, CullingMode, GeomKey, LightKey, NodeKinds, ParticleSystemKey,
    RenderableHandle, StageNode,
};
use super::index::VisibilityIndex;
use super::octree_index::OctreeIndex;
use super::spatial_hash_index::SpatialHashIndex;
use super::staged_write::{StagedWrite, WriteOperation};

/// Partitioner over a loose octree.
pub type OctreePartitioner = Partitioner<OctreeIndex>;

/// Partitioner over a hierarchical grid spatial hash.
pub type SpatialHashPartitioner = Partitioner<SpatialHashIndex>;

/// Partitioner that frustum-tests every object.
pub type FrustumPartitioner = Partitioner<BruteForceIndex>;

/// Partitioner whose backend is picked at runtime from a config.
pub type DynPartitioner = Partitioner<Box<dyn VisibilityIndex>>;

/// Visibility partitioner over index `I`.
pub struct Partitioner<I> {
    index: I,
    /// Applied objects with `CullingMode::Never`
    always_visible: BTreeSet<StageNode>,
    staged_writes: Vec<StagedWrite>,
    /// Culling mode of every object as of the last staged write
    staged: FxHashMap<StageNode, CullingMode>,
    /// Log source
    source: &'static str,
}

impl Partitioner<OctreeIndex> {
    /// Create an octree partitioner over `config.world_bounds`.
    pub fn new(config: &PartitionerConfig) -> Result<Self> {
        let index = OctreeIndex::from_config(config)?;
        Ok(Self::with_source(index, "galaxy3d::OctreePartitioner"))
    }
}

impl Partitioner<SpatialHashIndex> {
    pub fn new(config: &PartitionerConfig) -> Result<Self> {
        let index = SpatialHashIndex::from_config(config)?;
        Ok(Self::with_source(index, "galaxy3d::SpatialHashPartitioner"))
    }
}

impl Partitioner<BruteForceIndex> {
    pub fn new() -> Self {
        Self::with_source(BruteForceIndex::new(), "galaxy3d::FrustumPartitioner")
    }
}

impl Default for Partitioner<BruteForceIndex> {
    fn default() -> Self {
        Self::new()
    }
}

impl Partitioner<Box<dyn VisibilityIndex>> {
    /// Create a partitioner with the backend named by `config.backend`.
    pub fn from_config(config: &PartitionerConfig) -> Result<Self> {
        let (index, source): (Box<dyn VisibilityIndex>, _) = match config.backend {
            IndexBackend::Octree => (
                Box::new(OctreeIndex::from_config(config)?),
                "galaxy3d::OctreePartitioner",
            ),
            IndexBackend::SpatialHash => (
                Box::new(SpatialHashIndex::from_config(config)?),
                "galaxy3d::SpatialHashPartitioner",
            ),
            IndexBackend::BruteForce => {
                config.validate()?;
                (Box::new(BruteForceIndex::new()), "galaxy3d::FrustumPartitioner")
            }
        };

        Ok(Self::with_source(index, source))
    }
}

impl<I: VisibilityIndex> Partitioner<I> {
    /// Wrap a caller-built index.
    pub fn with_index(index: I) -> Self {
        Self::with_source(index, "galaxy3d::Partitioner")
    }

    fn with_source(index: I, source: &'static str) -> Self {
        crate::engine_info!(source, "Created partitioner over {} index", index.name());

        Self {
            index,
            always_visible: BTreeSet::new(),
            staged_writes: Vec::new(),
            staged: FxHashMap::default(),
            source,
        }
    }

    // ===== ACCESSORS =====

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Writes queued since the last `apply_writes`.
    pub fn pending_write_count(&self) -> usize {
        self.staged_writes.len()
    }

    /// Objects applied so far (index plus always-visible).
    pub fn node_count(&self) -> usize {
        self.index.len() + self.always_visible.len()
    }

    /// Whether `node` is known, counting staged writes.
    pub fn contains(&self, node: impl Into<StageNode>) -> bool {
        self.staged.contains_key(&node.into())
    }

    // ===== ACTORS =====

    pub fn add_actor(&mut self, key: ActorKey, world_aabb: &AABB, culling: CullingMode) -> Result<()> {
        self.stage_add(StageNode::Actor(key), world_aabb, culling)
    }

    pub fn update_actor(&mut self, key: ActorKey, world_aabb: &AABB) -> Result<()> {
        self.stage_update(StageNode::Actor(key), world_aabb)
    }

    /// Transform-change notification for an actor: same as `update_actor`.
    pub fn event_actor_changed(&mut self, key: ActorKey, world_aabb: &AABB) -> Result<()> {
        self.update_actor(key, world_aabb)
    }

    pub fn remove_actor(&mut self, key: ActorKey) -> bool {
        self.stage_remove(StageNode::Actor(key))
    }

    // ===== LIGHTS =====

    pub fn add_light(&mut self, key: LightKey, world_aabb: &AABB, culling: CullingMode) -> Result<()> {
        self.stage_add(StageNode::Light(key), world_aabb, culling)
    }

    pub fn update_light(&mut self, key: LightKey, world_aabb: &AABB) -> Result<()> {
        self.stage_update(StageNode::Light(key), world_aabb)
    }

    pub fn remove_light(&mut self, key: LightKey) -> bool {
        self.stage_remove(StageNode::Light(key))
    }

    // ===== GEOMS =====

    pub fn add_geom(&mut self, key: GeomKey, world_aabb: &AABB, culling: CullingMode) -> Result<()> {
        self.stage_add(StageNode::Geom(key), world_aabb, culling)
    }

    pub fn update_geom(&mut self, key: GeomKey, world_aabb: &AABB) -> Result<()> {
        self.stage_update(StageNode::Geom(key), world_aabb)
    }

    pub fn remove_geom(&mut self, key: GeomKey) -> bool {
        self.stage_remove(StageNode::Geom(key))
    }

    // ===== PARTICLE SYSTEMS =====

    pub fn add_particle_system(
        &mut self,
        key: ParticleSystemKey,
        world_aabb: &AABB,
        culling: CullingMode,
    ) -> Result<()> {
        self.stage_add(StageNode::ParticleSystem(key), world_aabb, culling)
    }

    pub fn update_particle_system(&mut self, key: ParticleSystemKey, world_aabb: &AABB) -> Result<()> {
        self.stage_update(StageNode::ParticleSystem(key), world_aabb)
    }

    pub fn remove_particle_system(&mut self, key: ParticleSystemKey) -> bool {
        self.stage_remove(StageNode::ParticleSystem(key))
    }

    // ===== STAGING =====

    /// Queue an add. Adding a known object replaces it.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if a culled object does not fit the index (with the
    /// `Reject` policy). Nothing is queued in that case.
    pub fn stage_add(&mut self, node: StageNode, world_aabb: &AABB, culling: CullingMode) -> Result<()> {
        let bounds = match culling {
            CullingMode::Dynamic => self.index.check_bounds(world_aabb)?,
            CullingMode::Never => *world_aabb,
        };

        if let Some(previous) = self.staged.insert(node, culling) {
            crate::engine_debug!(self.source, "Re-adding {}, replacing the previous entry", node);
            self.staged_writes.push(StagedWrite::remove(node, previous));
        }

        crate::engine_trace!(self.source, "Staged add of {} ({:?})", node, culling);
        self.staged_writes.push(StagedWrite::add(node, bounds, culling));
        Ok(())
    }

    /// Queue a bounds change.
    ///
    /// # Errors
    ///
    /// `UnknownObject` if the object was never added (or already removed),
    /// `OutOfRange` as for `stage_add`.
    pub fn stage_update(&mut self, node: StageNode, world_aabb: &AABB) -> Result<()> {
        let Some(&culling) = self.staged.get(&node) else {
            return Err(engine_err!(self.source, UnknownObject,
                "cannot update {}: it was never added", node));
        };

        if culling == CullingMode::Never {
            // Always visible: bounds are irrelevant
            return Ok(());
        }

        let bounds = self.index.check_bounds(world_aabb)?;
        crate::engine_trace!(self.source, "Staged update of {}", node);
        self.staged_writes.push(StagedWrite::update(node, bounds, culling));
        Ok(())
    }

    /// Queue a removal. Returns `false` if the object is not known.
    pub fn stage_remove(&mut self, node: StageNode) -> bool {
        let Some(culling) = self.staged.remove(&node) else {
            crate::engine_warn!(self.source, "Ignoring removal of unknown {}", node);
            return false;
        };

        crate::engine_trace!(self.source, "Staged removal of {}", node);
        self.staged_writes.push(StagedWrite::remove(node, culling));
        true
    }

    /// Apply every staged write in order. Returns the number applied.
    ///
    /// A write the index refuses is logged and skipped; the rest of the
    /// batch is still applied.
    pub fn apply_writes(&mut self) -> usize {
        if self.staged_writes.is_empty() {
            return 0;
        }

        let writes = std::mem::take(&mut self.staged_writes);
        let mut failed = 0;

        for write in &writes {
            let applied = match (write.operation, write.culling) {
                (WriteOperation::Add, CullingMode::Never) => {
                    self.always_visible.insert(write.node);
                    Ok(())
                }
                (WriteOperation::Add, CullingMode::Dynamic) => {
                    self.index.insert(write.node, &write.bounds)
                }
                (WriteOperation::Update, CullingMode::Dynamic) => {
                    self.index.update(write.node, &write.bounds)
                }
                (WriteOperation::Update, CullingMode::Never) => Ok(()),
                (WriteOperation::Remove, CullingMode::Never) => {
                    self.always_visible.remove(&write.node);
                    Ok(())
                }
                (WriteOperation::Remove, CullingMode::Dynamic) => {
                    self.index.remove(write.node);
                    Ok(())
                }
            };

            if applied.is_err() {
                failed += 1;
            }
        }

        if failed > 0 {
            crate::engine_warn!(self.source, "{} of {} staged writes failed", failed, writes.len());
        }
        crate::engine_debug!(self.source, "Applied {} staged writes", writes.len() - failed);

        writes.len() - failed
    }

    /// Drop every object and every pending write.
    pub fn clear(&mut self) {
        self.index.clear();
        self.always_visible.clear();
        self.staged_writes.clear();
        self.staged.clear();
        crate::engine_info!(self.source, "Cleared partitioner");
    }

    // ===== QUERIES =====

    /// Objects of `kinds` that may be inside the frustum, plus the
    /// always-visible ones. Applies pending writes first.
    pub fn visible_from_frustum(&mut self, frustum: &Frustum, kinds: NodeKinds) -> BTreeSet<StageNode> {
        self.apply_writes();

        let mut results: BTreeSet<StageNode> = self.always_visible
            .iter()
            .copied()
            .filter(|node| kinds.contains(node.kind()))
            .collect();

        if !self.index.is_empty() {
            self.index.query_frustum(frustum, kinds, &mut results);
        }
        results
    }

    /// Renderables (actors, geoms, particle systems) the camera may see.
    pub fn geometry_visible_from(&mut self, camera: &Camera) -> BTreeSet<RenderableHandle> {
        self.visible_from_frustum(camera.frustum(), NodeKinds::RENDERABLE)
            .into_iter()
            .filter_map(|node| node.renderable())
            .collect()
    }

    /// Lights the camera may see.
    pub fn lights_visible_from(&mut self, camera: &Camera) -> BTreeSet<LightKey> {
        self.visible_from_frustum(camera.frustum(), NodeKinds::LIGHT)
            .into_iter()
            .filter_map(|node| node.light())
            .collect()
    }
}

#[cfg(test)]
#[path = "partitioner_tests.rs"]
mod tests;
