/// Partitioner configuration.
///
/// Plain data with `Default`; `validate()` is called by every partitioner
/// constructor so a bad config never reaches an index.

use glam::Vec3;
use crate::engine_bail;
use crate::error::Result;
use crate::math::AABB;
use crate::octree::Level;
use crate::spatial_hash::DEFAULT_FRUSTUM_SLICES;

pub use crate::octree::MAX_OCTREE_LEVELS;

/// Spatial index behind a partitioner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBackend {
    /// Loose octree over fixed world bounds
    #[default]
    Octree,
    /// Hierarchical grid spatial hash (unbounded within ±32768)
    SpatialHash,
    /// Test every object against the frustum
    BruteForce,
}

/// What to do with an object whose bounds leave the world bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfBoundsPolicy {
    /// Refuse the write with `Error::OutOfRange`
    #[default]
    Reject,
    /// Clamp the bounds into the world and log a warning
    Clamp,
}

/// Partitioner configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionerConfig {
    /// World bounds of the octree backend
    pub world_bounds: AABB,
    /// Number of octree levels (root included)
    pub octree_levels: Level,
    /// Index used for culled objects
    pub backend: IndexBackend,
    /// Handling of bounds outside `world_bounds`
    pub out_of_bounds: OutOfBoundsPolicy,
    /// Slices a frustum is cut into by the spatial hash backend
    pub frustum_slices: u32,
    /// Octree backend: also test each object's own AABB, not just its node
    pub exact_object_test: bool,
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self {
            world_bounds: AABB::from_centre_width(Vec3::ZERO, 1024.0),
            octree_levels: 4,
            backend: IndexBackend::default(),
            out_of_bounds: OutOfBoundsPolicy::default(),
            frustum_slices: DEFAULT_FRUSTUM_SLICES,
            exact_object_test: false,
        }
    }
}

impl PartitionerConfig {
    pub fn with_backend(mut self, backend: IndexBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_world_bounds(mut self, bounds: AABB) -> Self {
        self.world_bounds = bounds;
        self
    }

    pub fn with_octree_levels(mut self, levels: Level) -> Self {
        self.octree_levels = levels;
        self
    }

    pub fn with_out_of_bounds(mut self, policy: OutOfBoundsPolicy) -> Self {
        self.out_of_bounds = policy;
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for zero or too many octree levels, non-finite or
    /// zero-sized world bounds, or zero frustum slices.
    pub fn validate(&self) -> Result<()> {
        if self.octree_levels == 0 || self.octree_levels > MAX_OCTREE_LEVELS {
            engine_bail!("galaxy3d::PartitionerConfig", InvalidConfig,
                "octree_levels must be in 1..={}, got {}", MAX_OCTREE_LEVELS, self.octree_levels);
        }

        let center = self.world_bounds.center();
        let extents = self.world_bounds.extents();
        if !center.is_finite() || !extents.is_finite() {
            engine_bail!("galaxy3d::PartitionerConfig", InvalidConfig,
                "world bounds {} are not finite", self.world_bounds);
        }

        if self.world_bounds.max_dimension() <= 0.0 {
            engine_bail!("galaxy3d::PartitionerConfig", InvalidConfig,
                "world bounds {} have zero size", self.world_bounds);
        }

        if self.frustum_slices == 0 {
            engine_bail!("galaxy3d::PartitionerConfig", InvalidConfig,
                "frustum_slices must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
