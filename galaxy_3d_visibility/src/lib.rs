/*!
# Galaxy 3D Visibility

Spatial visibility index for the Galaxy 3D engine.

Decides, once per frame, which stage objects (actors, lights, static
geometry, particle systems) a camera may see, without testing every object
against the frustum.

## Architecture

- **AABB / Plane / Frustum**: bounding-volume math and frustum tests
- **Camera**: view + projection with a cached frustum
- **LooseOctree**: fixed-depth loose octree in a flat array, generic payload
- **OctreeCuller**: static mesh triangles bucketed into a loose octree
- **SpatialHash**: hierarchical grid spatial hash over an ordered key map
- **Partitioner**: staged writes and per-camera queries over a `VisibilityIndex`
  backend (octree, spatial hash, brute force)

Everything is single-threaded plain data owned by the caller. The only
global state is the logger.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod math;
pub mod camera;
pub mod octree;
pub mod spatial_hash;
pub mod partitioner;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging hub
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::{PartitionerConfig, IndexBackend, OutOfBoundsPolicy};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, format_entry};
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    // Math sub-module
    pub mod math {
        pub use crate::math::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Octree sub-module
    pub mod octree {
        pub use crate::octree::*;
    }

    // Spatial hash sub-module
    pub mod spatial_hash {
        pub use crate::spatial_hash::*;
    }

    // Partitioner sub-module
    pub mod partitioner {
        pub use crate::partitioner::*;
    }
}

// Re-export math library at crate root
pub use glam;
