//! Partitioner module: maps stage objects onto a visibility index.
//!
//! Provides the object handles, the `VisibilityIndex` backends (loose
//! octree, spatial hash, brute force), staged writes, and the
//! `Partitioner` facade that answers per-camera visibility queries.

mod handles;
mod index;
mod octree_index;
mod spatial_hash_index;
mod brute_force_index;
mod staged_write;
mod partitioner;

pub use handles::{
    ActorKey, LightKey, GeomKey, ParticleSystemKey,
    StageNode, RenderableHandle, NodeKinds, CullingMode,
};
pub use index::VisibilityIndex;
pub use octree_index::OctreeIndex;
pub use spatial_hash_index::{SpatialHashIndex, spatial_hash_limits};
pub use brute_force_index::BruteForceIndex;
pub use staged_write::{StagedWrite, WriteOperation};
pub use partitioner::{
    Partitioner, OctreePartitioner, SpatialHashPartitioner, FrustumPartitioner, DynPartitioner,
};
