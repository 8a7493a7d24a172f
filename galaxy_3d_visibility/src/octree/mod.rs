//! Octree module: the loose octree and the static-geometry culler built on it.

mod loose_octree;
mod geom_culler;

pub use loose_octree::{
    LooseOctree, OctreeNode, Level, GridCoord, ROOT, MAX_OCTREE_LEVELS,
    calc_base, calc_index,
};
pub use geom_culler::{OctreeCuller, MaterialId, CullerNodeData, DEFAULT_CULLER_LEVELS};
