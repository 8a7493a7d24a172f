//! Spatial hash module: hierarchical grid keys and the hash built on them.

mod key;
mod spatial_hash;

pub use key::{Hash, Key, make_hash, make_key, MAX_GRID_LEVELS, ROOT_CELL_SIZE};
pub use spatial_hash::{
    SpatialHash, UpdateStats, DEFAULT_FRUSTUM_SLICES,
    find_cell_size_for_box, generate_boxes_for_frustum,
};
