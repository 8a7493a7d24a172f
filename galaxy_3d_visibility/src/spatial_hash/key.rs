//! Keys of the hierarchical grid spatial hash.
//!
//! A `Key` is the path of grid cells containing a point, from the coarsest
//! grid (cell size `2^(MAX_GRID_LEVELS-1)`) down to the cell size the object
//! was inserted at. Ordering keys lexicographically by path keeps every
//! key's descendants in one contiguous run right after it, which is what
//! the range scans in `SpatialHash` rely on.

use std::cmp::Ordering;
use std::fmt;

/// Number of grid levels in a key path.
pub const MAX_GRID_LEVELS: usize = 16;

/// Cell size of the coarsest grid level.
pub const ROOT_CELL_SIZE: i32 = 1 << (MAX_GRID_LEVELS - 1);

/// Integer cell coordinates of a point at one cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl Hash {
    pub fn new(x: i16, y: i16, z: i16) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Cell containing `(x, y, z)` on the grid of the given cell size.
pub fn make_hash(cell_size: i32, x: f32, y: f32, z: f32) -> Hash {
    let cell = cell_size as f32;
    Hash {
        x: (x / cell).floor() as i16,
        y: (y / cell).floor() as i16,
        z: (z / cell).floor() as i16,
    }
}

/// Path of cells from the root grid down to one cell size.
///
/// Only `hash_path[..=ancestors]` is meaningful; the rest is kept zeroed.
#[derive(Clone, Copy, Default)]
pub struct Key {
    pub hash_path: [Hash; MAX_GRID_LEVELS],
    /// Index of the last populated entry in `hash_path`
    pub ancestors: usize,
}

impl Key {
    /// Build a key from an explicit path (root first).
    ///
    /// Returns `None` for an empty path or one longer than `MAX_GRID_LEVELS`.
    pub fn from_path(path: &[Hash]) -> Option<Self> {
        if path.is_empty() || path.len() > MAX_GRID_LEVELS {
            return None;
        }

        let mut key = Key::default();
        key.hash_path[..path.len()].copy_from_slice(path);
        key.ancestors = path.len() - 1;
        Some(key)
    }

    /// The populated part of the path, root first.
    pub fn path(&self) -> &[Hash] {
        &self.hash_path[..=self.ancestors]
    }

    /// `true` if `other` lies in this key's cell: this path is a prefix of
    /// `other`'s. A key is its own ancestor.
    pub fn is_ancestor_of(&self, other: &Key) -> bool {
        self.ancestors <= other.ancestors
            && self.path() == &other.hash_path[..=self.ancestors]
    }

    /// The enclosing cell one level up. The root is its own parent.
    pub fn parent_key(&self) -> Key {
        if self.is_root() {
            return *self;
        }

        let mut parent = *self;
        parent.hash_path[self.ancestors] = Hash::default();
        parent.ancestors -= 1;
        parent
    }

    pub fn is_root(&self) -> bool {
        self.ancestors == 0
    }
}

/// Key of the cell containing `(x, y, z)` at `cell_size` (a power of two).
///
/// The path holds one hash per power of two from `ROOT_CELL_SIZE` down to
/// `cell_size`, so a cell size of 1 gives a full 16-entry path.
pub fn make_key(cell_size: i32, x: f32, y: f32, z: f32) -> Key {
    let mut key = Key::default();
    let mut path_size = ROOT_CELL_SIZE;
    let mut ancestor_count = 0;

    while path_size > cell_size {
        key.hash_path[ancestor_count] = make_hash(path_size, x, y, z);
        path_size /= 2;
        ancestor_count += 1;
    }

    debug_assert!(ancestor_count < MAX_GRID_LEVELS);

    key.hash_path[ancestor_count] = make_hash(cell_size, x, y, z);
    key.ancestors = ancestor_count;
    key
}

// ===== ORDERING =====
//
// Equality and ordering only look at the populated path.

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for Key {}

impl Ord for Key {
    /// Lexicographic over the shared prefix, then the shorter path first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.path().cmp(other.path())
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hash) in self.path().iter().enumerate() {
            if i > 0 {
                write!(f, " / ")?;
            }
            write!(f, "{}", hash)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key[{}]", self)
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
