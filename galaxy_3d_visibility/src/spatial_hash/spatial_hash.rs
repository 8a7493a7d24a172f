//! SpatialHash: hierarchical grid spatial hash.
//!
//! Each object is stored under the keys of its 8 box corners at the
//! smallest power-of-two cell size that is at least as wide as the box, so
//! a box never spans more than 2 cells per axis at its own level.
//!
//! Box queries find:
//! - smaller objects in the query cells with a forward range scan (their
//!   keys extend the query key's path and sort right after it)
//! - larger objects by walking up the query key's ancestors with exact
//!   lookups
//!
//! Coordinates hash to 16-bit cells, so objects must stay within
//! `±ROOT_CELL_SIZE` on every axis.

use std::collections::{BTreeMap, BTreeSet};
use glam::Vec3;
use rustc_hash::FxHashMap;
use crate::camera::{Frustum, FrustumPlane};
use crate::math::AABB;
use super::key::{Key, make_key, ROOT_CELL_SIZE};

/// Default number of slices a frustum is cut into for queries.
pub const DEFAULT_FRUSTUM_SLICES: u32 = 5;

/// Upper bound on tiles per quadrant axis in one frustum slice.
const MAX_TILES_PER_AXIS: u32 = 64;

/// Bucket operations performed by one `update_object_for_box`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateStats {
    /// Keys the object was newly inserted under
    pub inserted: usize,
    /// Stale keys the object was removed from
    pub removed: usize,
}

impl UpdateStats {
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.removed == 0
    }
}

/// Hierarchical grid spatial hash over entries of type `E`.
///
/// Entries are small handles held by value. The hash remembers the keys
/// each entry was inserted under, so removal and updates never need the
/// old bounds.
#[derive(Debug, Clone)]
pub struct SpatialHash<E> {
    index: BTreeMap<Key, BTreeSet<E>>,
    entry_keys: FxHashMap<E, BTreeSet<Key>>,
    frustum_slices: u32,
}

impl<E> Default for SpatialHash<E> {
    fn default() -> Self {
        Self {
            index: BTreeMap::new(),
            entry_keys: FxHashMap::default(),
            frustum_slices: DEFAULT_FRUSTUM_SLICES,
        }
    }
}

impl<E: Copy + Ord + std::hash::Hash> SpatialHash<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slices `find_objects_within_frustum` cuts the frustum
    /// depth into. Clamped to at least 1.
    pub fn with_frustum_slices(mut self, slices: u32) -> Self {
        self.frustum_slices = slices.max(1);
        self
    }

    pub fn frustum_slices(&self) -> u32 {
        self.frustum_slices
    }

    // ===== WRITES =====

    /// Insert `entry` under the keys of `aabb`'s corners. Inserting an entry
    /// again adds the new keys to the ones it already has.
    pub fn insert_object_for_box(&mut self, aabb: &AABB, entry: E) {
        for key in keys_for_box(aabb) {
            self.insert_object_for_key(key, entry);
        }
    }

    /// Remove `entry` from every key it is stored under, dropping buckets
    /// that become empty. Returns `false` if the entry was not stored.
    pub fn remove_object(&mut self, entry: E) -> bool {
        let Some(keys) = self.entry_keys.remove(&entry) else {
            return false;
        };

        for key in &keys {
            self.remove_object_from_key(key, entry);
        }
        true
    }

    /// Move `entry` to the keys of `aabb`, touching only the keys that
    /// changed. An unknown entry is inserted.
    pub fn update_object_for_box(&mut self, aabb: &AABB, entry: E) -> UpdateStats {
        let new_keys = keys_for_box(aabb);
        let old_keys = self.entry_keys.remove(&entry).unwrap_or_default();

        let mut stats = UpdateStats::default();

        for stale in old_keys.difference(&new_keys) {
            self.remove_object_from_key(stale, entry);
            stats.removed += 1;
        }

        for fresh in new_keys.difference(&old_keys) {
            self.index.entry(*fresh).or_default().insert(entry);
            stats.inserted += 1;
        }

        self.entry_keys.insert(entry, new_keys);
        stats
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.entry_keys.clear();
    }

    fn insert_object_for_key(&mut self, key: Key, entry: E) {
        self.index.entry(key).or_default().insert(entry);
        self.entry_keys.entry(entry).or_default().insert(key);
    }

    fn remove_object_from_key(&mut self, key: &Key, entry: E) {
        if let Some(bucket) = self.index.get_mut(key) {
            bucket.remove(&entry);
            if bucket.is_empty() {
                self.index.remove(key);
            }
        }
    }

    // ===== QUERIES =====

    /// Every entry stored in a cell that overlaps the cells of `aabb`'s
    /// corners, at any level.
    pub fn find_objects_within_box(&self, aabb: &AABB) -> BTreeSet<E> {
        let mut objects = BTreeSet::new();
        self.gather_box(aabb, &mut objects);
        objects
    }

    /// Entries that may be inside the frustum. Over-inclusive: an entry is
    /// never missed, but nearby entries outside the frustum may be returned.
    ///
    /// A frustum without a far quad cannot be tiled, so every entry is
    /// returned.
    pub fn find_objects_within_frustum(&self, frustum: &Frustum) -> BTreeSet<E> {
        let mut objects = BTreeSet::new();
        if self.index.is_empty() {
            return objects;
        }

        if !frustum.has_finite_far() {
            objects.extend(self.entry_keys.keys().copied());
            return objects;
        }

        let box_size = frustum.depth() / self.frustum_slices as f32;
        for aabb in generate_boxes_for_frustum(frustum, box_size) {
            self.gather_box(&aabb, &mut objects);
        }
        objects
    }

    fn gather_box(&self, aabb: &AABB, objects: &mut BTreeSet<E>) {
        let mut seen = BTreeSet::new();

        for key in keys_for_box(aabb) {
            if seen.insert(key) {
                self.gather_key(&key, objects);
            }
        }
    }

    fn gather_key(&self, key: &Key, objects: &mut BTreeSet<E>) {
        // Descendants (and the key itself) sort contiguously from the key
        for (_, bucket) in self.index.range(key..).take_while(|(k, _)| key.is_ancestor_of(k)) {
            objects.extend(bucket.iter().copied());
        }

        // Ancestors: exact lookups up to the root
        let mut path = *key;
        while !path.is_root() {
            path = path.parent_key();
            if let Some(bucket) = self.index.get(&path) {
                objects.extend(bucket.iter().copied());
            }
        }
    }

    // ===== INSPECTION =====

    /// Keys `entry` is currently stored under.
    pub fn keys_for(&self, entry: E) -> Option<&BTreeSet<Key>> {
        self.entry_keys.get(&entry)
    }

    pub fn contains(&self, entry: E) -> bool {
        self.entry_keys.contains_key(&entry)
    }

    /// Number of distinct entries stored.
    pub fn len(&self) -> usize {
        self.entry_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_keys.is_empty()
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.index.len()
    }
}

/// Smallest power of two (at least 1) that is >= the box's largest
/// dimension, capped at the root cell size.
pub fn find_cell_size_for_box(aabb: &AABB) -> i32 {
    let max_dimension = aabb.max_dimension();
    let mut k = 1;

    while (k as f32) < max_dimension && k < ROOT_CELL_SIZE {
        k *= 2;
    }

    k
}

/// Distinct keys of the 8 corners of `aabb` at its cell size.
fn keys_for_box(aabb: &AABB) -> BTreeSet<Key> {
    let cell_size = find_cell_size_for_box(aabb);
    aabb.corners()
        .iter()
        .map(|c| make_key(cell_size, c.x, c.y, c.z))
        .collect()
}

/// Cover the frustum with world-space boxes about `box_size` wide.
///
/// Marches from the centre of the near quad along the view direction in
/// steps of `box_size`. Each slice is tiled outward from the centre line
/// in four quadrants until the frustum cross-section at both ends of the
/// slice is covered. Each tile is an oriented cell (right × up ×
/// direction), returned as the AABB of its 8 corners.
///
/// Returns nothing for a frustum without a far quad.
pub fn generate_boxes_for_frustum(frustum: &Frustum, box_size: f32) -> Vec<AABB> {
    let mut results = Vec::new();

    let depth = frustum.depth();
    let usable = frustum.has_finite_far()
        && box_size.is_finite()
        && box_size > 0.0
        && depth.is_finite();
    if !usable {
        return results;
    }

    let near_plane = frustum.plane(FrustumPlane::Near);
    let direction = frustum.direction();
    let up = near_plane.project(frustum.plane(FrustumPlane::Bottom).normal).normalize_or_zero();
    let right = near_plane.project(frustum.plane(FrustumPlane::Left).normal).normalize_or_zero();

    let near = frustum.near_corners();
    let far = frustum.far_corners();
    let near_centre = centroid(near);
    let far_centre = centroid(far);

    let slices = (depth / box_size).ceil().max(1.0) as u32;
    let mut start_point = near_centre;

    for i in 0..slices {
        // Half extents of the cross-section at both ends of the slice
        let mut half_width = 0.0f32;
        let mut half_height = 0.0f32;
        for d in [i as f32 * box_size, (i + 1) as f32 * box_size] {
            let t = if depth > 0.0 { (d / depth).min(1.0) } else { 0.0 };
            let centre = near_centre.lerp(far_centre, t);
            for k in 0..4 {
                let offset = near[k].lerp(far[k], t) - centre;
                half_width = half_width.max(offset.dot(right).abs());
                half_height = half_height.max(offset.dot(up).abs());
            }
        }

        if !half_width.is_finite() || !half_height.is_finite() {
            break;
        }

        // Very wide, shallow frustums get wider tiles instead of more of them
        let tile = box_size.max(half_width.max(half_height) / MAX_TILES_PER_AXIS as f32);

        let mut x = 0.0;
        loop {
            let mut y = 0.0;
            loop {
                for (sr, su) in [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0)] {
                    results.push(oriented_cell(
                        start_point,
                        (right * sr, up * su, direction),
                        Vec3::new(x, y, 0.0),
                        Vec3::new(tile, tile, box_size),
                    ));
                }

                y += tile;
                if y >= half_height {
                    break;
                }
            }

            x += tile;
            if x >= half_width {
                break;
            }
        }

        start_point += direction * box_size;
    }

    results
}

/// AABB of the cell `[min, min + size]` expressed in the `axes` frame
/// anchored at `origin`.
fn oriented_cell(origin: Vec3, axes: (Vec3, Vec3, Vec3), min: Vec3, size: Vec3) -> AABB {
    let (ax, ay, az) = axes;
    let max = min + size;

    let mut points = [Vec3::ZERO; 8];
    let mut n = 0;
    for dx in [min.x, max.x] {
        for dy in [min.y, max.y] {
            for dz in [min.z, max.z] {
                points[n] = origin + ax * dx + ay * dy + az * dz;
                n += 1;
            }
        }
    }
    AABB::from_points(&points)
}

fn centroid(corners: &[Vec3; 4]) -> Vec3 {
    corners.iter().copied().sum::<Vec3>() / 4.0
}

#[cfg(test)]
#[path = "spatial_hash_tests.rs"]
mod tests;
