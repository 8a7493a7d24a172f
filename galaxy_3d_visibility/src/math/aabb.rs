//! Axis-aligned bounding box in centre + half-extents form.
//!
//! Every constructor normalises to `center`/`extents` with non-negative
//! extents. Degenerate (flat or point) boxes are legal values.

use std::fmt;
use glam::{Mat4, Vec3};

/// Axis-Aligned Bounding Box
///
/// World-space bounds consumed by the spatial indexes. Value type:
/// recomputed by the owner whenever its transform changes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AABB {
    center: Vec3,
    extents: Vec3,
}

impl AABB {
    /// Box from a centre and half-widths (negative half-widths are flipped).
    pub fn new(center: Vec3, extents: Vec3) -> Self {
        Self { center, extents: extents.abs() }
    }

    /// Box spanning two opposite corners, in any order.
    pub fn from_min_max(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self {
            center: (min + max) * 0.5,
            extents: (max - min) * 0.5,
        }
    }

    /// Cube of edge `width` centred on `centre`.
    pub fn from_centre_width(centre: Vec3, width: f32) -> Self {
        Self::new(centre, Vec3::splat(width * 0.5))
    }

    /// Box of full edge lengths `size` centred on `centre`.
    pub fn from_centre_size(centre: Vec3, size: Vec3) -> Self {
        Self::new(centre, size * 0.5)
    }

    /// Tightest box around a point cloud. An empty cloud gives a zero box
    /// at the origin.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Self::default();
        };

        let (min, max) = rest.iter().fold((*first, *first), |(min, max), p| {
            (min.min(*p), max.max(*p))
        });
        Self::from_min_max(min, max)
    }

    // ===== ACCESSORS =====

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Half-widths on each axis (always >= 0)
    pub fn extents(&self) -> Vec3 {
        self.extents
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }

    pub fn width(&self) -> f32 {
        self.extents.x * 2.0
    }

    pub fn height(&self) -> f32 {
        self.extents.y * 2.0
    }

    pub fn depth(&self) -> f32 {
        self.extents.z * 2.0
    }

    /// Full edge lengths (width, height, depth)
    pub fn dimensions(&self) -> Vec3 {
        self.extents * 2.0
    }

    pub fn max_dimension(&self) -> f32 {
        self.dimensions().max_element()
    }

    /// The 8 corners: bottom face (y = min) then top face (y = max),
    /// each wound min.x/min.z → max.x → max.z → back to min.x.
    pub fn corners(&self) -> [Vec3; 8] {
        let min = self.min();
        let max = self.max();
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ]
    }

    /// True if two or more dimensions are zero (a line or a point).
    pub fn has_zero_area(&self) -> bool {
        let empty_x = self.extents.x == 0.0;
        let empty_y = self.extents.y == 0.0;
        let empty_z = self.extents.z == 0.0;

        (empty_x && empty_y) || (empty_x && empty_z) || (empty_y && empty_z)
    }

    // ===== TESTS =====

    /// Inclusive point test.
    pub fn contains_point(&self, p: Vec3) -> bool {
        let d = (p - self.center).abs();
        d.x <= self.extents.x && d.y <= self.extents.y && d.z <= self.extents.z
    }

    /// Returns `true` if `other` is entirely within `self`.
    pub fn contains_aabb(&self, other: &AABB) -> bool {
        let (min, max) = (self.min(), self.max());
        let (omin, omax) = (other.min(), other.max());
        min.x <= omin.x && max.x >= omax.x
        && min.y <= omin.y && max.y >= omax.y
        && min.z <= omin.z && max.z >= omax.z
    }

    /// Returns `true` if the two boxes overlap or touch.
    pub fn intersects_aabb(&self, other: &AABB) -> bool {
        let d = (self.center - other.center).abs();
        let r = self.extents + other.extents;
        d.x <= r.x && d.y <= r.y && d.z <= r.z
    }

    /// Returns `true` if the sphere of the given *diameter* overlaps the box.
    /// Touching does not count.
    pub fn intersects_sphere(&self, centre: Vec3, diameter: f32) -> bool {
        let radius = diameter * 0.5;
        let outside = ((self.min() - centre).max(Vec3::ZERO))
            + ((centre - self.max()).max(Vec3::ZERO));

        outside.x < radius
            && outside.y < radius
            && outside.z < radius
            && outside.length_squared() < radius * radius
    }

    // ===== DERIVED BOXES =====

    /// Smallest box containing both `self` and `other`.
    pub fn merged(&self, other: &AABB) -> AABB {
        AABB::from_min_max(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Grow in place to include `other`.
    pub fn encapsulate(&mut self, other: &AABB) {
        *self = self.merged(other);
    }

    /// Grow in place to include `point`.
    pub fn encapsulate_point(&mut self, point: Vec3) {
        *self = AABB::from_min_max(self.min().min(point), self.max().max(point));
    }

    /// Transform this box by a matrix, returning the new world-space box.
    ///
    /// Uses the Arvo method: projects the extents onto the absolute 3x3
    /// part of the matrix, exact for any rotation/scale without touching
    /// the 8 corners.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let center = matrix.transform_point3(self.center);
        let extents = matrix.col(0).truncate().abs() * self.extents.x
            + matrix.col(1).truncate().abs() * self.extents.y
            + matrix.col(2).truncate().abs() * self.extents.z;

        AABB { center, extents }
    }
}

impl fmt::Display for AABB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AABB({}, {})", self.min(), self.max())
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
