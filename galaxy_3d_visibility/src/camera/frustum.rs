/// Frustum: six clipping planes plus the eight corners they enclose.
///
/// Each plane is stored as a normalized `Plane` whose normal points inward:
/// a point P is inside the frustum if `plane.distance_to(P) >= 0` for all
/// six planes.
///
/// Planes are extracted with the `-w <= z <= w` clip convention. With a
/// `[0, 1]` depth projection (glam's `perspective_rh`) the near plane lands
/// slightly closer to the eye than the projection's own, which only ever
/// makes culling more conservative.

use glam::{Mat4, Vec3, Vec4};
use crate::math::{AABB, Plane};

/// Result of a 3-way frustum/AABB classification.
///
/// - `Outside` → skip the entire subtree
/// - `Inside` → collect all objects without further testing
/// - `Partial` → test individual objects and recurse into children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumTest {
    /// AABB is entirely outside the frustum
    Outside,
    /// AABB is entirely inside the frustum
    Inside,
    /// AABB partially overlaps the frustum
    Partial,
}

/// Frustum plane indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrustumPlane {
    Left = 0,
    Right = 1,
    Bottom = 2,
    Top = 3,
    Near = 4,
    Far = 5,
}

/// Corner indices, shared by the near and far quads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrustumCorner {
    BottomLeft = 0,
    BottomRight = 1,
    TopRight = 2,
    TopLeft = 3,
}

/// Six frustum planes and their corner points.
///
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far
    planes: [Plane; 6],
    /// Indexed by `FrustumCorner`
    near_corners: [Vec3; 4],
    far_corners: [Vec3; 4],
    /// False when the far quad has no solution (infinite far plane)
    finite_far: bool,
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method. Corners are the triple-plane
    /// intersections of each side pair with the near and far planes. A
    /// corner with no solution is left at the origin; for the far quad
    /// (e.g. `perspective_infinite_rh`) `has_finite_far` then reports false.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d();

        // Gribb & Hartmann: extract planes from rows of the VP matrix
        let coefficients = [
            // Left:   row3 + row0
            Vec4::new(m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]),
            // Right:  row3 - row0
            Vec4::new(m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]),
            // Bottom: row3 + row1
            Vec4::new(m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]),
            // Top:    row3 - row1
            Vec4::new(m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]),
            // Near:   row3 + row2
            Vec4::new(m[0][3] + m[0][2], m[1][3] + m[1][2], m[2][3] + m[2][2], m[3][3] + m[3][2]),
            // Far:    row3 - row2
            Vec4::new(m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]),
        ];

        let planes = coefficients.map(|c| Plane::from_vec4(c).normalized());

        let corner = |a: FrustumPlane, b: FrustumPlane, c: FrustumPlane| {
            Plane::intersection(&planes[a as usize], &planes[b as usize], &planes[c as usize])
                .filter(|p| p.is_finite())
        };

        use FrustumPlane::*;
        let near_corners = [
            corner(Left, Bottom, Near),
            corner(Right, Bottom, Near),
            corner(Right, Top, Near),
            corner(Left, Top, Near),
        ];
        let far_corners = [
            corner(Left, Bottom, Far),
            corner(Right, Bottom, Far),
            corner(Right, Top, Far),
            corner(Left, Top, Far),
        ];

        Self {
            planes,
            near_corners: near_corners.map(|c| c.unwrap_or(Vec3::ZERO)),
            far_corners: far_corners.map(|c| c.unwrap_or(Vec3::ZERO)),
            finite_far: far_corners.iter().all(Option::is_some),
        }
    }

    // ===== ACCESSORS =====

    pub fn plane(&self, which: FrustumPlane) -> &Plane {
        &self.planes[which as usize]
    }

    /// All six planes in `FrustumPlane` order.
    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    pub fn near_corners(&self) -> &[Vec3; 4] {
        &self.near_corners
    }

    pub fn far_corners(&self) -> &[Vec3; 4] {
        &self.far_corners
    }

    pub fn near_corner(&self, corner: FrustumCorner) -> Vec3 {
        self.near_corners[corner as usize]
    }

    pub fn far_corner(&self, corner: FrustumCorner) -> Vec3 {
        self.far_corners[corner as usize]
    }

    /// Whether the far quad exists. When false, `far_corners`, `depth` and
    /// the far-based dimensions are meaningless.
    pub fn has_finite_far(&self) -> bool {
        self.finite_far
    }

    // ===== DIMENSIONS =====

    pub fn near_width(&self) -> f32 {
        quad_width(&self.near_corners)
    }

    pub fn near_height(&self) -> f32 {
        quad_height(&self.near_corners)
    }

    pub fn far_width(&self) -> f32 {
        quad_width(&self.far_corners)
    }

    pub fn far_height(&self) -> f32 {
        quad_height(&self.far_corners)
    }

    /// Distance between the centres of the near and far quads.
    pub fn depth(&self) -> f32 {
        (centroid(&self.far_corners) - centroid(&self.near_corners)).length()
    }

    /// Unit vector from the near quad centre towards the far quad centre.
    pub fn direction(&self) -> Vec3 {
        (centroid(&self.far_corners) - centroid(&self.near_corners)).normalize_or_zero()
    }

    /// Vertical field of view in radians, from the angle between the top
    /// and near planes.
    pub fn field_of_view(&self) -> f32 {
        let c = self.plane(FrustumPlane::Top).normal.dot(self.plane(FrustumPlane::Near).normal);
        2.0 * (c / (1.0 - c * c).sqrt()).atan()
    }

    /// Far-plane width / height.
    pub fn aspect_ratio(&self) -> f32 {
        self.far_width() / self.far_height()
    }

    pub fn height_at_distance(&self, distance: f32) -> f32 {
        2.0 * distance * (self.field_of_view() * 0.5).tan()
    }

    pub fn width_at_distance(&self, distance: f32) -> f32 {
        self.height_at_distance(distance) * self.aspect_ratio()
    }

    // ===== CONTAINMENT =====

    /// Returns `false` if the point is behind any plane.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.distance_to(point) >= 0.0)
    }

    /// Returns `false` if the sphere lies entirely behind any plane.
    pub fn intersects_sphere(&self, centre: Vec3, radius: f32) -> bool {
        self.planes.iter().all(|plane| plane.distance_to(centre) >= -radius)
    }

    /// Test if an AABB intersects this frustum.
    ///
    /// Uses the "positive vertex" test: for each plane, find the AABB corner
    /// most in the direction of the plane normal. If that corner is outside,
    /// the AABB is fully outside.
    ///
    /// Returns `true` if the AABB is (potentially) inside or intersecting.
    /// May return false positives (conservative), never false negatives.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        let (min, max) = (aabb.min(), aabb.max());

        for plane in &self.planes {
            let p_vertex = positive_vertex(plane.normal, min, max);

            // If the positive vertex is outside this plane, the AABB is fully outside
            if plane.distance_to(p_vertex) < 0.0 {
                return false;
            }
        }

        true
    }

    /// `intersects_aabb` for a cube of edge `width` centred on `centre`.
    pub fn intersects_cube(&self, centre: Vec3, width: f32) -> bool {
        self.intersects_aabb(&AABB::from_centre_width(centre, width))
    }

    /// Classify an AABB against the frustum (3-way test).
    ///
    /// Tests both the positive vertex (p-vertex) and negative vertex (n-vertex)
    /// against each plane:
    /// - If the p-vertex is outside any plane → `Outside` (early out)
    /// - If the n-vertex is outside any plane → at least `Partial`
    /// - If all n-vertices are inside all planes → `Inside`
    pub fn classify_aabb(&self, aabb: &AABB) -> FrustumTest {
        let (min, max) = (aabb.min(), aabb.max());
        let mut all_inside = true;

        for plane in &self.planes {
            if plane.distance_to(positive_vertex(plane.normal, min, max)) < 0.0 {
                return FrustumTest::Outside;
            }

            // Negative vertex: the p-vertex with min and max swapped
            if plane.distance_to(positive_vertex(plane.normal, max, min)) < 0.0 {
                all_inside = false;
            }
        }

        if all_inside { FrustumTest::Inside } else { FrustumTest::Partial }
    }
}

/// Corner of `[min, max]` most aligned with `normal`.
fn positive_vertex(normal: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    Vec3::new(
        if normal.x >= 0.0 { max.x } else { min.x },
        if normal.y >= 0.0 { max.y } else { min.y },
        if normal.z >= 0.0 { max.z } else { min.z },
    )
}

fn centroid(corners: &[Vec3; 4]) -> Vec3 {
    corners.iter().copied().sum::<Vec3>() / 4.0
}

fn quad_width(corners: &[Vec3; 4]) -> f32 {
    corners[FrustumCorner::BottomLeft as usize].distance(corners[FrustumCorner::BottomRight as usize])
}

fn quad_height(corners: &[Vec3; 4]) -> f32 {
    corners[FrustumCorner::BottomLeft as usize].distance(corners[FrustumCorner::TopLeft as usize])
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
