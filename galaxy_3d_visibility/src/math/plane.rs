/// Plane in `normal · p + distance = 0` form.
///
/// Frustum planes are stored this way with the normal pointing into the
/// visible volume, so a point is *behind* a plane when the signed distance
/// is negative.

use glam::{Vec3, Vec4};

/// Side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneClassification {
    /// Signed distance < 0
    Behind,
    /// Signed distance == 0
    OnPlane,
    /// Signed distance > 0
    InFront,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Build from packed (A, B, C, D) coefficients.
    pub fn from_vec4(coefficients: Vec4) -> Self {
        Self {
            normal: coefficients.truncate(),
            distance: coefficients.w,
        }
    }

    /// Rescale so the normal has unit length. A zero normal is left as-is.
    pub fn normalized(self) -> Self {
        let len = self.normal.length();
        if len > 0.0 {
            Self {
                normal: self.normal / len,
                distance: self.distance / len,
            }
        } else {
            self
        }
    }

    /// Signed distance from the plane (positive on the normal side).
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    pub fn classify_point(&self, point: Vec3) -> PlaneClassification {
        let d = self.distance_to(point);
        if d < 0.0 {
            PlaneClassification::Behind
        } else if d > 0.0 {
            PlaneClassification::InFront
        } else {
            PlaneClassification::OnPlane
        }
    }

    /// Project a direction onto the plane: `v - n (n · v)`.
    pub fn project(&self, v: Vec3) -> Vec3 {
        v - self.normal * self.normal.dot(v)
    }

    /// Point shared by three planes, or `None` when two of them are parallel.
    pub fn intersection(a: &Plane, b: &Plane, c: &Plane) -> Option<Vec3> {
        let denom = a.normal.dot(b.normal.cross(c.normal));
        if denom.abs() < f32::EPSILON {
            return None;
        }

        let point = (b.normal.cross(c.normal) * -a.distance
            + c.normal.cross(a.normal) * -b.distance
            + a.normal.cross(b.normal) * -c.distance)
            / denom;

        Some(point)
    }
}

#[cfg(test)]
#[path = "plane_tests.rs"]
mod tests;
