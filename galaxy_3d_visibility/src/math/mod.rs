//! Math module: bounding volumes and planes used by the culling code.

mod aabb;
mod plane;

pub use aabb::AABB;
pub use plane::{Plane, PlaneClassification};
