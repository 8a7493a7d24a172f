//! Camera module: camera and frustum.
//!
//! Provides the query side of visibility: a camera owned and driven by the
//! caller, and the frustum every index culls against.

mod camera;
mod frustum;

pub use camera::Camera;
pub use frustum::{Frustum, FrustumCorner, FrustumPlane, FrustumTest};
