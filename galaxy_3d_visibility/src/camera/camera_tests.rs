use glam::{Mat4, Vec3};
use crate::math::AABB;
use super::*;

fn test_projection() -> Mat4 {
    Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_camera_new() {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let proj = test_projection();

    let camera = Camera::new(view, proj);

    assert_eq!(*camera.view_matrix(), view);
    assert_eq!(*camera.projection_matrix(), proj);
    assert_eq!(*camera.frustum(), Frustum::from_view_projection(&(proj * view)));
}

// ============================================================================
// view_projection_matrix
// ============================================================================

#[test]
fn test_view_projection_matrix() {
    let view = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let proj = Mat4::from_scale(Vec3::splat(2.0));
    let camera = Camera::new(view, proj);

    assert_eq!(camera.view_projection_matrix(), proj * view);
}

// ============================================================================
// Setters refresh the frustum
// ============================================================================

#[test]
fn test_set_view_rebuilds_frustum() {
    let mut camera = Camera::new(Mat4::IDENTITY, test_projection());
    let ahead = AABB::from_centre_width(Vec3::new(0.0, 0.0, -10.0), 1.0);
    assert!(camera.frustum().intersects_aabb(&ahead));

    // Turn around: the box is now behind the camera
    camera.set_view(Mat4::look_at_rh(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::Y));
    assert!(!camera.frustum().intersects_aabb(&ahead));
}

#[test]
fn test_set_projection_rebuilds_frustum() {
    let mut camera = Camera::new(Mat4::IDENTITY, test_projection());
    let distant = AABB::from_centre_width(Vec3::new(0.0, 0.0, -50.0), 1.0);
    assert!(camera.frustum().intersects_aabb(&distant));

    camera.set_projection(Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 20.0));
    assert!(!camera.frustum().intersects_aabb(&distant));
}
