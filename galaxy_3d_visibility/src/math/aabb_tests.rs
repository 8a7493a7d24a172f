use glam::{Mat4, Quat, Vec3};
use super::*;

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < 1e-5
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_from_min_max_normalises_order() {
    let aabb = AABB::from_min_max(Vec3::new(1.0, -1.0, 4.0), Vec3::new(-1.0, 1.0, 2.0));

    assert_eq!(aabb.min(), Vec3::new(-1.0, -1.0, 2.0));
    assert_eq!(aabb.max(), Vec3::new(1.0, 1.0, 4.0));
    assert_eq!(aabb.center(), Vec3::new(0.0, 0.0, 3.0));
    assert_eq!(aabb.extents(), Vec3::new(1.0, 1.0, 1.0));
}

#[test]
fn test_from_centre_width() {
    let aabb = AABB::from_centre_width(Vec3::splat(150.0), 1.0);

    assert_eq!(aabb.min(), Vec3::splat(149.5));
    assert_eq!(aabb.max(), Vec3::splat(150.5));
    assert_eq!(aabb.max_dimension(), 1.0);
}

#[test]
fn test_from_centre_size() {
    let aabb = AABB::from_centre_size(Vec3::ZERO, Vec3::new(2.0, 4.0, 0.0));

    assert_eq!(aabb.width(), 2.0);
    assert_eq!(aabb.height(), 4.0);
    assert_eq!(aabb.depth(), 0.0);
    assert_eq!(aabb.dimensions(), Vec3::new(2.0, 4.0, 0.0));
}

#[test]
fn test_new_flips_negative_extents() {
    let aabb = AABB::new(Vec3::ZERO, Vec3::new(-1.0, 2.0, -3.0));
    assert_eq!(aabb.extents(), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_from_points() {
    let aabb = AABB::from_points(&[
        Vec3::new(-4.5, 4.5, -4.5),
        Vec3::new(-4.6, 4.5, -4.6),
        Vec3::new(-4.5, 4.5, -4.6),
    ]);

    assert!(approx(aabb.min(), Vec3::new(-4.6, 4.5, -4.6)));
    assert!(approx(aabb.max(), Vec3::new(-4.5, 4.5, -4.5)));
}

#[test]
fn test_from_points_empty_is_zero_box() {
    let aabb = AABB::from_points(&[]);
    assert_eq!(aabb.center(), Vec3::ZERO);
    assert_eq!(aabb.extents(), Vec3::ZERO);
}

// ============================================================================
// Corners / degenerate boxes
// ============================================================================

#[test]
fn test_corner_order() {
    let aabb = AABB::from_min_max(Vec3::ZERO, Vec3::ONE);
    let c = aabb.corners();

    assert_eq!(c[0], Vec3::new(0.0, 0.0, 0.0));
    assert_eq!(c[1], Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(c[2], Vec3::new(1.0, 0.0, 1.0));
    assert_eq!(c[3], Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(c[4], Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(c[5], Vec3::new(1.0, 1.0, 0.0));
    assert_eq!(c[6], Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(c[7], Vec3::new(0.0, 1.0, 1.0));
}

#[test]
fn test_has_zero_area() {
    let flat = AABB::from_centre_size(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
    let line = AABB::from_centre_size(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
    let point = AABB::from_centre_size(Vec3::ZERO, Vec3::ZERO);

    assert!(!flat.has_zero_area());
    assert!(line.has_zero_area());
    assert!(point.has_zero_area());
}

// ============================================================================
// Containment / intersection
// ============================================================================

#[test]
fn test_contains_point_is_inclusive() {
    let aabb = AABB::from_centre_width(Vec3::ZERO, 2.0);

    assert!(aabb.contains_point(Vec3::ZERO));
    assert!(aabb.contains_point(Vec3::new(1.0, 1.0, 1.0)));
    assert!(!aabb.contains_point(Vec3::new(1.01, 0.0, 0.0)));
}

#[test]
fn test_contains_aabb() {
    let outer = AABB::from_centre_width(Vec3::ZERO, 10.0);
    let inner = AABB::from_centre_width(Vec3::new(2.0, 0.0, 0.0), 2.0);
    let straddling = AABB::from_centre_width(Vec3::new(5.0, 0.0, 0.0), 2.0);

    assert!(outer.contains_aabb(&inner));
    assert!(outer.contains_aabb(&outer));
    assert!(!outer.contains_aabb(&straddling));
    assert!(!inner.contains_aabb(&outer));
}

#[test]
fn test_intersects_aabb() {
    let a = AABB::from_min_max(Vec3::ZERO, Vec3::ONE);
    let touching = AABB::from_min_max(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
    let apart = AABB::from_min_max(Vec3::new(1.5, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));

    assert!(a.intersects_aabb(&touching));
    assert!(touching.intersects_aabb(&a));
    assert!(!a.intersects_aabb(&apart));
}

#[test]
fn test_intersects_sphere_takes_diameter() {
    let aabb = AABB::from_centre_width(Vec3::ZERO, 2.0);

    // Centre inside
    assert!(aabb.intersects_sphere(Vec3::ZERO, 0.1));
    // 0.5 away from the +x face: diameter 2 reaches, diameter 0.8 does not
    assert!(aabb.intersects_sphere(Vec3::new(1.5, 0.0, 0.0), 2.0));
    assert!(!aabb.intersects_sphere(Vec3::new(1.5, 0.0, 0.0), 0.8));
    // Near a corner, inside on each axis but not diagonally
    assert!(!aabb.intersects_sphere(Vec3::new(1.5, 1.5, 1.5), 1.2));
}

// ============================================================================
// Derived boxes
// ============================================================================

#[test]
fn test_merged_and_encapsulate() {
    let a = AABB::from_centre_width(Vec3::ZERO, 2.0);
    let b = AABB::from_centre_width(Vec3::new(4.0, 0.0, 0.0), 2.0);

    let merged = a.merged(&b);
    assert_eq!(merged.min(), Vec3::new(-1.0, -1.0, -1.0));
    assert_eq!(merged.max(), Vec3::new(5.0, 1.0, 1.0));

    let mut c = a;
    c.encapsulate(&b);
    assert_eq!(c, merged);

    c.encapsulate_point(Vec3::new(0.0, 10.0, 0.0));
    assert_eq!(c.max().y, 10.0);
}

#[test]
fn test_transformed_translation() {
    let aabb = AABB::from_centre_width(Vec3::ZERO, 2.0);
    let moved = aabb.transformed(&Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0)));

    assert!(approx(moved.min(), Vec3::new(2.0, -1.0, -1.0)));
    assert!(approx(moved.max(), Vec3::new(4.0, 1.0, 1.0)));
}

#[test]
fn test_transformed_rotation_grows_box() {
    let aabb = AABB::from_centre_size(Vec3::ZERO, Vec3::new(2.0, 2.0, 0.0));
    let rotated = aabb.transformed(&Mat4::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_4)));

    // 45° about Z: half-diagonal of a 2x2 square is sqrt(2)
    let half = 2.0_f32.sqrt();
    assert!(approx(rotated.extents(), Vec3::new(half, half, 0.0)));
}

#[test]
fn test_display() {
    let aabb = AABB::from_min_max(Vec3::ZERO, Vec3::ONE);
    assert_eq!(format!("{}", aabb), "AABB([0, 0, 0], [1, 1, 1])");
}
