//! Integration tests for the visibility indexes
//!
//! Drives the public API only: octree placement and traversal, the spatial
//! hash frustum query, and a partitioner frame loop.
//!
//! Run with: cargo test --test visibility_integration_tests

use galaxy_3d_visibility::galaxy3d::camera::{Camera, Frustum};
use galaxy_3d_visibility::galaxy3d::math::AABB;
use galaxy_3d_visibility::galaxy3d::octree::{LooseOctree, OctreeCuller};
use galaxy_3d_visibility::galaxy3d::partitioner::{
    ActorKey, CullingMode, DynPartitioner, LightKey, RenderableHandle,
};
use galaxy_3d_visibility::galaxy3d::spatial_hash::SpatialHash;
use galaxy_3d_visibility::galaxy3d::{IndexBackend, PartitionerConfig};
use galaxy_3d_visibility::glam::{Mat4, Vec3};
use slotmap::SlotMap;

// ============================================================================
// LOOSE OCTREE
// ============================================================================

#[test]
fn test_integration_octree_triangle_scenario() {
    let mut octree: LooseOctree<Vec<u32>> = LooseOctree::new(&AABB::from_centre_width(Vec3::ZERO, 10.0), 2).unwrap();

    let triangle = [
        Vec3::new(-4.5, 4.5, -4.5),
        Vec3::new(-4.6, 4.5, -4.6),
        Vec3::new(-4.5, 4.5, -4.6),
    ];
    let destination = octree.find_destination_for_triangle(&triangle).unwrap();
    octree.node_mut(destination).unwrap().data_mut().push(0);

    let node = octree.node(destination).unwrap();
    assert_eq!(node.level(), 1);
    assert_eq!(node.grid(), [0, 1, 0]);

    // The look-at matrix alone, used as the view-projection
    let frustum = Frustum::from_view_projection(&Mat4::look_at_rh(
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 0.0, -10.0),
        Vec3::Y,
    ));

    let mut visited = Vec::new();
    let mut triangles = Vec::new();
    octree.traverse_visible(&frustum, |node| {
        visited.push(node.grid());
        triangles.extend_from_slice(node.data());
    });

    assert_eq!(visited.len(), 5);
    assert!(visited.iter().all(|grid| grid[2] == 0));
    assert_eq!(triangles, vec![0]);
}

#[test]
fn test_integration_octree_culler_mesh() {
    // A quad on the -Z side and one on the +Z side of the origin
    let vertices = [
        Vec3::new(-1.0, -1.0, -10.0),
        Vec3::new(1.0, -1.0, -10.0),
        Vec3::new(1.0, 1.0, -10.0),
        Vec3::new(-1.0, 1.0, -10.0),
        Vec3::new(-1.0, -1.0, 10.0),
        Vec3::new(1.0, -1.0, 10.0),
        Vec3::new(1.0, 1.0, 10.0),
        Vec3::new(-1.0, 1.0, 10.0),
    ];

    let mut culler = OctreeCuller::new(&vertices, 3);
    culler.add_submesh(0, &[0, 1, 2, 0, 2, 3]).unwrap();
    culler.add_submesh(1, &[4, 5, 6, 4, 6, 7]).unwrap();
    culler.compile().unwrap();

    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 1.0, 0.1, 100.0);
    let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
    let camera = Camera::new(view, projection);

    let visible = culler.triangles_visible(camera.frustum());
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[&0], vec![0, 1, 2, 0, 2, 3]);
}

// ============================================================================
// SPATIAL HASH
// ============================================================================

#[test]
fn test_integration_spatial_hash_frustum() {
    let mut hash = SpatialHash::new();

    hash.insert_object_for_box(&AABB::from_centre_width(Vec3::new(0.5, 0.5, -0.5), 0.5), 1u32);
    hash.insert_object_for_box(&AABB::from_centre_width(Vec3::new(0.0, 0.0, -1.0), 5.0), 2);
    hash.insert_object_for_box(&AABB::from_centre_width(Vec3::new(10.0, 10.0, -200.0), 1.0), 3);
    hash.insert_object_for_box(&AABB::from_centre_width(Vec3::new(0.0, 0.0, 1.0), 1.0), 4);

    let projection = Mat4::perspective_rh(45f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
    let camera = Camera::new(Mat4::IDENTITY, projection);

    let results: Vec<u32> = hash.find_objects_within_frustum(camera.frustum()).into_iter().collect();
    assert_eq!(results, vec![1, 2]);
}

// ============================================================================
// PARTITIONER FRAME LOOP
// ============================================================================

#[test]
fn test_integration_partitioner_frames() {
    let mut actors: SlotMap<ActorKey, AABB> = SlotMap::with_key();
    let mut lights: SlotMap<LightKey, ()> = SlotMap::with_key();

    for backend in [IndexBackend::Octree, IndexBackend::SpatialHash, IndexBackend::BruteForce] {
        let config = PartitionerConfig::default().with_backend(backend);
        let mut partitioner = DynPartitioner::from_config(&config).unwrap();

        let runner = actors.insert(AABB::from_centre_width(Vec3::new(0.0, 0.0, 300.0), 2.0));
        let statue = actors.insert(AABB::from_centre_width(Vec3::new(0.0, 0.0, -300.0), 2.0));
        let sun = lights.insert(());

        for (key, aabb) in [(runner, actors[runner]), (statue, actors[statue])] {
            partitioner.add_actor(key, &aabb, CullingMode::Dynamic).unwrap();
        }
        partitioner.add_light(sun, &AABB::default(), CullingMode::Never).unwrap();

        let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 1.0, 0.1, 1000.0);
        let camera = Camera::new(Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y), projection);

        // Frame 1: the runner is behind the camera
        let visible = partitioner.geometry_visible_from(&camera);
        assert_eq!(visible.into_iter().collect::<Vec<_>>(), vec![RenderableHandle::Actor(statue)], "{:?}", backend);
        assert!(partitioner.lights_visible_from(&camera).contains(&sun));

        // Frame 2: the runner moved in front
        actors[runner] = AABB::from_centre_width(Vec3::new(0.0, 0.0, -250.0), 2.0);
        partitioner.event_actor_changed(runner, &actors[runner]).unwrap();
        partitioner.apply_writes();

        let visible = partitioner.geometry_visible_from(&camera);
        assert_eq!(visible.len(), 2, "{:?}", backend);

        // Frame 3: the statue is gone
        partitioner.remove_actor(statue);
        let visible = partitioner.geometry_visible_from(&camera);
        assert_eq!(visible.into_iter().collect::<Vec<_>>(), vec![RenderableHandle::Actor(runner)], "{:?}", backend);
    }
}
