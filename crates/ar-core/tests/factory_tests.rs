// Tests for the object factory and the geometry it is built from.

use ar_core::config::{Shape, ViewConfig};
use ar_core::constants::{
    BASE_COLOR, BASE_HEIGHT, BASE_RADIUS, BASE_Y_OFFSET, BOX_SIZE, CYLINDER_HEIGHT,
    CYLINDER_RADIUS, SPHERE_RADIUS,
};
use ar_core::factory::build_object;
use glam::Vec3;

const TOL: f32 = 1e-3;

fn config_with_shape(shape: Shape) -> ViewConfig {
    ViewConfig::default().with_shape(shape)
}

fn assert_extents(min: Vec3, max: Vec3, expected: Vec3) {
    let extents = max - min;
    assert!(
        (extents - expected).abs().max_element() < TOL,
        "extents {:?} != expected {:?}",
        extents,
        expected
    );
}

#[test]
fn box_object_has_specified_dimensions() {
    let model = build_object(&config_with_shape(Shape::Box));
    let shape = &model.parts[1];
    let (min, max) = shape.mesh.bounds();
    assert_extents(min, max, Vec3::from(BOX_SIZE));
}

#[test]
fn sphere_object_has_specified_radius() {
    let model = build_object(&config_with_shape(Shape::Sphere));
    let shape = &model.parts[1];
    let (min, max) = shape.mesh.bounds();
    assert_extents(min, max, Vec3::splat(SPHERE_RADIUS * 2.0));
    // Every vertex sits on the sphere.
    for p in &shape.mesh.positions {
        assert!((Vec3::from(*p).length() - SPHERE_RADIUS).abs() < TOL);
    }
}

#[test]
fn cylinder_object_has_specified_dimensions() {
    let model = build_object(&config_with_shape(Shape::Cylinder));
    let shape = &model.parts[1];
    let (min, max) = shape.mesh.bounds();
    assert_extents(
        min,
        max,
        Vec3::new(
            CYLINDER_RADIUS * 2.0,
            CYLINDER_HEIGHT,
            CYLINDER_RADIUS * 2.0,
        ),
    );
}

#[test]
fn base_platform_present_for_all_shapes() {
    for shape in [Shape::Box, Shape::Sphere, Shape::Cylinder] {
        let model = build_object(&config_with_shape(shape));
        assert_eq!(model.parts.len(), 2, "shape {:?}", shape);

        let base = &model.parts[0];
        assert_eq!(base.color, BASE_COLOR);
        assert!((base.offset.y - BASE_Y_OFFSET).abs() < TOL);
        let (min, max) = base.mesh.bounds();
        assert_extents(
            min,
            max,
            Vec3::new(BASE_RADIUS * 2.0, BASE_HEIGHT, BASE_RADIUS * 2.0),
        );
    }
}

#[test]
fn shape_part_takes_configured_color_and_group_takes_size() {
    let cfg = ViewConfig::default()
        .with_shape(Shape::Sphere)
        .with_color([0.0, 1.0, 0.0])
        .with_size(1.5);
    let model = build_object(&cfg);
    assert_eq!(model.parts[1].color, [0.0, 1.0, 0.0]);
    assert_eq!(model.parts[0].color, BASE_COLOR);
    assert_eq!(model.scale, 1.5);
}

#[test]
fn meshes_are_well_formed() {
    for shape in [Shape::Box, Shape::Sphere, Shape::Cylinder] {
        let model = build_object(&config_with_shape(shape));
        for part in &model.parts {
            let n = part.mesh.vertex_count();
            assert_eq!(part.mesh.positions.len(), part.mesh.normals.len());
            assert!(part.mesh.triangle_count() > 0);
            assert_eq!(part.mesh.indices.len() % 3, 0);
            for &i in &part.mesh.indices {
                assert!((i as usize) < n, "index {} out of range {}", i, n);
            }
            for normal in &part.mesh.normals {
                assert!((Vec3::from(*normal).length() - 1.0).abs() < TOL);
            }
        }
    }
}
