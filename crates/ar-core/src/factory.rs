//! Builds the renderable model for a placed product.
//!
//! Pure construction: no scene mutation happens here, the caller owns adding
//! the result to the session's object list.

use crate::config::{Shape, ViewConfig};
use crate::constants::{
    BASE_COLOR, BASE_HEIGHT, BASE_RADIUS, BASE_SEGMENTS, BASE_Y_OFFSET, BOX_SIZE, CYLINDER_HEIGHT,
    CYLINDER_RADIUS, CYLINDER_SEGMENTS, SPHERE_RADIUS, SPHERE_SEGMENTS,
};
use crate::geometry::{self, MeshData};
use glam::Vec3;

/// One mesh of a placed object, with its surface color and local offset
/// inside the group.
#[derive(Clone, Debug)]
pub struct MeshPart {
    pub mesh: MeshData,
    pub color: [f32; 3],
    pub offset: Vec3,
}

/// A placed product: the shape primitive plus its base platform, scaled
/// uniformly as a group.
#[derive(Clone, Debug)]
pub struct ObjectModel {
    pub parts: Vec<MeshPart>,
    pub scale: f32,
}

impl ObjectModel {
    /// Recolor every part. Live color updates hit the whole group, base
    /// platform included.
    pub fn set_color(&mut self, color: [f32; 3]) {
        for part in &mut self.parts {
            part.color = color;
        }
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }
}

pub fn shape_mesh(shape: Shape) -> MeshData {
    match shape {
        Shape::Box => geometry::box_mesh(BOX_SIZE[0], BOX_SIZE[1], BOX_SIZE[2]),
        Shape::Sphere => geometry::sphere_mesh(SPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
        Shape::Cylinder => {
            geometry::cylinder_mesh(CYLINDER_RADIUS, CYLINDER_HEIGHT, CYLINDER_SEGMENTS)
        }
    }
}

/// Build the model for the given configuration.
///
/// The base platform sits slightly below the shape's origin and always starts
/// with its fixed neutral tint, independent of the configured color.
pub fn build_object(config: &ViewConfig) -> ObjectModel {
    let base = MeshPart {
        mesh: geometry::cylinder_mesh(BASE_RADIUS, BASE_HEIGHT, BASE_SEGMENTS),
        color: BASE_COLOR,
        offset: Vec3::new(0.0, BASE_Y_OFFSET, 0.0),
    };
    let shape = MeshPart {
        mesh: shape_mesh(config.shape),
        color: config.color,
        offset: Vec3::ZERO,
    };
    ObjectModel {
        parts: vec![base, shape],
        scale: config.size,
    }
}
