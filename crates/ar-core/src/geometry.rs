//! Indexed triangle meshes for the primitives the viewer draws.
//!
//! Positions and normals only; the renderer interleaves them into GPU
//! buffers. Indices are u16, which comfortably covers every primitive here.

use glam::Vec3;

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds of the positions, `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in &self.positions {
            min = min.min(Vec3::from(*p));
            max = max.max(Vec3::from(*p));
        }
        (min, max)
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
    }
}

/// Axis-aligned box centred on the origin.
pub fn box_mesh(width: f32, height: f32, depth: f32) -> MeshData {
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);
    // Per-face vertices so each face gets a flat normal.
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        (
            Vec3::X,
            [
                Vec3::new(hx, -hy, -hz),
                Vec3::new(hx, hy, -hz),
                Vec3::new(hx, hy, hz),
                Vec3::new(hx, -hy, hz),
            ],
        ),
        (
            Vec3::NEG_X,
            [
                Vec3::new(-hx, -hy, hz),
                Vec3::new(-hx, hy, hz),
                Vec3::new(-hx, hy, -hz),
                Vec3::new(-hx, -hy, -hz),
            ],
        ),
        (
            Vec3::Y,
            [
                Vec3::new(-hx, hy, -hz),
                Vec3::new(-hx, hy, hz),
                Vec3::new(hx, hy, hz),
                Vec3::new(hx, hy, -hz),
            ],
        ),
        (
            Vec3::NEG_Y,
            [
                Vec3::new(-hx, -hy, hz),
                Vec3::new(-hx, -hy, -hz),
                Vec3::new(hx, -hy, -hz),
                Vec3::new(hx, -hy, hz),
            ],
        ),
        (
            Vec3::Z,
            [
                Vec3::new(-hx, -hy, hz),
                Vec3::new(hx, -hy, hz),
                Vec3::new(hx, hy, hz),
                Vec3::new(-hx, hy, hz),
            ],
        ),
        (
            Vec3::NEG_Z,
            [
                Vec3::new(hx, -hy, -hz),
                Vec3::new(-hx, -hy, -hz),
                Vec3::new(-hx, hy, -hz),
                Vec3::new(hx, hy, -hz),
            ],
        ),
    ];

    let mut mesh = MeshData::default();
    for (normal, corners) in faces {
        let base = mesh.vertex_count() as u16;
        for corner in corners {
            mesh.push_vertex(corner, normal);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// UV sphere centred on the origin.
pub fn sphere_mesh(radius: f32, segments: u32, rings: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for ring in 0..=rings {
        // phi: 0 at the north pole, PI at the south
        let phi = std::f32::consts::PI * ring as f32 / rings as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for seg in 0..=segments {
            let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let normal = Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
            mesh.push_vertex(normal * radius, normal);
        }
    }
    let stride = segments + 1;
    for ring in 0..rings {
        for seg in 0..segments {
            let a = (ring * stride + seg) as u16;
            let b = a + stride as u16;
            // Skip the degenerate triangle at each pole.
            if ring != 0 {
                mesh.indices.extend_from_slice(&[a, b, a + 1]);
            }
            if ring != rings - 1 {
                mesh.indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }
    mesh
}

/// Capped cylinder centred on the origin, axis along Y.
pub fn cylinder_mesh(radius: f32, height: f32, segments: u32) -> MeshData {
    let hy = height * 0.5;
    let mut mesh = MeshData::default();

    // Side wall with radial normals.
    for seg in 0..=segments {
        let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let normal = Vec3::new(cos_theta, 0.0, sin_theta);
        let rim = normal * radius;
        mesh.push_vertex(rim + Vec3::new(0.0, hy, 0.0), normal);
        mesh.push_vertex(rim + Vec3::new(0.0, -hy, 0.0), normal);
    }
    for seg in 0..segments {
        let top = (seg * 2) as u16;
        let bottom = top + 1;
        mesh.indices
            .extend_from_slice(&[top, bottom, top + 2, top + 2, bottom, bottom + 2]);
    }

    // Caps with axial normals.
    for &(y, normal) in &[(hy, Vec3::Y), (-hy, Vec3::NEG_Y)] {
        let center = mesh.vertex_count() as u16;
        mesh.push_vertex(Vec3::new(0.0, y, 0.0), normal);
        for seg in 0..=segments {
            let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            mesh.push_vertex(
                Vec3::new(cos_theta * radius, y, sin_theta * radius),
                normal,
            );
        }
        for seg in 0..segments {
            let a = center + 1 + seg as u16;
            let b = a + 1;
            if normal.y > 0.0 {
                mesh.indices.extend_from_slice(&[center, b, a]);
            } else {
                mesh.indices.extend_from_slice(&[center, a, b]);
            }
        }
    }
    mesh
}

/// Flat ring in the XZ plane facing up, used for the reticle.
pub fn ring_mesh(inner_radius: f32, outer_radius: f32, segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for seg in 0..=segments {
        let theta = std::f32::consts::TAU * seg as f32 / segments as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let dir = Vec3::new(cos_theta, 0.0, sin_theta);
        mesh.push_vertex(dir * inner_radius, Vec3::Y);
        mesh.push_vertex(dir * outer_radius, Vec3::Y);
    }
    for seg in 0..segments {
        let inner = (seg * 2) as u16;
        let outer = inner + 1;
        mesh.indices
            .extend_from_slice(&[inner, outer, inner + 2, inner + 2, outer, outer + 2]);
    }
    mesh
}
