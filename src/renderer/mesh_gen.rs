//! Procedural meshes for part primitives.
//!
//! Every mesh is centered on the origin with counter-clockwise, outward
//! facing triangles. Cylinders run along local Y.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::parts::Shape;

/// Vertex layout for part geometry.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space unit normal.
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Vertex buffer layout (slot 0).
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }

    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertices.
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
}

impl MeshData {
    fn base(&self) -> u32 {
        self.vertices.len() as u32
    }
}

/// Mesh for any [`Shape`].
#[must_use]
pub fn shape_mesh(shape: &Shape) -> MeshData {
    match *shape {
        Shape::Box { size } => box_mesh(size),
        Shape::Cylinder {
            radius,
            height,
            segments,
        } => cylinder_mesh(radius, height, segments),
        Shape::Sphere {
            radius,
            rings,
            segments,
        } => sphere_mesh(radius, rings, segments),
    }
}

/// Axis-aligned box with full extents `size`. Faces have flat normals.
#[must_use]
pub fn box_mesh(size: Vec3) -> MeshData {
    // (normal, u, v) with u x v == normal so quads wind outward.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    let half = size * 0.5;
    let mut mesh = MeshData::default();
    for (n, u, v) in FACES {
        let base = mesh.base();
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = (n + u * su + v * sv) * half;
            mesh.vertices.push(Vertex::new(corner, n));
        }
        mesh.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Capped cylinder along Y.
#[must_use]
pub fn cylinder_mesh(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half = height * 0.5;
    let ring = |i: u32| {
        let (sin, cos) = (i as f32 / segments as f32 * TAU).sin_cos();
        Vec3::new(cos, 0.0, sin)
    };
    let mut mesh = MeshData::default();

    // Side: bottom/top pairs, seam duplicated.
    let side = mesh.base();
    for i in 0..=segments {
        let dir = ring(i);
        mesh.vertices
            .push(Vertex::new(dir * radius - Vec3::Y * half, dir));
        mesh.vertices
            .push(Vertex::new(dir * radius + Vec3::Y * half, dir));
    }
    for i in 0..segments {
        let b0 = side + i * 2;
        let t0 = b0 + 1;
        let b1 = b0 + 2;
        let t1 = b0 + 3;
        mesh.indices.extend([b0, t0, b1, b1, t0, t1]);
    }

    for (y, normal) in [(half, Vec3::Y), (-half, Vec3::NEG_Y)] {
        let center = mesh.base();
        mesh.vertices
            .push(Vertex::new(Vec3::Y * y, normal));
        for i in 0..=segments {
            mesh.vertices
                .push(Vertex::new(ring(i) * radius + Vec3::Y * y, normal));
        }
        for i in 0..segments {
            let a = center + 1 + i;
            let b = a + 1;
            if y > 0.0 {
                mesh.indices.extend([center, b, a]);
            } else {
                mesh.indices.extend([center, a, b]);
            }
        }
    }
    mesh
}

/// UV sphere. Pole triangles are emitted once, not as degenerate quads.
#[must_use]
pub fn sphere_mesh(radius: f32, rings: u32, segments: u32) -> MeshData {
    let rings = rings.max(2);
    let segments = segments.max(3);
    let stride = segments + 1;
    let mut mesh = MeshData::default();
    for ring in 0..=rings {
        let (sin_phi, cos_phi) = (ring as f32 / rings as f32 * PI).sin_cos();
        for seg in 0..=segments {
            let (sin_theta, cos_theta) =
                (seg as f32 / segments as f32 * TAU).sin_cos();
            let n =
                Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
            mesh.vertices.push(Vertex::new(n * radius, n));
        }
    }
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * stride + seg;
            let b = a + stride;
            if ring > 0 {
                mesh.indices.extend([a, a + 1, b]);
            }
            if ring + 1 < rings {
                mesh.indices.extend([a + 1, b + 1, b]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &MeshData) {
        let pos = |i: u32| Vec3::from_array(mesh.vertices[i as usize].position);
        for tri in mesh.indices.chunks_exact(3) {
            let (a, b, c) = (pos(tri[0]), pos(tri[1]), pos(tri[2]));
            let face = (b - a).cross(c - a);
            assert!(face.length() > 1e-8, "degenerate triangle {tri:?}");
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) > 0.0, "inward triangle {tri:?}");
        }
    }

    fn assert_unit_normals(mesh: &MeshData) {
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.normal).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn box_has_six_outward_quads() {
        let mesh = box_mesh(Vec3::new(2.0, 1.0, 4.0));
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_outward(&mesh);
        assert_unit_normals(&mesh);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position).abs();
            assert_eq!(p, Vec3::new(1.0, 0.5, 2.0));
        }
    }

    #[test]
    fn cylinder_winds_outward() {
        let mesh = cylinder_mesh(0.5, 2.0, 16);
        assert_outward(&mesh);
        assert_unit_normals(&mesh);
        let max_y = mesh
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert!((max_y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sphere_winds_outward_without_degenerates() {
        let mesh = sphere_mesh(1.5, 8, 12);
        assert_outward(&mesh);
        assert_unit_normals(&mesh);
        assert_eq!(mesh.indices.len(), (12 * (8 - 1) * 2 * 3) as usize);
    }

    #[test]
    fn low_segment_counts_are_raised() {
        let mesh = cylinder_mesh(1.0, 1.0, 1);
        assert_outward(&mesh);
        assert_eq!(mesh.indices.len(), 3 * 2 * 3 + 2 * 3 * 3);
    }

    #[test]
    fn indices_stay_in_range() {
        for shape in [
            Shape::Box { size: Vec3::ONE },
            Shape::Cylinder {
                radius: 1.0,
                height: 1.0,
                segments: 24,
            },
            Shape::Sphere {
                radius: 1.0,
                rings: 6,
                segments: 10,
            },
        ] {
            let mesh = shape_mesh(&shape);
            let n = mesh.vertices.len() as u32;
            assert!(mesh.indices.iter().all(|&i| i < n));
        }
    }
}
