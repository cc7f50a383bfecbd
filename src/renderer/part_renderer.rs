//! Draws every part primitive with per-primitive instance data.
//!
//! Geometry for the whole part set is generated once and concatenated into
//! one vertex and one index buffer. Each frame only the instance buffer
//! (model matrix and material per primitive) is rewritten from the scene's
//! drawn transforms.

use std::ops::Range;

use wgpu::util::DeviceExt;

use super::mesh_gen::{shape_mesh, Vertex};
use super::pipeline_util;
use crate::error::VizError;
use crate::gpu::dynamic_buffer::DynamicBuffer;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::parts::{PartSet, Primitive, Transform};

/// Per-primitive instance data. Must match `InstanceInput` in `part.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PartInstance {
    /// World matrix, column major.
    pub model: [[f32; 4]; 4],
    /// Base color (rgb) and metalness (a).
    pub color_metal: [f32; 4],
    /// Emissive color (rgb) and roughness (a).
    pub emissive_rough: [f32; 4],
}

impl PartInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
    ];

    /// Instance buffer layout (slot 1).
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    /// Instance for `primitive` on a part drawn at `part_world`.
    #[must_use]
    pub fn for_primitive(part_world: &Transform, primitive: &Primitive) -> Self {
        let world = part_world.mul_transform(&primitive.offset);
        let m = &primitive.material;
        let [r, g, b] = m.color;
        let [er, eg, eb] = m.emissive.unwrap_or([0.0; 3]);
        Self {
            model: world.to_matrix().to_cols_array_2d(),
            color_metal: [r, g, b, m.metalness],
            emissive_rough: [er, eg, eb, m.roughness],
        }
    }
}

/// One primitive's slice of the shared geometry buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveDraw {
    /// Index range in the shared index buffer.
    pub indices: Range<u32>,
    /// Offset added to every index.
    pub base_vertex: i32,
}

/// CPU-side geometry for a whole part set, in part then primitive order.
#[derive(Debug, Clone, Default)]
pub struct PartGeometry {
    /// Concatenated vertices.
    pub vertices: Vec<Vertex>,
    /// Concatenated, mesh-local indices.
    pub indices: Vec<u32>,
    /// One entry per primitive, matching instance order.
    pub draws: Vec<PrimitiveDraw>,
}

impl PartGeometry {
    /// Generate meshes for every primitive in `parts`.
    #[must_use]
    pub fn build(parts: &PartSet) -> Self {
        let mut geometry = Self::default();
        for primitive in parts.iter().flat_map(|p| &p.primitives) {
            let mesh = shape_mesh(&primitive.shape);
            let start = geometry.indices.len() as u32;
            geometry.draws.push(PrimitiveDraw {
                indices: start..start + mesh.indices.len() as u32,
                base_vertex: geometry.vertices.len() as i32,
            });
            geometry.vertices.extend(mesh.vertices);
            geometry.indices.extend(mesh.indices);
        }
        geometry
    }
}

/// Fill `out` with one instance per primitive, in the same order as
/// [`PartGeometry::draws`].
pub fn build_instances<'a>(
    parts: &PartSet,
    transforms: impl Iterator<Item = &'a Transform>,
    out: &mut Vec<PartInstance>,
) {
    out.clear();
    for (part, world) in parts.iter().zip(transforms) {
        out.extend(
            part.primitives
                .iter()
                .map(|primitive| PartInstance::for_primitive(world, primitive)),
        );
    }
}

/// Owns the part pipeline and its buffers.
pub struct PartRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    draws: Vec<PrimitiveDraw>,
    instances: DynamicBuffer<PartInstance>,
    scratch: Vec<PartInstance>,
    transforms: Vec<Transform>,
}

impl PartRenderer {
    /// Build the pipeline and upload static geometry for `parts`.
    ///
    /// # Errors
    ///
    /// Returns an error if `part.wgsl` fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        parts: &PartSet,
    ) -> Result<Self, VizError> {
        let shader = composer.compose(
            &context.device,
            "Part Shader",
            include_str!("../../assets/shaders/raster/part.wgsl"),
            "raster/part.wgsl",
        )?;
        let pipeline = pipeline_util::create_mesh_pipeline(
            context,
            "Part Pipeline",
            &shader,
            bind_group_layouts,
            &[Vertex::layout(), PartInstance::layout()],
        );

        let geometry = PartGeometry::build(parts);
        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Part Vertices"),
                contents: bytemuck::cast_slice(&geometry.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        let index_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Part Indices"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );
        let instances = DynamicBuffer::with_capacity(
            &context.device,
            "Part Instances",
            geometry.draws.len(),
            wgpu::BufferUsages::VERTEX,
        );
        log::info!(
            "part geometry: {} primitives, {} vertices, {} indices",
            geometry.draws.len(),
            geometry.vertices.len(),
            geometry.indices.len()
        );

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            draws: geometry.draws,
            instances,
            scratch: Vec::new(),
            transforms: Vec::with_capacity(parts.len()),
        })
    }

    /// Rewrite the instance buffer from the drawn part transforms.
    pub fn update(
        &mut self,
        context: &RenderContext,
        parts: &PartSet,
        transforms: impl Iterator<Item = Transform>,
    ) {
        self.transforms.clear();
        self.transforms.extend(transforms);
        build_instances(parts, self.transforms.iter(), &mut self.scratch);
        let _ = self
            .instances
            .write(&context.device, &context.queue, &self.scratch);
    }

    /// Record draws. Caller must set bind groups first.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        let count = self.instances.count().min(self.draws.len());
        if count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instances.buffer().slice(..));
        render_pass.set_index_buffer(
            self.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        for (instance, draw) in self.draws.iter().take(count).enumerate() {
            let instance = instance as u32;
            render_pass.draw_indexed(
                draw.indices.clone(),
                draw.base_vertex,
                instance..instance + 1,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Quat, Vec3};

    use super::*;
    use crate::parts::{Material, Shape};

    #[test]
    fn instance_matches_wgsl_layout() {
        assert_eq!(size_of::<PartInstance>(), 96);
    }

    #[test]
    fn geometry_has_one_draw_per_primitive() {
        let parts = PartSet::reference_engine();
        let geometry = PartGeometry::build(&parts);
        assert_eq!(geometry.draws.len(), parts.primitive_count());
        let last = geometry.draws.last().unwrap();
        assert_eq!(last.indices.end as usize, geometry.indices.len());
        for draw in &geometry.draws {
            assert!(draw.base_vertex >= 0);
            assert!((draw.base_vertex as usize) < geometry.vertices.len());
        }
    }

    #[test]
    fn instances_follow_part_order() {
        let parts = PartSet::reference_engine();
        let transforms: Vec<_> = parts.iter().map(|p| p.assembled).collect();
        let mut out = Vec::new();
        build_instances(&parts, transforms.iter(), &mut out);
        assert_eq!(out.len(), parts.primitive_count());

        let block = parts.iter().next().unwrap();
        let expected =
            PartInstance::for_primitive(&block.assembled, &block.primitives[0]);
        assert_eq!(out[0], expected);
    }

    #[test]
    fn instance_composes_part_and_primitive_offsets() {
        let part = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0))
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let primitive = Primitive::new(
            Shape::Box { size: Vec3::ONE },
            Transform::from_translation(Vec3::new(0.0, 0.0, 2.0)),
            Material::HOT_EXHAUST,
        );
        let instance = PartInstance::for_primitive(&part, &primitive);
        let model = Mat4::from_cols_array_2d(&instance.model);
        let origin = model.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(3.0, 0.0, 0.0), 1e-5));
        assert_eq!(instance.emissive_rough[..3], [0.08, 0.025, 0.0]);
        assert_eq!(instance.color_metal[3], Material::HOT_EXHAUST.metalness);
    }
}
