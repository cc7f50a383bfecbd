//! Static key/fill/rim light rig uniform.

use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::options::LightingOptions;

/// Lighting shared by every part shader.
///
/// Must match the WGSL `Lighting` struct (96 bytes): six `vec3<f32>` +
/// `f32` pairs, each 16-byte aligned.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Direction the key light travels toward (normalized).
    pub key_dir: [f32; 3],
    /// Key light intensity.
    pub key_intensity: f32,
    /// Direction the fill light travels toward (normalized).
    pub fill_dir: [f32; 3],
    /// Fill light intensity.
    pub fill_intensity: f32,
    /// Direction the rim light travels toward (normalized).
    pub rim_dir: [f32; 3],
    /// Rim light intensity.
    pub rim_intensity: f32,
    /// Key light color.
    pub key_color: [f32; 3],
    /// Flat ambient term.
    pub ambient: f32,
    /// Environment color above the horizon.
    pub sky_color: [f32; 3],
    /// Environment reflection strength.
    pub env_strength: f32,
    /// Environment color below the horizon.
    pub ground_color: [f32; 3],
    /// Fresnel exponent for the rim term.
    pub rim_power: f32,
}

impl LightingUniform {
    /// Uniform for the given options, with directions normalized.
    #[must_use]
    pub fn from_options(options: &LightingOptions) -> Self {
        let dir = |v: [f32; 3]| {
            Vec3::from_array(v).try_normalize().unwrap_or(Vec3::NEG_Y).to_array()
        };
        Self {
            key_dir: dir(options.key_dir),
            key_intensity: options.key_intensity,
            fill_dir: dir(options.fill_dir),
            fill_intensity: options.fill_intensity,
            rim_dir: dir(options.rim_dir),
            rim_intensity: options.rim_intensity,
            key_color: options.key_color,
            ambient: options.ambient,
            sky_color: options.sky_color,
            env_strength: options.env_strength,
            ground_color: options.ground_color,
            rim_power: options.rim_power,
        }
    }
}

impl Default for LightingUniform {
    fn default() -> Self {
        Self::from_options(&LightingOptions::default())
    }
}

/// Uniform buffer and bind group for [`LightingUniform`] (group 1).
pub struct Lighting {
    /// CPU copy of the last uploaded uniform.
    pub uniform: LightingUniform,
    /// Backing uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Layout shared by every pipeline that reads lighting.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over `buffer`.
    pub bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Allocate the buffer from `options`.
    #[must_use]
    pub fn new(device: &wgpu::Device, options: &LightingOptions) -> Self {
        let uniform = LightingUniform::from_options(options);
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Lighting Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Lighting Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Re-derive the uniform from `options` and upload it if it changed.
    pub fn update(&mut self, queue: &wgpu::Queue, options: &LightingOptions) {
        let uniform = LightingUniform::from_options(options);
        if uniform != self.uniform {
            self.uniform = uniform;
            queue.write_buffer(
                &self.buffer,
                0,
                bytemuck::cast_slice(&[self.uniform]),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(size_of::<LightingUniform>(), 96);
    }

    #[test]
    fn directions_are_normalized() {
        let u = LightingUniform::default();
        for dir in [u.key_dir, u.fill_dir, u.rim_dir] {
            assert!((Vec3::from_array(dir).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_direction_falls_back_to_straight_down() {
        let options = LightingOptions {
            key_dir: [0.0; 3],
            ..LightingOptions::default()
        };
        let u = LightingUniform::from_options(&options);
        assert_eq!(u.key_dir, [0.0, -1.0, 0.0]);
    }
}
