//! Ambient plus directional light uniform at bind group 1.

use glam::Vec3;
use wgpu::util::DeviceExt;

use super::color::hex_to_linear_scaled;
use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::options::LightingOptions;

/// Scene lighting shared by lit shaders.
/// NOTE: Must match WGSL struct layout exactly (48 bytes)
///
/// WGSL layout (auto-padded):
///   ambient: vec3<f32>        (offset 0,  align 16)
///   pad_ambient: f32          (offset 12)
///   light_dir: vec3<f32>      (offset 16, align 16)
///   pad_dir: f32              (offset 28)
///   light_color: vec3<f32>    (offset 32, align 16)
///   pad_color: f32            (offset 44)
///   Total: 48 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Ambient color, linear, premultiplied by intensity
    pub ambient: [f32; 3],
    pub(crate) pad_ambient: f32,
    /// Unit vector from the scene origin toward the directional light
    pub light_dir: [f32; 3],
    pub(crate) pad_dir: f32,
    /// Directional color, linear, premultiplied by intensity
    pub light_color: [f32; 3],
    pub(crate) pad_color: f32,
}

impl LightingUniform {
    /// Uniform values for the given options.
    ///
    /// A directional light at the origin has no direction; it falls back to
    /// shining straight down the +Z axis.
    #[must_use]
    pub fn from_options(options: &LightingOptions) -> Self {
        let dir = Vec3::from_array(options.directional_position)
            .try_normalize()
            .unwrap_or(Vec3::Z);
        Self {
            ambient: hex_to_linear_scaled(
                options.ambient_color,
                options.ambient_intensity,
            ),
            pad_ambient: 0.0,
            light_dir: dir.to_array(),
            pad_dir: 0.0,
            light_color: hex_to_linear_scaled(
                options.directional_color,
                options.directional_intensity,
            ),
            pad_color: 0.0,
        }
    }
}

/// Lighting uniform plus the GPU resources at group 1.
pub struct Lighting {
    /// CPU copy of the uniform.
    pub uniform: LightingUniform,
    /// Uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group for `buffer`.
    pub bind_group: wgpu::BindGroup,
}

impl Lighting {
    /// Upload lighting built from `options`.
    #[must_use]
    pub fn new(context: &RenderContext, options: &LightingOptions) -> Self {
        let uniform = LightingUniform::from_options(options);

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Lighting Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = pipeline_helpers::single_uniform_layout(
            &context.device,
            "Lighting Bind Group Layout",
            wgpu::ShaderStages::FRAGMENT,
        );
        let bind_group = pipeline_helpers::single_buffer_bind_group(
            &context.device,
            "Lighting Bind Group",
            &layout,
            &buffer,
        );

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Replace the lighting with new option values.
    pub fn apply_options(
        &mut self,
        queue: &wgpu::Queue,
        options: &LightingOptions,
    ) {
        self.uniform = LightingUniform::from_options(options);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_48_bytes() {
        assert_eq!(size_of::<LightingUniform>(), 48);
    }

    #[test]
    fn direction_points_at_light_position() {
        let u = LightingUniform::from_options(&LightingOptions::default());
        let dir = Vec3::from_array(u.light_dir);
        assert!((dir.length() - 1.0).abs() < 1e-6);
        let expected = Vec3::new(5.0, 3.0, 5.0).normalize();
        assert!(dir.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn white_light_scales_by_intensity() {
        let u = LightingUniform::from_options(&LightingOptions::default());
        assert_eq!(u.light_color, [1.2, 1.2, 1.2]);
    }

    #[test]
    fn light_at_origin_falls_back_to_z() {
        let options = LightingOptions {
            directional_position: [0.0, 0.0, 0.0],
            ..LightingOptions::default()
        };
        let u = LightingUniform::from_options(&options);
        assert_eq!(u.light_dir, [0.0, 0.0, 1.0]);
    }
}
