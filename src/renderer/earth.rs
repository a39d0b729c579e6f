//! Lit, textured globe.

use wgpu::util::DeviceExt;

use super::pipeline_util::{
    self, DrawBindGroups, PipelineSpec, SharedLayouts, TargetFormat,
};
use crate::error::GlobeError;
use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::SampledTexture;
use crate::options::EarthOptions;
use crate::scene::{Earth, EarthVertex};
use crate::util::color::{hex_to_linear, hex_to_linear_scaled};

/// Phong material parameters.
/// NOTE: Must match `EarthMaterial` in earth.wgsl (32 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EarthMaterial {
    /// Emissive tint, linear, premultiplied by intensity.
    pub emissive: [f32; 3],
    /// Specular exponent.
    pub shininess: f32,
    /// Specular color, linear.
    pub specular: [f32; 3],
    pub(crate) _pad: f32,
}

impl EarthMaterial {
    /// Material for the given options.
    #[must_use]
    pub fn from_options(options: &EarthOptions) -> Self {
        Self {
            emissive: hex_to_linear_scaled(
                options.emissive,
                options.emissive_intensity,
            ),
            shininess: options.shininess,
            specular: hex_to_linear(options.specular),
            _pad: 0.0,
        }
    }
}

/// Draws the globe mesh with its night-lights texture.
pub struct EarthRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material_buffer: wgpu::Buffer,
    material_layout: wgpu::BindGroupLayout,
    material_bind_group: wgpu::BindGroup,
    texture: SampledTexture,
    textured: bool,
}

impl EarthRenderer {
    /// Upload the mesh and a placeholder texture, and build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError`] if the shader fails to compose or the
    /// placeholder texture cannot be created.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        target: TargetFormat,
        layouts: SharedLayouts<'_>,
        earth: &Earth,
        options: &EarthOptions,
    ) -> Result<Self, GlobeError> {
        let device = &context.device;
        let shader = composer.compose(
            device,
            "Earth Shader",
            include_str!("../../assets/shaders/earth.wgsl"),
            "earth.wgsl",
        )?;

        let material_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Earth Material Layout"),
                entries: &[
                    pipeline_helpers::uniform_buffer(
                        0,
                        wgpu::ShaderStages::FRAGMENT,
                    ),
                    pipeline_helpers::texture_2d(1),
                    pipeline_helpers::filtering_sampler(2),
                ],
            });

        let pipeline = pipeline_util::create_pipeline(
            device,
            target,
            &PipelineSpec {
                label: "Earth Pipeline",
                shader: &shader,
                buffers: &[EarthVertex::desc()],
                bind_group_layouts: &[
                    layouts.camera,
                    layouts.lighting,
                    &material_layout,
                ],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                depth_write: true,
            },
        );

        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Earth Vertex Buffer"),
                contents: bytemuck::cast_slice(&earth.mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Earth Index Buffer"),
                contents: bytemuck::cast_slice(&earth.mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let material = EarthMaterial::from_options(options);
        let material_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Earth Material Buffer"),
                contents: bytemuck::cast_slice(&[material]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let texture = SampledTexture::placeholder(device, &context.queue)?;
        let material_bind_group = Self::create_material_bind_group(
            device,
            &material_layout,
            &material_buffer,
            &texture,
        );

        Ok(Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: earth.mesh.indices.len() as u32,
            material_buffer,
            material_layout,
            material_bind_group,
            texture,
            textured: false,
        })
    }

    fn create_material_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        material_buffer: &wgpu::Buffer,
        texture: &SampledTexture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Earth Material Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: material_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    /// Swap the placeholder for the real night-lights texture.
    pub fn set_texture(&mut self, device: &wgpu::Device, texture: SampledTexture) {
        self.material_bind_group = Self::create_material_bind_group(
            device,
            &self.material_layout,
            &self.material_buffer,
            &texture,
        );
        self.texture = texture;
        self.textured = true;
    }

    /// Whether the real texture has replaced the placeholder.
    #[must_use]
    pub fn is_textured(&self) -> bool {
        self.textured
    }

    /// Pixel size of the bound texture.
    #[must_use]
    pub fn texture_size(&self) -> (u32, u32) {
        self.texture.size
    }

    /// Rewrite the material uniform from options.
    pub fn apply_options(&self, queue: &wgpu::Queue, options: &EarthOptions) {
        let material = EarthMaterial::from_options(options);
        queue.write_buffer(
            &self.material_buffer,
            0,
            bytemuck::cast_slice(&[material]),
        );
    }

    /// Record the globe draw.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        bind_groups: &DrawBindGroups<'_>,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_groups.camera, &[]);
        render_pass.set_bind_group(1, bind_groups.lighting, &[]);
        render_pass.set_bind_group(2, &self.material_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(
            self.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_is_32_bytes() {
        assert_eq!(size_of::<EarthMaterial>(), 32);
    }

    #[test]
    fn emissive_is_scaled_blue() {
        let m = EarthMaterial::from_options(&EarthOptions::default());
        assert_eq!(m.shininess, 20.0);
        // 0x2858ff: blue dominates, and 0.75 caps every channel.
        assert!(m.emissive[2] > m.emissive[1]);
        assert!(m.emissive[1] > m.emissive[0]);
        assert!((m.emissive[2] - 0.75).abs() < 1e-6);
    }
}
