//! Star field as instanced, distance-attenuated sprites.

use wgpu::util::DeviceExt;

use super::pipeline_util::{
    self, DrawBindGroups, PipelineSpec, SharedLayouts, TargetFormat,
};
use crate::error::GlobeError;
use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::options::StarOptions;
use crate::scene::StarField;
use crate::util::color::hex_to_linear;

/// Per-frame star parameters.
/// NOTE: Must match `StarUniform` in stars.wgsl (96 bytes)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StarUniform {
    /// Object-to-world rotation of the field.
    pub model: [[f32; 4]; 4],
    /// Linear star color.
    pub color: [f32; 3],
    /// Sprite size in world units before attenuation.
    pub size: f32,
    /// Sprite opacity.
    pub opacity: f32,
    pub(crate) _pad: [f32; 3],
}

impl StarUniform {
    /// Uniform for `field` drawn with `options`.
    #[must_use]
    pub fn new(field: &StarField, options: &StarOptions) -> Self {
        Self {
            model: field.model_matrix().to_cols_array_2d(),
            color: hex_to_linear(options.color),
            size: options.size,
            opacity: options.opacity,
            _pad: [0.0; 3],
        }
    }
}

/// One star's object-space center.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StarInstance {
    /// Position inside the star cube.
    pub center: [f32; 3],
}

impl StarInstance {
    /// Instance buffer layout matching `stars.wgsl`.
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<StarInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            }],
        }
    }
}

/// Draws the star field. Star positions are uploaded once; only the
/// rotation changes per frame.
pub struct StarRenderer {
    pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    star_count: u32,
    uniform: StarUniform,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl StarRenderer {
    /// Upload the star positions and build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        target: TargetFormat,
        layouts: SharedLayouts<'_>,
        field: &StarField,
        options: &StarOptions,
    ) -> Result<Self, GlobeError> {
        let device = &context.device;
        let shader = composer.compose(
            device,
            "Star Shader",
            include_str!("../../assets/shaders/stars.wgsl"),
            "stars.wgsl",
        )?;

        let layout = pipeline_helpers::single_uniform_layout(
            device,
            "Star Uniform Layout",
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        );

        let pipeline = pipeline_util::create_pipeline(
            device,
            target,
            &PipelineSpec {
                label: "Star Pipeline",
                shader: &shader,
                buffers: &[StarInstance::desc()],
                bind_group_layouts: &[layouts.camera, &layout],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                depth_write: false,
            },
        );

        let instances: Vec<StarInstance> = field
            .positions()
            .iter()
            .map(|p| StarInstance {
                center: p.to_array(),
            })
            .collect();
        // An empty field still needs a bindable buffer.
        let contents: &[u8] = if instances.is_empty() {
            &[0; size_of::<StarInstance>()]
        } else {
            bytemuck::cast_slice(&instances)
        };
        let instance_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Star Instance Buffer"),
                contents,
                usage: wgpu::BufferUsages::VERTEX,
            });

        let uniform = StarUniform::new(field, options);
        let uniform_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Star Uniform Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = pipeline_helpers::single_buffer_bind_group(
            device,
            "Star Bind Group",
            &layout,
            &uniform_buffer,
        );

        Ok(Self {
            pipeline,
            instance_buffer,
            star_count: instances.len() as u32,
            uniform,
            uniform_buffer,
            bind_group,
        })
    }

    /// Upload the field's current rotation.
    pub fn update(&mut self, queue: &wgpu::Queue, field: &StarField) {
        self.uniform.model = field.model_matrix().to_cols_array_2d();
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );
    }

    /// Record the star draw: six vertices per star.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        bind_groups: &DrawBindGroups<'_>,
    ) {
        if self.star_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_groups.camera, &[]);
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        render_pass.draw(0..6, 0..self.star_count);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn uniform_is_96_bytes() {
        assert_eq!(size_of::<StarUniform>(), 96);
    }

    #[test]
    fn uniform_tracks_rotation() {
        let mut rng = StdRng::seed_from_u64(2);
        let options = StarOptions::default();
        let mut field = StarField::new(&mut rng, &options);
        field.advance();
        let u = StarUniform::new(&field, &options);
        assert_eq!(u.model, field.model_matrix().to_cols_array_2d());
        assert_eq!(u.color, [1.0, 1.0, 1.0]);
        assert_eq!(u.opacity, 0.9);
        assert_eq!(u.size, 0.05);
    }
}
