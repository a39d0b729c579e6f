//! Meteor streaks as instanced line segments.

use wgpu::util::DeviceExt;

use super::pipeline_util::{
    self, DrawBindGroups, PipelineSpec, SharedLayouts, TargetFormat,
};
use crate::error::GlobeError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::scene::{Meteor, MeteorShower};
use crate::util::color::hex_to_linear;

/// Per-meteor instance data.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeteorInstance {
    /// World translation of the segment.
    pub offset: [f32; 3],
    /// Opacity in [0, 1].
    pub opacity: f32,
    /// Linear streak color.
    pub color: [f32; 3],
}

impl MeteorInstance {
    /// Instance data for `meteor`. The simulation lets opacity overshoot
    /// below zero on its last frame; the GPU only ever sees [0, 1].
    #[must_use]
    pub fn new(meteor: &Meteor, color: [f32; 3]) -> Self {
        Self {
            offset: meteor.position.to_array(),
            opacity: meteor.opacity.clamp(0.0, 1.0),
            color,
        }
    }

    /// Instance buffer layout matching `meteor.wgsl` (slot 1).
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<MeteorInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 12,
                    shader_location: 2,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 16,
                    shader_location: 3,
                },
            ],
        }
    }
}

/// Segment endpoint layout (slot 0).
fn segment_desc() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        }],
    }
}

/// Draws every meteor as one translated copy of a shared segment.
pub struct MeteorRenderer {
    pipeline: wgpu::RenderPipeline,
    segment_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instances: Vec<MeteorInstance>,
    color: [f32; 3],
}

impl MeteorRenderer {
    /// Build the pipeline and buffers sized for `shower`.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        composer: &mut ShaderComposer,
        target: TargetFormat,
        layouts: SharedLayouts<'_>,
        shower: &MeteorShower,
    ) -> Result<Self, GlobeError> {
        let device = &context.device;
        let shader = composer.compose(
            device,
            "Meteor Shader",
            include_str!("../../assets/shaders/meteor.wgsl"),
            "meteor.wgsl",
        )?;

        let pipeline = pipeline_util::create_pipeline(
            device,
            target,
            &PipelineSpec {
                label: "Meteor Pipeline",
                shader: &shader,
                buffers: &[segment_desc(), MeteorInstance::desc()],
                bind_group_layouts: &[layouts.camera],
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
                depth_write: false,
            },
        );

        // Tail at the local origin, head along +X.
        let options = shower.options();
        let segment: [[f32; 3]; 2] =
            [[0.0, 0.0, 0.0], [options.length, 0.0, 0.0]];
        let segment_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Meteor Segment Buffer"),
                contents: bytemuck::cast_slice(&segment),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let color = hex_to_linear(options.color);
        let instances: Vec<MeteorInstance> = shower
            .meteors()
            .iter()
            .map(|m| MeteorInstance::new(m, color))
            .collect();
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Meteor Instance Buffer"),
            size: (size_of::<MeteorInstance>() * instances.len().max(1))
                as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        if !instances.is_empty() {
            context.queue.write_buffer(
                &instance_buffer,
                0,
                bytemuck::cast_slice(&instances),
            );
        }

        Ok(Self {
            pipeline,
            segment_buffer,
            instance_buffer,
            instances,
            color,
        })
    }

    /// Upload the current meteor positions and opacities.
    pub fn update(&mut self, queue: &wgpu::Queue, shower: &MeteorShower) {
        for (instance, meteor) in
            self.instances.iter_mut().zip(shower.meteors())
        {
            *instance = MeteorInstance::new(meteor, self.color);
        }
        if self.instances.is_empty() {
            return;
        }
        queue.write_buffer(
            &self.instance_buffer,
            0,
            bytemuck::cast_slice(&self.instances),
        );
    }

    /// Instance data as last uploaded.
    #[must_use]
    pub fn instances(&self) -> &[MeteorInstance] {
        &self.instances
    }

    /// Record the meteor draw.
    pub fn draw(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        bind_groups: &DrawBindGroups<'_>,
    ) {
        if self.instances.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, bind_groups.camera, &[]);
        render_pass.set_vertex_buffer(0, self.segment_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.draw(0..2, 0..self.instances.len() as u32);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn meteor(opacity: f32) -> Meteor {
        Meteor {
            position: Vec3::new(-6.0, 5.0, -3.0),
            velocity: Vec3::new(0.2, -0.23, 0.06),
            opacity,
        }
    }

    #[test]
    fn instance_is_28_bytes() {
        assert_eq!(size_of::<MeteorInstance>(), 28);
    }

    #[test]
    fn overshoot_is_clamped_for_the_gpu() {
        let color = [1.0, 0.7, 0.4];
        assert_eq!(MeteorInstance::new(&meteor(-0.005), color).opacity, 0.0);
        assert_eq!(MeteorInstance::new(&meteor(0.4), color).opacity, 0.4);
        assert_eq!(MeteorInstance::new(&meteor(1.5), color).opacity, 1.0);
    }

    #[test]
    fn instance_follows_position() {
        let m = meteor(1.0);
        let i = MeteorInstance::new(&m, [1.0; 3]);
        assert_eq!(i.offset, [-6.0, 5.0, -3.0]);
    }
}
