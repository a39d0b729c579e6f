//! Render state shared by every scene pipeline.

use crate::gpu::texture::DEPTH_FORMAT;

/// Bind groups shared across all scene draw calls.
pub struct DrawBindGroups<'a> {
    /// Camera uniform bind group (group 0).
    pub camera: &'a wgpu::BindGroup,
    /// Lighting uniform bind group (group 1, lit pipelines only).
    pub lighting: &'a wgpu::BindGroup,
}

/// Bind group layouts shared across all scene pipelines.
#[derive(Clone, Copy)]
pub struct SharedLayouts<'a> {
    /// Camera uniform layout (group 0).
    pub camera: &'a wgpu::BindGroupLayout,
    /// Lighting uniform layout (group 1).
    pub lighting: &'a wgpu::BindGroupLayout,
}

/// Surface format and sample count every pipeline must agree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetFormat {
    /// Color attachment format.
    pub color: wgpu::TextureFormat,
    /// MSAA sample count (1 disables multisampling).
    pub sample_count: u32,
}

/// Single color target with straight alpha blending.
///
/// Clearing to transparent black and blending with `ALPHA_BLENDING` leaves
/// premultiplied color in the target, which is what a transparent canvas
/// composites.
#[must_use]
pub fn fragment_targets(
    format: wgpu::TextureFormat,
) -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

/// Depth state: opaque geometry writes depth, translucent geometry only
/// tests against it.
#[must_use]
pub fn depth_stencil_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Everything that differs between the scene pipelines.
pub struct PipelineSpec<'a> {
    /// Debug label.
    pub label: &'a str,
    /// Composed shader with `vs_main` and `fs_main`.
    pub shader: &'a wgpu::ShaderModule,
    /// Vertex and instance buffer layouts, in slot order.
    pub buffers: &'a [wgpu::VertexBufferLayout<'a>],
    /// Bind group layouts, in group order.
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    /// Primitive topology.
    pub topology: wgpu::PrimitiveTopology,
    /// Face culling.
    pub cull_mode: Option<wgpu::Face>,
    /// Whether the pipeline writes depth.
    pub depth_write: bool,
}

/// Create a scene render pipeline.
#[must_use]
pub fn create_pipeline(
    device: &wgpu::Device,
    target: TargetFormat,
    spec: &PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Layout", spec.label)),
            bind_group_layouts: spec.bind_group_layouts,
            push_constant_ranges: &[],
        });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: spec.shader,
            entry_point: Some("vs_main"),
            buffers: spec.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.shader,
            entry_point: Some("fs_main"),
            targets: &fragment_targets(target.color),
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            cull_mode: spec.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(depth_stencil_state(spec.depth_write)),
        multisample: wgpu::MultisampleState {
            count: target.sample_count,
            ..Default::default()
        },
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translucent_passes_keep_depth_read_only() {
        assert!(depth_stencil_state(true).depth_write_enabled);
        assert!(!depth_stencil_state(false).depth_write_enabled);
        assert_eq!(depth_stencil_state(false).format, DEPTH_FORMAT);
    }

    #[test]
    fn color_target_blends() {
        let [target] = fragment_targets(wgpu::TextureFormat::Bgra8UnormSrgb);
        let target = target.unwrap();
        assert_eq!(target.blend, Some(wgpu::BlendState::ALPHA_BLENDING));
    }
}
