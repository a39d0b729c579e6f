use glam::Vec3;
use wgpu::util::DeviceExt;

use super::core::{Camera, CameraUniform};
use super::orbit::OrbitControls;
use crate::gpu::render_context::RenderContext;
use crate::options::{CameraOptions, ControlsOptions};

/// Owns the camera, its orbit controls, and the GPU uniform they feed.
pub struct CameraController {
    /// The perspective camera.
    pub camera: Camera,
    /// Orbit controls driving `camera`.
    pub controls: OrbitControls,
    /// CPU copy of the uniform.
    pub uniform: CameraUniform,
    /// Uniform buffer at group 0, binding 0.
    pub buffer: wgpu::Buffer,
    /// Bind group layout shared by every pipeline.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group for `buffer`.
    pub bind_group: wgpu::BindGroup,
}

impl CameraController {
    /// Build the camera from options and upload its initial uniform.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        camera_options: &CameraOptions,
        controls_options: &ControlsOptions,
    ) -> Self {
        let (width, height) = context.size();
        let camera = Camera {
            eye: Vec3::from_array(camera_options.position),
            target: Vec3::from_array(camera_options.target),
            up: Vec3::Y,
            aspect: width as f32 / height.max(1) as f32,
            fovy: camera_options.fovy,
            znear: camera_options.znear,
            zfar: camera_options.zfar,
        };
        let controls = OrbitControls::new(
            Vec3::from_array(camera_options.target),
            controls_options.clone(),
        );

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);
        uniform.set_viewport(width, height);

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Camera Bind Group"),
                });

        Self {
            camera,
            controls,
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Run the orbit controls for this frame.
    pub fn update(&mut self) {
        self.controls.update(&mut self.camera);
    }

    /// Upload the current camera state.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update_view_proj(&self.camera);
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );
    }

    /// New aspect ratio and sprite viewport for a resized surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
        self.uniform.set_viewport(width, height);
    }
}
