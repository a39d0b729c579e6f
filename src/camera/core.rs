use glam::{Mat4, Vec3};

use crate::options::CameraOptions;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
    /// Camera forward direction.
    pub forward: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Surface size in physical pixels (star sprite sizing).
    pub viewport: [f32; 2],
    /// Padding for GPU alignment.
    pub(crate) _pad: [f32; 2],
}

impl Camera {
    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        self.build_projection() * view
    }

    /// Projection matrix alone.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Take projection parameters (fov, near, far) from options.
    pub fn set_projection(&mut self, options: &CameraOptions) {
        self.fovy = options.fovy;
        self.znear = options.znear;
        self.zfar = options.zfar;
    }

    /// Move to a new placement when `position` or `target` differ between
    /// `old` and `new`. An unchanged placement leaves the orbit the user
    /// has dragged to alone. Returns whether the camera moved.
    pub fn place(&mut self, old: &CameraOptions, new: &CameraOptions) -> bool {
        let mut moved = false;
        if old.position != new.position {
            self.eye = Vec3::from_array(new.position);
            moved = true;
        }
        if old.target != new.target {
            self.target = Vec3::from_array(new.target);
            moved = true;
        }
        moved
    }

    /// Set the aspect ratio from a viewport size. The projection is rebuilt
    /// from `aspect` on every [`build_matrix`](Self::build_matrix) call, so
    /// this is all a resize needs.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.0,
            forward: [0.0, 0.0, -1.0],
            fovy: 35.0,
            viewport: [1.0, 1.0],
            _pad: [0.0; 2],
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
        self.aspect = camera.aspect;
        let forward = (camera.target - camera.eye).normalize_or_zero();
        self.forward = forward.to_array();
        self.fovy = camera.fovy;
    }

    /// Record the surface size used for pixel-sized sprites.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = [width.max(1) as f32, height.max(1) as f32];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 0.0, 4.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 35.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    #[test]
    fn uniform_is_112_bytes() {
        assert_eq!(size_of::<CameraUniform>(), 112);
    }

    #[test]
    fn set_viewport_sets_exact_aspect() {
        let mut cam = camera();
        cam.set_viewport(1280, 720);
        assert_eq!(cam.aspect, 1280.0 / 720.0);

        // Zero height leaves the previous aspect alone.
        cam.set_viewport(640, 0);
        assert_eq!(cam.aspect, 1280.0 / 720.0);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = camera();
        let clip = cam.build_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn uniform_tracks_camera() {
        let cam = camera();
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&cam);
        assert_eq!(uniform.position, [0.0, 0.0, 4.0]);
        assert_eq!(uniform.forward, [0.0, 0.0, -1.0]);
    }

    #[test]
    fn new_position_moves_the_eye() {
        let mut cam = camera();
        cam.eye = Vec3::new(2.0, 1.0, 3.0);
        let old = CameraOptions::default();
        let new = CameraOptions {
            position: [0.0, 0.0, 6.0],
            ..CameraOptions::default()
        };
        assert!(cam.place(&old, &new));
        assert_eq!(cam.eye, Vec3::new(0.0, 0.0, 6.0));
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn unchanged_placement_keeps_the_orbit() {
        let mut cam = camera();
        cam.eye = Vec3::new(2.0, 1.0, 3.0);
        let old = CameraOptions::default();
        let new = CameraOptions {
            fovy: 50.0,
            ..CameraOptions::default()
        };
        assert!(!cam.place(&old, &new));
        cam.set_projection(&new);
        assert_eq!(cam.eye, Vec3::new(2.0, 1.0, 3.0));
        assert_eq!(cam.fovy, 50.0);
    }
}
