//! Orbit controls: pointer-drag rotation around a target with optional
//! damping, auto-rotation, dolly and pan.
//!
//! All state lives in spherical coordinates relative to the target (Y up).
//! Input calls only accumulate deltas; [`OrbitControls::update`] applies them
//! to a [`Camera`] once per frame.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::core::Camera;
use crate::options::ControlsOptions;

/// Keeps the polar angle off the exact poles, where `look_at` degenerates.
const POLE_EPS: f32 = 1e-6;

/// What the pointer is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    /// No button held.
    Idle,
    /// Dragging rotates.
    Rotate,
    /// Dragging pans.
    Pan,
}

/// Spherical coordinates: `theta` around Y from +Z, `phi` down from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    /// Distance from the origin.
    pub radius: f32,
    /// Polar angle from +Y.
    pub phi: f32,
    /// Azimuth around +Y, measured from +Z toward +X.
    pub theta: f32,
}

impl Spherical {
    /// Spherical coordinates of a cartesian offset.
    #[must_use]
    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Cartesian offset of these coordinates.
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }
}

/// Camera orbit controller.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    settings: ControlsOptions,
    state: DragState,
    /// Pending rotation (theta, phi) not yet applied.
    delta_theta: f32,
    delta_phi: f32,
    /// Pending dolly factor (1.0 = none).
    scale: f32,
    /// Pending target translation.
    pan_offset: Vec3,
}

impl OrbitControls {
    /// Controls orbiting `target` with the given settings.
    #[must_use]
    pub fn new(target: Vec3, settings: ControlsOptions) -> Self {
        Self {
            target,
            settings,
            state: DragState::Idle,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Current controller settings.
    #[must_use]
    pub fn settings(&self) -> &ControlsOptions {
        &self.settings
    }

    /// Replace the controller settings. Pending deltas are kept.
    pub fn set_settings(&mut self, settings: ControlsOptions) {
        self.settings = settings;
    }

    /// Current drag state.
    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Start a drag. `pan` selects panning (right button or shift-drag).
    /// Disabled modes leave the controller idle.
    pub fn begin_drag(&mut self, pan: bool) {
        self.state = if pan {
            if self.settings.enable_pan {
                DragState::Pan
            } else {
                DragState::Idle
            }
        } else if self.settings.enable_rotate {
            DragState::Rotate
        } else {
            DragState::Idle
        };
    }

    /// End any drag in progress.
    pub fn end_drag(&mut self) {
        self.state = DragState::Idle;
    }

    /// Pointer moved by `delta` pixels during a drag on an element
    /// `element_height` pixels tall.
    pub fn drag(&mut self, delta: Vec2, element_height: f32, camera: &Camera) {
        let height = element_height.max(1.0);
        match self.state {
            DragState::Rotate => {
                let speed = self.settings.rotate_speed;
                self.rotate_left(TAU * delta.x / height * speed);
                self.rotate_up(TAU * delta.y / height * speed);
            }
            DragState::Pan => self.pan(delta, height, camera),
            DragState::Idle => {}
        }
    }

    /// Rotate around the target horizontally by `angle` radians.
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Rotate around the target vertically by `angle` radians.
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Wheel input; positive `delta` moves toward the target. Ignored unless
    /// zoom is enabled.
    pub fn zoom(&mut self, delta: f32) {
        if !self.settings.enable_zoom || delta == 0.0 {
            return;
        }
        let step = 0.95_f32.powf(self.settings.zoom_speed);
        if delta > 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Translate the target by a screen-space delta, scaled so the point
    /// under the cursor tracks the pointer at the target's depth.
    fn pan(&mut self, delta: Vec2, element_height: f32, camera: &Camera) {
        let offset = camera.eye - self.target;
        let target_distance =
            offset.length() * (camera.fovy.to_radians() / 2.0).tan();
        let forward = (-offset).normalize_or_zero();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward);
        let scale = 2.0 * target_distance / element_height
            * self.settings.pan_speed;
        self.pan_offset += right * (-delta.x * scale) + up * (delta.y * scale);
    }

    /// Per-update auto-rotation angle in radians.
    fn auto_rotation_angle(&self) -> f32 {
        TAU / 60.0 / 60.0 * self.settings.auto_rotate_speed
    }

    /// Apply pending input (and auto-rotation) to `camera`. Call once per
    /// frame.
    pub fn update(&mut self, camera: &mut Camera) {
        let mut spherical = Spherical::from_vec3(camera.eye - self.target);

        if self.settings.auto_rotate && self.state == DragState::Idle {
            self.rotate_left(self.auto_rotation_angle());
        }

        let damping = self.settings.enable_damping;
        let factor = self.settings.damping_factor;

        if damping {
            spherical.theta += self.delta_theta * factor;
            spherical.phi += self.delta_phi * factor;
        } else {
            spherical.theta += self.delta_theta;
            spherical.phi += self.delta_phi;
        }

        let min_phi = self.settings.min_polar_angle.max(POLE_EPS);
        let max_phi = self.settings.max_polar_angle.min(PI - POLE_EPS);
        spherical.phi = spherical.phi.clamp(min_phi, max_phi.max(min_phi));

        spherical.radius = (spherical.radius * self.scale).clamp(
            self.settings.min_distance,
            self.settings.max_distance.max(self.settings.min_distance),
        );

        if damping {
            self.target += self.pan_offset * factor;
        } else {
            self.target += self.pan_offset;
        }

        camera.eye = self.target + spherical.to_vec3();
        camera.target = self.target;
        camera.up = Vec3::Y;

        if damping {
            self.delta_theta *= 1.0 - factor;
            self.delta_phi *= 1.0 - factor;
            self.pan_offset *= 1.0 - factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;
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

    fn still() -> ControlsOptions {
        ControlsOptions {
            auto_rotate: false,
            ..ControlsOptions::default()
        }
    }

    #[test]
    fn spherical_round_trip() {
        let v = Vec3::new(1.5, -2.0, 3.0);
        let back = Spherical::from_vec3(v).to_vec3();
        assert!((back - v).length() < 1e-5);
    }

    #[test]
    fn camera_on_plus_z_has_zero_theta() {
        let s = Spherical::from_vec3(Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(s.radius, 4.0);
        assert_eq!(s.theta, 0.0);
        assert!((s.phi - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn auto_rotate_keeps_distance_and_height() {
        let mut controls = OrbitControls::new(Vec3::ZERO, ControlsOptions::default());
        let mut cam = camera();
        for _ in 0..600 {
            controls.update(&mut cam);
        }
        assert!((cam.eye.length() - 4.0).abs() < 1e-3);
        assert!(cam.eye.y.abs() < 1e-3);
        // Auto-rotate decrements theta: the eye swings toward -X.
        assert!(cam.eye.x < 0.0);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn damped_auto_rotate_settles_at_undamped_rate() {
        let mut controls = OrbitControls::new(Vec3::ZERO, ControlsOptions::default());
        let mut cam = camera();
        for _ in 0..2000 {
            controls.update(&mut cam);
        }
        let before = Spherical::from_vec3(cam.eye).theta;
        controls.update(&mut cam);
        let after = Spherical::from_vec3(cam.eye).theta;
        let expected = TAU / 3600.0 * 1.3;
        assert!(((before - after) - expected).abs() < 1e-5);
    }

    #[test]
    fn damping_spreads_a_drag_over_frames() {
        let mut controls = OrbitControls::new(Vec3::ZERO, still());
        let mut cam = camera();
        controls.begin_drag(false);
        controls.drag(Vec2::new(100.0, 0.0), 800.0, &cam);
        controls.end_drag();

        controls.update(&mut cam);
        let first = -Spherical::from_vec3(cam.eye).theta;
        let total = TAU * 100.0 / 800.0;
        assert!((first - total * 0.05).abs() < 1e-5);

        for _ in 0..1000 {
            controls.update(&mut cam);
        }
        let settled = -Spherical::from_vec3(cam.eye).theta;
        assert!((settled - total).abs() < 1e-3);
    }

    #[test]
    fn undamped_drag_applies_at_once() {
        let settings = ControlsOptions {
            enable_damping: false,
            ..still()
        };
        let mut controls = OrbitControls::new(Vec3::ZERO, settings);
        let mut cam = camera();
        controls.begin_drag(false);
        controls.drag(Vec2::new(0.0, -100.0), 800.0, &cam);
        controls.update(&mut cam);
        // Pointer moving up (negative y) grows phi: the eye dips below the
        // equator.
        let s = Spherical::from_vec3(cam.eye);
        assert!((s.phi - (PI / 2.0 + TAU * 100.0 / 800.0)).abs() < 1e-5);
        assert!(cam.eye.y < 0.0);
    }

    #[test]
    fn polar_angle_never_reaches_pole() {
        let settings = ControlsOptions {
            enable_damping: false,
            ..still()
        };
        let mut controls = OrbitControls::new(Vec3::ZERO, settings);
        let mut cam = camera();
        controls.begin_drag(false);
        controls.drag(Vec2::new(0.0, 10_000.0), 100.0, &cam);
        controls.update(&mut cam);
        assert!(cam.eye.y > 3.99);
        // Still off-axis, so look_at keeps a valid basis.
        assert!(cam.eye.z > 0.0);
    }

    #[test]
    fn auto_rotate_pauses_while_dragging() {
        let mut controls = OrbitControls::new(Vec3::ZERO, ControlsOptions::default());
        let mut cam = camera();
        controls.begin_drag(false);
        for _ in 0..10 {
            controls.update(&mut cam);
        }
        assert!(cam.eye.x.abs() < 1e-6);
    }

    #[test]
    fn zoom_and_pan_disabled_by_default() {
        let mut controls = OrbitControls::new(Vec3::ZERO, still());
        let mut cam = camera();
        controls.zoom(5.0);
        controls.begin_drag(true);
        assert_eq!(controls.state(), DragState::Idle);
        controls.drag(Vec2::new(50.0, 50.0), 800.0, &cam);
        for _ in 0..10 {
            controls.update(&mut cam);
        }
        assert!((cam.eye.length() - 4.0).abs() < 1e-5);
        assert_eq!(controls.target, Vec3::ZERO);
    }

    #[test]
    fn zoom_when_enabled_moves_closer() {
        let settings = ControlsOptions {
            enable_zoom: true,
            ..still()
        };
        let mut controls = OrbitControls::new(Vec3::ZERO, settings);
        let mut cam = camera();
        controls.zoom(1.0);
        controls.update(&mut cam);
        assert!((cam.eye.length() - 4.0 * 0.95).abs() < 1e-5);
    }

    #[test]
    fn pan_when_enabled_moves_target() {
        let settings = ControlsOptions {
            enable_pan: true,
            enable_damping: false,
            ..still()
        };
        let mut controls = OrbitControls::new(Vec3::ZERO, settings);
        let mut cam = camera();
        controls.begin_drag(true);
        assert_eq!(controls.state(), DragState::Pan);
        controls.drag(Vec2::new(100.0, 0.0), 800.0, &cam);
        controls.update(&mut cam);
        // Dragging right moves the target left.
        assert!(controls.target.x < 0.0);
        assert_eq!(cam.target, controls.target);
    }
}
