use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Orbit controller behaviour.
pub struct ControlsOptions {
    /// Pointer drag rotates the camera around the target.
    pub enable_rotate: bool,
    /// Scroll wheel dollies the camera.
    pub enable_zoom: bool,
    /// Right-drag or shift-drag moves the target.
    pub enable_pan: bool,
    /// Smooth rotation by decaying the accumulated delta.
    pub enable_damping: bool,
    /// Fraction of the pending delta applied per update when damping.
    pub damping_factor: f32,
    /// Spin around the target while the pointer is idle.
    pub auto_rotate: bool,
    /// Auto-rotation speed; 1.0 is one turn per 60 updates of 60 frames.
    pub auto_rotate_speed: f32,
    /// Drag rotation sensitivity.
    pub rotate_speed: f32,
    /// Wheel dolly sensitivity.
    pub zoom_speed: f32,
    /// Pan sensitivity.
    pub pan_speed: f32,
    /// Closest allowed distance to the target.
    pub min_distance: f32,
    /// Farthest allowed distance to the target.
    pub max_distance: f32,
    /// Lower polar angle limit in radians (0 = straight above).
    pub min_polar_angle: f32,
    /// Upper polar angle limit in radians (PI = straight below).
    pub max_polar_angle: f32,
}

impl Default for ControlsOptions {
    fn default() -> Self {
        Self {
            enable_rotate: true,
            enable_zoom: false,
            enable_pan: false,
            enable_damping: true,
            damping_factor: 0.05,
            auto_rotate: true,
            auto_rotate_speed: 1.3,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: std::f32::consts::PI,
        }
    }
}
