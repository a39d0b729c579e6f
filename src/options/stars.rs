use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Backdrop star cloud.
pub struct StarOptions {
    /// Number of stars.
    pub count: usize,
    /// Edge length of the cube the stars are scattered in, centered on the
    /// origin.
    pub spread: f32,
    /// Star color (sRGB hex).
    pub color: u32,
    /// Point size in world units (attenuated with distance).
    pub size: f32,
    /// Star opacity.
    pub opacity: f32,
    /// Rotation about Y added every frame, in radians.
    pub rotation_speed: f32,
}

impl Default for StarOptions {
    fn default() -> Self {
        Self {
            count: 1500,
            spread: 50.0,
            color: 0xff_ff_ff,
            size: 0.05,
            opacity: 0.9,
            rotation_speed: 0.0004,
        }
    }
}
