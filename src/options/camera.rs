use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and placement.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Initial eye position.
    pub position: [f32; 3],
    /// Orbit target.
    pub target: [f32; 3],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 35.0,
            znear: 0.1,
            zfar: 100.0,
            position: [0.0, 0.0, 4.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}
