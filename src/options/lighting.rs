use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// One ambient light plus one directional light.
pub struct LightingOptions {
    /// Ambient light color (sRGB hex).
    pub ambient_color: u32,
    /// Ambient light intensity.
    pub ambient_intensity: f32,
    /// Directional light color (sRGB hex).
    pub directional_color: u32,
    /// Directional light intensity.
    pub directional_intensity: f32,
    /// Directional light position; it shines toward the origin.
    pub directional_position: [f32; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient_color: 0x40_40_40,
            ambient_intensity: 1.5,
            directional_color: 0xff_ff_ff,
            directional_intensity: 1.2,
            directional_position: [5.0, 3.0, 5.0],
        }
    }
}
