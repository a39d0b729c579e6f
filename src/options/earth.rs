use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Earth sphere geometry and material.
pub struct EarthOptions {
    /// Night-lights texture, used as both color and emissive map. Relative
    /// paths resolve against the working directory (native) or the page
    /// URL (web).
    pub texture_path: String,
    /// Sphere radius.
    pub radius: f32,
    /// Segments around the equator.
    pub width_segments: u32,
    /// Segments from pole to pole.
    pub height_segments: u32,
    /// Emissive tint (sRGB hex).
    pub emissive: u32,
    /// Emissive strength.
    pub emissive_intensity: f32,
    /// Specular tint (sRGB hex).
    pub specular: u32,
    /// Phong shininess exponent.
    pub shininess: f32,
}

impl Default for EarthOptions {
    fn default() -> Self {
        Self {
            texture_path: "assets/earth_night.jpg".to_owned(),
            radius: 1.0,
            width_segments: 64,
            height_segments: 64,
            emissive: 0x28_58_ff,
            emissive_intensity: 0.75,
            specular: 0x11_11_11,
            shininess: 20.0,
        }
    }
}
