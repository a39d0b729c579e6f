use serde::{Deserialize, Serialize};

/// Surface and frame-loop settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayOptions {
    /// 4x MSAA on the main pass.
    pub antialias: bool,
    /// Clear color (linear RGBA). Zero alpha keeps the canvas transparent.
    pub clear_color: [f32; 4],
    /// Frame cap in FPS (0 = every display refresh).
    pub target_fps: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            antialias: true,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            target_fps: 0,
        }
    }
}

impl DisplayOptions {
    /// MSAA sample count implied by `antialias`.
    #[must_use]
    pub fn sample_count(&self) -> u32 {
        if self.antialias {
            4
        } else {
            1
        }
    }
}
