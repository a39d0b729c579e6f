use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Shooting-meteor streaks.
pub struct MeteorOptions {
    /// Number of meteors alive at once.
    pub count: usize,
    /// Streak length (tail to head, along +X).
    pub length: f32,
    /// Streak color (sRGB hex).
    pub color: u32,
    /// Lower corner of the spawn box.
    pub spawn_min: [f32; 3],
    /// Upper corner of the spawn box.
    pub spawn_max: [f32; 3],
    /// Per-axis lower velocity bound (units per frame).
    pub velocity_min: [f32; 3],
    /// Per-axis upper velocity bound (units per frame).
    pub velocity_max: [f32; 3],
    /// Opacity lost per frame.
    pub fade_per_frame: f32,
    /// A meteor whose y drops below this respawns.
    pub floor_y: f32,
}

impl Default for MeteorOptions {
    fn default() -> Self {
        Self {
            count: 3,
            length: 0.8,
            color: 0xff_dd_aa,
            spawn_min: [-8.0, 4.0, -5.0],
            spawn_max: [-5.0, 6.0, -2.0],
            velocity_min: [0.18, -0.25, 0.05],
            velocity_max: [0.23, -0.22, 0.08],
            fade_per_frame: 0.015,
            floor_y: -5.0,
        }
    }
}
