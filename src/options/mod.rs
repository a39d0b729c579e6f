//! Centralized scene options with TOML file support.
//!
//! Every tweakable constant (camera, orbit controls, lighting, Earth material,
//! star field, meteors, display) lives here, with defaults that reproduce the
//! stock look. Options serialize to/from TOML; colors are written as hex
//! integers (`color = 0xffddaa`).

mod camera;
mod controls;
mod display;
mod earth;
mod lighting;
mod meteors;
mod stars;

use std::path::Path;

pub use camera::CameraOptions;
pub use controls::ControlsOptions;
pub use display::DisplayOptions;
pub use earth::EarthOptions;
pub use lighting::LightingOptions;
pub use meteors::MeteorOptions;
use serde::{Deserialize, Serialize};
pub use stars::StarOptions;

use crate::error::GlobeError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[meteors]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Surface and frame-loop settings.
    pub display: DisplayOptions,
    /// Camera projection and placement.
    pub camera: CameraOptions,
    /// Orbit controller behaviour.
    pub controls: ControlsOptions,
    /// Ambient and directional light.
    pub lighting: LightingOptions,
    /// Earth geometry and material.
    pub earth: EarthOptions,
    /// Backdrop star cloud.
    pub stars: StarOptions,
    /// Shooting meteors.
    pub meteors: MeteorOptions,
}

impl Options {
    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::OptionsParse`] on malformed TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, GlobeError> {
        toml::from_str(content)
            .map_err(|e| GlobeError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError::Io`] if the file cannot be read, or
    /// [`GlobeError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, GlobeError> {
        let content = std::fs::read_to_string(path).map_err(GlobeError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), GlobeError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlobeError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GlobeError::Io)?;
        }
        std::fs::write(path, content).map_err(GlobeError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[meteors]
count = 5
color = 0xff0000
";
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.meteors.count, 5);
        assert_eq!(opts.meteors.color, 0xff_00_00);
        // Everything else should be default
        assert_eq!(opts.meteors.fade_per_frame, 0.015);
        assert_eq!(opts.stars.count, 1500);
        assert!(!opts.controls.enable_zoom);
    }

    #[test]
    fn defaults_match_stock_scene() {
        let opts = Options::default();
        assert_eq!(opts.camera.fovy, 35.0);
        assert_eq!(opts.camera.position, [0.0, 0.0, 4.0]);
        assert_eq!(opts.controls.damping_factor, 0.05);
        assert_eq!(opts.controls.auto_rotate_speed, 1.3);
        assert!(!opts.controls.enable_pan);
        assert_eq!(opts.lighting.directional_position, [5.0, 3.0, 5.0]);
        assert_eq!(opts.earth.texture_path, "assets/earth_night.jpg");
        assert_eq!(opts.stars.rotation_speed, 0.0004);
        assert_eq!(opts.meteors.count, 3);
        assert_eq!(opts.meteors.floor_y, -5.0);
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml_str("[meteors\ncount = ").unwrap_err();
        assert!(matches!(err, GlobeError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join("earthglow-options-test");
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.stars.count = 42;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(dir);
    }
}
