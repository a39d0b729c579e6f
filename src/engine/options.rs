//! Options methods for GlobeEngine

use std::path::Path;

use super::renderers::{FrameTargets, Renderers};
use super::{target_format, GlobeEngine};
use crate::error::GlobeError;
use crate::gpu::texture_loader::TextureLoader;
use crate::options::Options;
use crate::renderer::pipeline_util::SharedLayouts;
use crate::scene::Scene;
use crate::util::frame_timing::FrameTiming;

impl GlobeEngine {
    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace options and apply all changes to subsystems.
    ///
    /// Lighting, material, projection and control changes apply in place.
    /// A new camera position or target moves the camera there.
    /// Changes to the Earth geometry, the star field, the meteor shower or
    /// antialiasing rebuild the scene and its renderers. A new texture path
    /// starts a new load.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError`] if rebuilding the renderers fails; the engine
    /// keeps its previous scene in that case.
    pub fn set_options(&mut self, new: Options) -> Result<(), GlobeError> {
        let old = std::mem::replace(&mut self.options, new);
        if old.display.target_fps != self.options.display.target_fps {
            self.frame_timing =
                FrameTiming::new(self.options.display.target_fps);
        }

        let rebuild = old.stars != self.options.stars
            || old.meteors != self.options.meteors
            || old.display.antialias != self.options.display.antialias
            || old.earth.radius != self.options.earth.radius
            || old.earth.width_segments != self.options.earth.width_segments
            || old.earth.height_segments
                != self.options.earth.height_segments;
        let reload = old.earth.texture_path != self.options.earth.texture_path;

        if rebuild {
            if let Err(e) = self.rebuild_scene() {
                self.options = old;
                return Err(e);
            }
        } else if reload {
            self.restart_texture_load();
        }

        self.apply_options();
        let controller = &mut self.camera_controller;
        if controller.camera.place(&old.camera, &self.options.camera) {
            controller.controls.target = controller.camera.target;
        }
        Ok(())
    }

    /// Push current option values to all subsystems (lighting, material,
    /// camera, controls).
    pub fn apply_options(&mut self) {
        self.lighting
            .apply_options(&self.context.queue, &self.options.lighting);
        self.renderers
            .earth
            .apply_options(&self.context.queue, &self.options.earth);
        self.apply_camera();
    }

    /// Push projection and control options to the controller. Placement
    /// (position and target) only changes through
    /// [`set_options`](Self::set_options), so the orbit survives.
    fn apply_camera(&mut self) {
        self.camera_controller
            .camera
            .set_projection(&self.options.camera);
        self.camera_controller
            .controls
            .set_settings(self.options.controls.clone());
    }

    /// Regenerate the scene and every renderer from current options.
    fn rebuild_scene(&mut self) -> Result<(), GlobeError> {
        let scene = Scene::new(&mut self.rng, &self.options);
        let target = target_format(&self.context, &self.options);
        let renderers = Renderers::new(
            &self.context,
            SharedLayouts {
                camera: &self.camera_controller.layout,
                lighting: &self.lighting.layout,
            },
            target,
            &scene,
            &self.options,
            &mut self.shader_composer,
        )?;
        self.scene = scene;
        self.renderers = renderers;
        self.targets = FrameTargets::new(&self.context, target);

        // The fresh Earth renderer starts on the placeholder again.
        self.restart_texture_load();
        Ok(())
    }

    fn restart_texture_load(&mut self) {
        self.texture_loader =
            TextureLoader::start(&self.options.earth.texture_path);
    }

    /// Load options from a TOML file and apply them.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError`] if the file cannot be read or parsed, or if
    /// applying the options fails.
    pub fn load_options(&mut self, path: &Path) -> Result<(), GlobeError> {
        let options = Options::load(path)?;
        self.set_options(options)?;
        log::info!("Loaded options from {}", path.display());
        Ok(())
    }

    /// Save the current options to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError`] if serialization or the write fails.
    pub fn save_options(&self, path: &Path) -> Result<(), GlobeError> {
        self.options.save(path)?;
        log::info!("Saved options to {}", path.display());
        Ok(())
    }
}
