//! The globe rendering engine and its frame loop.

mod input;
mod options;
pub(crate) mod renderers;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use self::renderers::{FrameTargets, Renderers};
use crate::camera::controller::CameraController;
use crate::camera::input::InputHandler;
use crate::error::GlobeError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture_loader::TextureLoader;
use crate::options::Options;
use crate::renderer::pipeline_util::{
    DrawBindGroups, SharedLayouts, TargetFormat,
};
use crate::scene::Scene;
use crate::util::frame_timing::FrameTiming;
use crate::util::lighting::Lighting;
use crate::util::viewport::ScaledViewport;

/// The rendering engine for the globe scene.
///
/// Owns the GPU context, the camera with its orbit controls, the lighting,
/// the scene (Earth, stars, meteors) and one renderer per scene object.
///
/// # Construction
///
/// Use [`GlobeEngine::new`] with a window or canvas, or
/// [`GlobeEngine::from_context`] with a pre-built [`RenderContext`]. The
/// Earth texture starts loading immediately and is bound when it arrives;
/// until then the globe is drawn untextured.
///
/// # Frame loop
///
/// Each displayed frame, call [`frame`](Self::frame), which advances the
/// animation by one step with [`update`](Self::update) and draws it with
/// [`render`](Self::render). Steps are per frame, not per second, so the animation speed
/// follows the display refresh rate. Call [`resize`](Self::resize) when the
/// container size changes and forward pointer input through
/// [`handle_input`](Self::handle_input).
pub struct GlobeEngine {
    /// Core wgpu device, queue, and surface.
    pub context: RenderContext,
    shader_composer: ShaderComposer,

    /// Camera, orbit controls and camera uniform.
    pub camera_controller: CameraController,
    /// Pointer state feeding the orbit controls.
    input: InputHandler,
    /// GPU lighting uniform and bind group.
    pub lighting: Lighting,
    /// Everything that animates.
    scene: Scene,
    /// Per-object renderers.
    pub(crate) renderers: Renderers,
    /// MSAA and depth attachments.
    targets: FrameTargets,
    /// Pending night-lights texture load.
    texture_loader: TextureLoader,
    /// Random source for star placement and meteor respawns.
    rng: SmallRng,
    /// Runtime options.
    options: Options,
    /// Per-frame timing and FPS tracking.
    pub(crate) frame_timing: FrameTiming,
}

// =============================================================================
// Core
// =============================================================================

impl GlobeEngine {
    /// Engine with default options rendering into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError`] if GPU initialization or shader composition
    /// fails.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
    ) -> Result<Self, GlobeError> {
        Self::new_with_options(target, size, Options::default()).await
    }

    /// Engine with the given options rendering into `target`.
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError`] if GPU initialization or shader composition
    /// fails.
    pub async fn new_with_options(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, GlobeError> {
        let context = RenderContext::new(target, size).await?;
        Self::from_context(context, options)
    }

    /// Engine from a pre-built [`RenderContext`] (for embedding or
    /// texture-only rendering).
    ///
    /// # Errors
    ///
    /// Returns [`GlobeError`] if shader composition or placeholder texture
    /// creation fails.
    pub fn from_context(
        context: RenderContext,
        options: Options,
    ) -> Result<Self, GlobeError> {
        let mut shader_composer = ShaderComposer::new()?;
        let camera_controller = CameraController::new(
            &context,
            &options.camera,
            &options.controls,
        );
        let lighting = Lighting::new(&context, &options.lighting);

        let mut rng = SmallRng::from_os_rng();
        let scene = Scene::new(&mut rng, &options);

        let target = target_format(&context, &options);
        let renderers = Renderers::new(
            &context,
            SharedLayouts {
                camera: &camera_controller.layout,
                lighting: &lighting.layout,
            },
            target,
            &scene,
            &options,
            &mut shader_composer,
        )?;
        let targets = FrameTargets::new(&context, target);

        let texture_loader = TextureLoader::start(&options.earth.texture_path);
        let frame_timing = FrameTiming::new(options.display.target_fps);

        log::info!(
            "Globe ready: {} stars, {} meteors, {}x{} ({} samples)",
            scene.stars.positions().len(),
            scene.meteors.meteors().len(),
            context.config.width,
            context.config.height,
            target.sample_count,
        );

        Ok(Self {
            context,
            shader_composer,
            camera_controller,
            input: InputHandler::new(),
            lighting,
            scene,
            renderers,
            targets,
            texture_loader,
            rng,
            options,
            frame_timing,
        })
    }

    /// Bind the night-lights texture once its load finishes.
    fn poll_texture(&mut self) {
        let Some(result) = self.texture_loader.poll() else {
            return;
        };
        let applied = result.and_then(|image| {
            self.renderers.apply_night_texture(&self.context, &image)?;
            Ok(image)
        });
        match applied {
            Ok(image) => log::info!(
                "Earth texture '{}' loaded ({}x{})",
                self.options.earth.texture_path,
                image.width,
                image.height
            ),
            Err(e) => log::warn!(
                "Earth texture '{}' unavailable, drawing untextured: {e}",
                self.options.earth.texture_path
            ),
        }
    }

    /// Advance the animation by one frame: bind the texture if it has
    /// arrived, spin the stars, move the meteors, then run the orbit
    /// controls.
    pub fn update(&mut self) {
        self.poll_texture();
        let _ = self.scene.advance(&mut self.rng);
        self.camera_controller.update();
    }

    /// Uniform and instance uploads for the frame about to be drawn.
    fn pre_render(&mut self) {
        self.camera_controller.update_gpu(&self.context.queue);
        self.renderers.update(&self.context.queue, &self.scene);
    }

    /// Encode the scene pass: the opaque globe first so the translucent
    /// stars and meteors depth-test against it.
    fn encode_scene_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    ) {
        let [r, g, b, a] = self.options.display.clear_color.map(f64::from);
        let (color_view, resolve_target) = match &self.targets.msaa {
            Some(msaa) => (&msaa.view, Some(view)),
            None => (view, None),
        };

        let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene render pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(
                wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                },
            ),
            ..Default::default()
        });

        let bind_groups = DrawBindGroups {
            camera: &self.camera_controller.bind_group,
            lighting: &self.lighting.bind_group,
        };

        self.renderers.earth.draw(&mut rp, &bind_groups);
        self.renderers.stars.draw(&mut rp, &bind_groups);
        self.renderers.meteors.draw(&mut rp, &bind_groups);
    }

    /// One displayed frame: advance the animation and draw it. Skipped
    /// entirely while the frame cap says it is too early, so a capped
    /// frame rate also slows the animation.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render).
    pub fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.frame_timing.should_render() {
            return Ok(());
        }
        self.update();
        self.render()
    }

    /// Draw the current frame and present it. Always draws; the frame cap
    /// is applied by [`frame`](Self::frame).
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired. Hosts reconfigure with [`resize`](Self::resize) on
    /// `Lost`/`Outdated`.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.pre_render();

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();
        self.encode_scene_pass(&mut encoder, &view);
        self.context.submit(encoder);
        frame.present();

        self.frame_timing.end_frame();
        Ok(())
    }

    /// Render the scene to the given texture view. The caller owns the
    /// texture; no surface present happens. The view must match the
    /// context's format and size.
    pub fn render_to_texture(&mut self, view: &wgpu::TextureView) {
        self.pre_render();
        let mut encoder = self.context.create_encoder();
        self.encode_scene_pass(&mut encoder, view);
        self.context.submit(encoder);
        self.frame_timing.end_frame();
    }

    /// Match the camera aspect ratio and the surface to a new container
    /// size. Zero-sized dimensions are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.context.resize(width, height);
            self.camera_controller.resize(width, height);
            let target = target_format(&self.context, &self.options);
            self.targets = FrameTargets::new(&self.context, target);
        }
    }

    /// Resize for a container measured in CSS pixels on a HiDPI display:
    /// the surface takes the scaled buffer size while the camera keeps the
    /// container's exact aspect.
    pub fn resize_scaled(&mut self, viewport: ScaledViewport) {
        self.resize(viewport.width, viewport.height);
        self.camera_controller.camera.aspect = viewport.aspect;
    }

    /// Current surface size in physical pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.context.size()
    }

    /// The animated scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Whether the Earth texture has been bound.
    #[must_use]
    pub fn is_textured(&self) -> bool {
        self.renderers.earth.is_textured()
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }
}

/// Color format and MSAA sample count for the given context and options.
fn target_format(context: &RenderContext, options: &Options) -> TargetFormat {
    TargetFormat {
        color: context.format(),
        sample_count: options.display.sample_count(),
    }
}
