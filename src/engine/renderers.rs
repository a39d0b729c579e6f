use crate::error::GlobeError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::{RenderTarget, SampledTexture};
use crate::gpu::texture_loader::DecodedImage;
use crate::options::Options;
use crate::renderer::pipeline_util::{SharedLayouts, TargetFormat};
use crate::renderer::{EarthRenderer, MeteorRenderer, StarRenderer};
use crate::scene::Scene;

/// All scene renderers grouped together.
pub(crate) struct Renderers {
    pub earth: EarthRenderer,
    pub stars: StarRenderer,
    pub meteors: MeteorRenderer,
}

impl Renderers {
    /// Create every renderer for the current scene.
    pub fn new(
        context: &RenderContext,
        layouts: SharedLayouts<'_>,
        target: TargetFormat,
        scene: &Scene,
        options: &Options,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, GlobeError> {
        let earth = EarthRenderer::new(
            context,
            shader_composer,
            target,
            layouts,
            &scene.earth,
            &options.earth,
        )?;
        let stars = StarRenderer::new(
            context,
            shader_composer,
            target,
            layouts,
            &scene.stars,
            &options.stars,
        )?;
        let meteors = MeteorRenderer::new(
            context,
            shader_composer,
            target,
            layouts,
            &scene.meteors,
        )?;
        Ok(Self {
            earth,
            stars,
            meteors,
        })
    }

    /// Upload the night-lights image and bind it to the globe.
    pub fn apply_night_texture(
        &mut self,
        context: &RenderContext,
        image: &DecodedImage,
    ) -> Result<(), GlobeError> {
        let texture = SampledTexture::from_rgba(
            &context.device,
            &context.queue,
            "Earth Night Texture",
            &image.rgba,
            image.width,
            image.height,
            &image.mips,
        )?;
        self.earth.set_texture(&context.device, texture);
        Ok(())
    }

    /// Push per-frame scene state to the GPU.
    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        self.stars.update(queue, &scene.stars);
        self.meteors.update(queue, &scene.meteors);
    }
}

/// Attachments the scene pass renders into besides the surface texture.
pub(crate) struct FrameTargets {
    /// Multisampled color buffer, resolved into the surface (MSAA only).
    pub msaa: Option<RenderTarget>,
    /// Depth buffer.
    pub depth: RenderTarget,
}

impl FrameTargets {
    /// Allocate targets for the current surface size.
    #[must_use]
    pub fn new(context: &RenderContext, target: TargetFormat) -> Self {
        let size = context.size();
        let msaa = (target.sample_count > 1).then(|| {
            RenderTarget::new(
                &context.device,
                "MSAA Color Target",
                size,
                target.color,
                target.sample_count,
            )
        });
        let depth =
            RenderTarget::depth(&context.device, size, target.sample_count);
        Self { msaa, depth }
    }
}
