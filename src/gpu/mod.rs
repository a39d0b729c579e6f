//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, textures, pipeline
//! boilerplate, and shader composition.

/// Shared wgpu boilerplate for bind group layouts and pipeline state.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Sampled textures and render attachments.
pub mod texture;
/// Background decoding of the Earth texture.
pub mod texture_loader;
