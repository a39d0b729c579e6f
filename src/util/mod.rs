//! Shared utilities for the rendering engine.
//!
//! Helpers for frame timing, hex color decoding, container sizing, and the
//! scene lighting uniform.

pub mod color;
pub mod frame_timing;
pub mod lighting;
pub mod viewport;
