//! Camera system for viewing the globe.
//!
//! Provides a perspective camera, orbit controls with damping and
//! auto-rotation, the GPU uniform, and input handling.

/// Camera plus GPU uniform resources.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Pointer-event camera input handler.
pub mod input;
/// Orbit controls in spherical coordinates.
pub mod orbit;
