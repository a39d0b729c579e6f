// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (clippy default thresholds)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! A decorative night-side Earth rendered with wgpu.
//!
//! Earthglow draws a slowly auto-rotating globe wrapped in a city-lights
//! texture, a cloud of 1500 backdrop stars and three looping meteor
//! streaks, on a transparent background. Pointer drags orbit the camera
//! around the globe.
//!
//! # Key entry points
//!
//! - [`GlobeEngine`] - the rendering engine (construction, frame step,
//!   render, resize, input)
//! - [`scene::Scene`] - the animated contents (Earth, stars, meteors)
//! - [`options::Options`] - runtime configuration, loadable from TOML
//! - [`Viewer`] - native window host (feature `viewer`)
//! - `web` - browser host mounting on `#globeCanvas` (feature `web`,
//!   wasm32 only)
//!
//! # Architecture
//!
//! The host calls [`GlobeEngine::frame`] once per displayed frame; it steps
//! the scene with [`GlobeEngine::update`] and draws with
//! [`GlobeEngine::render`]. Animation is stepped per frame, so its speed follows
//! the refresh rate. The Earth texture is decoded off the frame loop and
//! bound when it arrives; until then the globe is drawn untextured.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use engine::GlobeEngine;
pub use error::GlobeError;
pub use input::{InputEvent, MouseButton};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
