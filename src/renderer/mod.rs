//! Rendering subsystems for the globe scene.
//!
//! One renderer per scene object (Earth, stars, meteors), all sharing the
//! camera bind group, the color/depth targets and the pipeline state in
//! [`pipeline_util`].

pub mod earth;
pub mod meteor;
pub mod pipeline_util;
pub mod stars;

pub use earth::EarthRenderer;
pub use meteor::MeteorRenderer;
pub use stars::StarRenderer;
