//! Scene contents: the globe, the star field and the meteor shower.
//!
//! Everything here is plain CPU-side data. The engine owns one [`Scene`]
//! for its whole lifetime and advances it once per displayed frame; the
//! renderers read from it when uploading GPU state.

mod earth;
mod meteor;
mod stars;

pub use earth::{Earth, EarthVertex, SphereMesh};
pub use meteor::{Meteor, MeteorShower};
use rand::Rng;
pub use stars::StarField;

use crate::options::Options;

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// Root of everything drawn.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Textured globe at the origin.
    pub earth: Earth,
    /// Rotating backdrop stars.
    pub stars: StarField,
    /// Looping meteor streaks.
    pub meteors: MeteorShower,
}

impl Scene {
    /// Build the scene from options, drawing star positions and initial
    /// meteors from `rng`.
    #[must_use]
    pub fn new(rng: &mut impl Rng, options: &Options) -> Self {
        Self {
            earth: Earth::new(&options.earth),
            stars: StarField::new(rng, &options.stars),
            meteors: MeteorShower::new(rng, options.meteors.clone()),
        }
    }

    /// One frame of animation: spin the stars, then move the meteors.
    /// Returns how many meteors respawned.
    pub fn advance(&mut self, rng: &mut impl Rng) -> usize {
        self.stars.advance();
        self.meteors.step(rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn stock_scene_population() {
        let mut rng = StdRng::seed_from_u64(11);
        let scene = Scene::new(&mut rng, &Options::default());
        assert_eq!(scene.stars.positions().len(), 1500);
        assert_eq!(scene.meteors.meteors().len(), 3);
        assert_eq!(scene.earth.radius, 1.0);
    }

    #[test]
    fn advance_moves_stars_and_meteors() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut scene = Scene::new(&mut rng, &Options::default());
        let before = scene.meteors.meteors()[0];
        let _ = scene.advance(&mut rng);
        assert!((scene.stars.rotation_y() - 0.0004).abs() < 1e-9);
        let after = scene.meteors.meteors()[0];
        assert_eq!(after.position, before.position + before.velocity);
    }
}
