//! Shooting-star streaks.
//!
//! Each meteor flies in a straight line at constant velocity while fading
//! out. As soon as it drops below the floor or fades away it is respawned
//! at a fresh random spot, so the shower loops forever with a fixed set of
//! meteors.

use glam::Vec3;
use rand::Rng;

use crate::options::MeteorOptions;

/// Uniform sample in `[min, max)` per component.
fn sample_range(rng: &mut impl Rng, min: [f32; 3], max: [f32; 3]) -> Vec3 {
    let min = Vec3::from_array(min);
    let max = Vec3::from_array(max);
    let r = Vec3::new(rng.random(), rng.random(), rng.random());
    min + r * (max - min)
}

/// One streak's simulation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Meteor {
    /// World position of the streak's tail.
    pub position: Vec3,
    /// Displacement per frame.
    pub velocity: Vec3,
    /// Current opacity. Not clamped; may dip below zero on the frame it
    /// resets.
    pub opacity: f32,
}

impl Meteor {
    /// A freshly spawned meteor.
    #[must_use]
    pub fn spawn(rng: &mut impl Rng, options: &MeteorOptions) -> Self {
        let mut meteor = Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            opacity: 1.0,
        };
        meteor.respawn(rng, options);
        meteor
    }

    /// Draw a new position and velocity from the spawn ranges and restore
    /// full opacity.
    pub fn respawn(&mut self, rng: &mut impl Rng, options: &MeteorOptions) {
        self.position =
            sample_range(rng, options.spawn_min, options.spawn_max);
        self.velocity =
            sample_range(rng, options.velocity_min, options.velocity_max);
        self.opacity = 1.0;
    }

    /// Whether the meteor has left the sky.
    #[must_use]
    pub fn is_spent(&self, options: &MeteorOptions) -> bool {
        self.position.y < options.floor_y || self.opacity <= 0.0
    }

    /// Advance one frame. Returns true if the meteor was respawned.
    pub fn step(&mut self, rng: &mut impl Rng, options: &MeteorOptions) -> bool {
        self.position += self.velocity;
        self.opacity -= options.fade_per_frame;
        if self.is_spent(options) {
            self.respawn(rng, options);
            true
        } else {
            false
        }
    }
}

/// The fixed set of meteors and their shared settings.
#[derive(Debug, Clone)]
pub struct MeteorShower {
    meteors: Vec<Meteor>,
    options: MeteorOptions,
}

impl MeteorShower {
    /// Spawn `options.count` meteors.
    #[must_use]
    pub fn new(rng: &mut impl Rng, options: MeteorOptions) -> Self {
        let meteors = (0..options.count)
            .map(|_| Meteor::spawn(rng, &options))
            .collect();
        Self { meteors, options }
    }

    /// Advance every meteor one frame. Returns how many were respawned.
    pub fn step(&mut self, rng: &mut impl Rng) -> usize {
        let options = &self.options;
        self.meteors
            .iter_mut()
            .map(|m| m.step(rng, options))
            .filter(|&reset| reset)
            .count()
    }

    /// Current meteor states.
    #[must_use]
    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    /// Mutable access for hosts that script meteors directly.
    pub fn meteors_mut(&mut self) -> &mut [Meteor] {
        &mut self.meteors
    }

    /// Shared settings.
    #[must_use]
    pub fn options(&self) -> &MeteorOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    fn in_range(v: Vec3, min: [f32; 3], max: [f32; 3]) -> bool {
        let (min, max) = (Vec3::from_array(min), Vec3::from_array(max));
        v.cmpge(min).all() && v.cmple(max).all()
    }

    fn assert_fresh(m: &Meteor, options: &MeteorOptions) {
        assert!(in_range(m.position, options.spawn_min, options.spawn_max));
        assert!(in_range(
            m.velocity,
            options.velocity_min,
            options.velocity_max
        ));
        assert_eq!(m.opacity, 1.0);
    }

    #[test]
    fn spawn_is_within_ranges() {
        let mut rng = rng();
        let options = MeteorOptions::default();
        for _ in 0..500 {
            let m = Meteor::spawn(&mut rng, &options);
            assert_fresh(&m, &options);
        }
    }

    #[test]
    fn step_moves_by_velocity_exactly() {
        let mut rng = rng();
        let options = MeteorOptions::default();
        let mut m = Meteor {
            position: Vec3::new(-6.0, 5.0, -3.0),
            velocity: Vec3::new(0.2, -0.23, 0.06),
            opacity: 1.0,
        };
        let before = m;
        assert!(!m.step(&mut rng, &options));
        assert_eq!(m.position, before.position + before.velocity);
        assert_eq!(m.opacity, before.opacity - 0.015);
    }

    #[test]
    fn fading_out_resets() {
        let mut rng = rng();
        let options = MeteorOptions::default();
        let mut m = Meteor {
            position: Vec3::new(-6.0, 5.0, -3.0),
            velocity: Vec3::new(0.2, -0.23, 0.06),
            opacity: 0.01,
        };
        assert!(m.step(&mut rng, &options));
        assert_fresh(&m, &options);
    }

    #[test]
    fn opacity_exactly_zero_resets() {
        let mut rng = rng();
        let options = MeteorOptions {
            fade_per_frame: 0.5,
            ..MeteorOptions::default()
        };
        let mut m = Meteor {
            position: Vec3::new(-6.0, 5.0, -3.0),
            velocity: Vec3::ZERO,
            opacity: 1.0,
        };
        assert!(!m.step(&mut rng, &options));
        assert_eq!(m.opacity, 0.5);
        assert!(m.step(&mut rng, &options));
        assert_eq!(m.opacity, 1.0);
    }

    #[test]
    fn falling_below_floor_resets() {
        let mut rng = rng();
        let options = MeteorOptions::default();
        let mut m = Meteor {
            position: Vec3::new(0.0, -4.9, 0.0),
            velocity: Vec3::new(0.2, -0.23, 0.06),
            opacity: 0.9,
        };
        assert!(m.step(&mut rng, &options));
        assert_fresh(&m, &options);
    }

    #[test]
    fn floor_itself_does_not_reset() {
        let mut rng = rng();
        let options = MeteorOptions::default();
        let mut m = Meteor {
            position: Vec3::new(0.0, -4.0, 0.0),
            velocity: Vec3::new(0.0, -1.0, 0.0),
            opacity: 0.9,
        };
        assert!(!m.step(&mut rng, &options));
        assert_eq!(m.position.y, -5.0);
    }

    #[test]
    fn reset_iff_spent_after_step() {
        let mut rng = rng();
        let options = MeteorOptions::default();
        let mut shower = MeteorShower::new(&mut rng, options.clone());
        for _ in 0..2000 {
            let before = shower.meteors().to_vec();
            let _ = shower.step(&mut rng);
            for (prev, now) in before.iter().zip(shower.meteors()) {
                let stepped = Meteor {
                    position: prev.position + prev.velocity,
                    velocity: prev.velocity,
                    opacity: prev.opacity - options.fade_per_frame,
                };
                if stepped.is_spent(&options) {
                    assert_fresh(now, &options);
                } else {
                    assert_eq!(*now, stepped);
                }
            }
        }
    }

    #[test]
    fn falling_meteor_loops_back_into_the_sky() {
        let mut rng = rng();
        let options = MeteorOptions::default();
        let mut m = Meteor {
            position: Vec3::new(-6.0, 4.0, -3.0),
            velocity: Vec3::new(0.2, -0.23, 0.06),
            opacity: 1.0,
        };
        let reset_at = (1..=40).find(|_| m.step(&mut rng, &options));
        assert!(reset_at.is_some_and(|n| n <= 40));
        assert!((4.0..=6.0).contains(&m.position.y));
        assert_eq!(m.opacity, 1.0);
    }

    #[test]
    fn shower_keeps_its_size() {
        let mut rng = rng();
        let mut shower = MeteorShower::new(&mut rng, MeteorOptions::default());
        assert_eq!(shower.meteors().len(), 3);
        let resets: usize = (0..200).map(|_| shower.step(&mut rng)).sum();
        // Opacity alone forces a respawn every 67 frames.
        assert!(resets >= 6);
        assert_eq!(shower.meteors().len(), 3);
    }
}
