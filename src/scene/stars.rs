//! Backdrop star cloud.

use std::f32::consts::TAU;

use glam::{Mat4, Vec3};
use rand::Rng;

use crate::options::StarOptions;

/// Static points scattered through a cube around the origin, spun slowly
/// about the Y axis.
#[derive(Debug, Clone)]
pub struct StarField {
    positions: Vec<Vec3>,
    rotation_y: f32,
    rotation_speed: f32,
}

impl StarField {
    /// Scatter `options.count` stars uniformly in a cube of side
    /// `options.spread` centred on the origin.
    #[must_use]
    pub fn new(rng: &mut impl Rng, options: &StarOptions) -> Self {
        let positions = (0..options.count)
            .map(|_| {
                Vec3::new(
                    (rng.random::<f32>() - 0.5) * options.spread,
                    (rng.random::<f32>() - 0.5) * options.spread,
                    (rng.random::<f32>() - 0.5) * options.spread,
                )
            })
            .collect();
        Self {
            positions,
            rotation_y: 0.0,
            rotation_speed: options.rotation_speed,
        }
    }

    /// Rotate by one frame's worth. The angle stays in `[0, 2π)` so the
    /// per-frame step keeps its f32 precision however long the page runs.
    pub fn advance(&mut self) {
        self.rotation_y =
            (self.rotation_y + self.rotation_speed).rem_euclid(TAU);
    }

    /// Object-space star positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Current rotation about Y in radians, in `[0, 2π)`.
    #[must_use]
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Object-to-world transform for the current rotation.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn stars_fill_the_cube() {
        let mut rng = StdRng::seed_from_u64(7);
        let options = StarOptions::default();
        let field = StarField::new(&mut rng, &options);
        assert_eq!(field.positions().len(), 1500);
        let half = options.spread / 2.0;
        for p in field.positions() {
            assert!(p.abs().max_element() <= half);
        }
    }

    #[test]
    fn rotation_accumulates_per_frame() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut field = StarField::new(&mut rng, &StarOptions::default());
        for _ in 0..10 {
            field.advance();
        }
        assert!((field.rotation_y() - 0.004).abs() < 1e-6);
    }

    #[test]
    fn rotation_keeps_turning_after_days_of_frames() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = StarField::new(&mut rng, &StarOptions::default());
        // About 95 hours of frames at 60 Hz, where a raw f32 sum stalls.
        field.rotation_y = 8192.0;
        field.advance();
        let start = field.rotation_y();
        assert!((0.0..TAU).contains(&start));
        let before = field.model_matrix();
        field.advance();
        assert!((field.rotation_y() - start - 0.0004).abs() < 1e-5);
        assert_ne!(field.model_matrix(), before);
    }

    #[test]
    fn rotation_wraps_at_full_turn() {
        let mut rng = StdRng::seed_from_u64(4);
        let options = StarOptions {
            rotation_speed: 1.0,
            ..StarOptions::default()
        };
        let mut field = StarField::new(&mut rng, &options);
        for _ in 0..7 {
            field.advance();
        }
        assert!((field.rotation_y() - (7.0 - TAU)).abs() < 1e-5);
    }

    #[test]
    fn positions_are_static() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut field = StarField::new(&mut rng, &StarOptions::default());
        let before = field.positions().to_vec();
        field.advance();
        assert_eq!(field.positions(), before.as_slice());
    }

    #[test]
    fn model_matrix_spins_about_y() {
        let mut rng = StdRng::seed_from_u64(5);
        let options = StarOptions {
            rotation_speed: std::f32::consts::FRAC_PI_2,
            ..StarOptions::default()
        };
        let mut field = StarField::new(&mut rng, &options);
        field.advance();
        let p = field.model_matrix().transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }
}
