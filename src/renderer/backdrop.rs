//! Parallax backdrop
//!
//! A fixed, seeded set of streaks. Quality decides how many are drawn; the
//! layout itself never changes during a session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Enough streaks for the highest quality preset
pub const MAX_STREAKS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Streak {
    /// Normalized position in the view (0..1)
    pub x: f32,
    pub y: f32,
    /// Length in logical units
    pub len: f32,
    /// Fraction of camera motion the streak follows
    pub depth: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct Backdrop {
    streaks: Vec<Streak>,
}

impl Backdrop {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let streaks = (0..MAX_STREAKS)
            .map(|_| Streak {
                x: rng.random_range(0.0..1.0),
                y: rng.random_range(0.0..0.85),
                len: rng.random_range(24.0..96.0),
                depth: rng.random_range(0.1..0.5),
                alpha: rng.random_range(0.2..1.0),
            })
            .collect();
        Self { streaks }
    }

    pub fn streaks(&self) -> &[Streak] {
        &self.streaks
    }

    /// Screen-space segment (start, length) for the first `count` streaks
    ///
    /// Streaks scroll against the camera at their depth and wrap around the
    /// view horizontally.
    pub fn layout(
        &self,
        count: usize,
        camera: Vec2,
        view: Vec2,
    ) -> impl Iterator<Item = (Vec2, &Streak)> + '_ {
        self.streaks.iter().take(count).map(move |s| {
            let span = view.x + s.len;
            let x = (s.x * span - camera.x * s.depth).rem_euclid(span) - s.len;
            let y = s.y * view.y - camera.y * s.depth * 0.25;
            (Vec2::new(x, y), s)
        })
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new(0x5EED)
    }
}
