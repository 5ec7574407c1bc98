//! Adaptive visual quality
//!
//! A feedback controller over measured draw cost. The host times each
//! render and reports it here; the smoothed cost nudges a quality level in
//! [0, 1], which is mapped onto the preset's bounded visual parameters.

use crate::settings::{Bounds, QualityPreset};

/// Smoothing factor for the draw-cost moving average
pub const EMA_ALPHA: f32 = 0.1;
/// Smoothed draw cost above which quality steps down (ms)
pub const HIGH_BUDGET_MS: f32 = 8.0;
/// Smoothed draw cost below which quality steps back up (ms)
pub const LOW_BUDGET_MS: f32 = 4.0;
/// Level change per frame while over budget
pub const STEP_DOWN: f32 = 0.08;
/// Level change per frame while under budget
pub const STEP_UP: f32 = 0.02;

/// Resolved visual parameters handed to the renderer each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualParams {
    /// Number of parallax streaks
    pub streaks: usize,
    /// Orb glow radius past the orb body
    pub orb_glow: usize,
    /// Glow layers behind each enemy
    pub enemy_glow: usize,
}

impl VisualParams {
    /// Parameters at `level` (0 = minimum, 1 = maximum) within a preset's bounds
    pub fn at_level(preset: QualityPreset, level: f32) -> Self {
        let level = level.clamp(0.0, 1.0);
        Self {
            streaks: lerp_bounds(preset.streak_bounds(), level),
            orb_glow: lerp_bounds(preset.orb_glow_bounds(), level),
            enemy_glow: lerp_bounds(preset.enemy_glow_bounds(), level),
        }
    }
}

impl Default for VisualParams {
    fn default() -> Self {
        Self::at_level(QualityPreset::default(), 1.0)
    }
}

fn lerp_bounds((min, max): Bounds, t: f32) -> usize {
    min + ((max - min) as f32 * t).round() as usize
}

/// Draw-cost driven quality controller
#[derive(Debug, Clone)]
pub struct AdaptiveQuality {
    preset: QualityPreset,
    /// Smoothed draw cost (ms); None until the first sample
    avg_ms: Option<f32>,
    level: f32,
}

impl AdaptiveQuality {
    pub fn new(preset: QualityPreset) -> Self {
        Self {
            preset,
            avg_ms: None,
            level: 1.0,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn average_ms(&self) -> Option<f32> {
        self.avg_ms
    }

    /// Feed one measured draw cost
    pub fn record(&mut self, draw_ms: f32) {
        if !draw_ms.is_finite() || draw_ms < 0.0 {
            return;
        }
        let avg = match self.avg_ms {
            Some(avg) => avg + (draw_ms - avg) * EMA_ALPHA,
            None => draw_ms,
        };
        self.avg_ms = Some(avg);

        let prev = self.level;
        if avg > HIGH_BUDGET_MS {
            self.level = (self.level - STEP_DOWN).max(0.0);
        } else if avg < LOW_BUDGET_MS {
            self.level = (self.level + STEP_UP).min(1.0);
        }

        if self.params_at(prev) != self.params() {
            log::debug!(
                "Quality level {:.2} -> {:.2} (avg draw {:.2} ms)",
                prev,
                self.level,
                avg
            );
        }
    }

    /// Current visual parameters
    pub fn params(&self) -> VisualParams {
        self.params_at(self.level)
    }

    fn params_at(&self, level: f32) -> VisualParams {
        VisualParams::at_level(self.preset, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_maximum() {
        let quality = AdaptiveQuality::new(QualityPreset::Medium);
        assert_eq!(quality.level(), 1.0);
        assert_eq!(quality.params().streaks, 60);
        assert_eq!(quality.params().orb_glow, 10);
        assert_eq!(quality.params().enemy_glow, 10);
    }

    #[test]
    fn test_sustained_overload_reaches_minimum() {
        let mut quality = AdaptiveQuality::new(QualityPreset::High);
        for _ in 0..100 {
            quality.record(20.0);
        }
        assert_eq!(quality.level(), 0.0);
        let (min_streaks, _) = QualityPreset::High.streak_bounds();
        assert_eq!(quality.params().streaks, min_streaks);
    }

    #[test]
    fn test_recovers_when_cheap() {
        let mut quality = AdaptiveQuality::new(QualityPreset::Low);
        for _ in 0..50 {
            quality.record(20.0);
        }
        let low = quality.level();
        for _ in 0..200 {
            quality.record(1.0);
        }
        assert!(quality.level() > low);
        assert_eq!(quality.level(), 1.0);
    }

    #[test]
    fn test_holds_inside_budget() {
        let mut quality = AdaptiveQuality::new(QualityPreset::Medium);
        for _ in 0..20 {
            quality.record(20.0);
        }
        assert_eq!(quality.level(), 0.0);
        // Average decays toward 6 ms, between the two budgets: no recovery
        for _ in 0..300 {
            quality.record(6.0);
        }
        assert_eq!(quality.level(), 0.0);
        assert!((quality.average_ms().unwrap() - 6.0).abs() < 0.01);
    }

    #[test]
    fn test_single_spike_is_smoothed() {
        let mut quality = AdaptiveQuality::new(QualityPreset::Medium);
        for _ in 0..30 {
            quality.record(2.0);
        }
        quality.record(30.0);
        // 2 + 28 * 0.1 = 4.8 ms: no change either way
        assert_eq!(quality.level(), 1.0);
    }

    #[test]
    fn test_ignores_bad_samples() {
        let mut quality = AdaptiveQuality::new(QualityPreset::Medium);
        quality.record(f32::NAN);
        quality.record(-1.0);
        assert_eq!(quality.average_ms(), None);
    }

    #[test]
    fn test_params_within_bounds() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            for i in 0..=10 {
                let p = VisualParams::at_level(preset, i as f32 / 10.0);
                let (lo, hi) = preset.orb_glow_bounds();
                assert!(p.orb_glow >= lo && p.orb_glow <= hi);
                let (lo, hi) = preset.streak_bounds();
                assert!(p.streaks >= lo && p.streaks <= hi);
            }
        }
    }
}
