//! Game settings and preferences
//!
//! Read once at startup from an optional JSON config block in the host page,
//! optionally overridden by the `?quality=` URL query. Never written back.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

/// Inclusive (min, max) range for one adaptive visual parameter
pub type Bounds = (usize, usize);

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Parallax streak count range
    pub fn streak_bounds(&self) -> Bounds {
        match self {
            QualityPreset::Low => (8, 24),
            QualityPreset::Medium => (16, 60),
            QualityPreset::High => (24, 120),
        }
    }

    /// Orb glow radius range, past the orb body (logical units)
    pub fn orb_glow_bounds(&self) -> Bounds {
        match self {
            QualityPreset::Low => (3, 6),
            QualityPreset::Medium => (4, 10),
            QualityPreset::High => (6, 14),
        }
    }

    /// Enemy glow layer range
    pub fn enemy_glow_bounds(&self) -> Bounds {
        match self {
            QualityPreset::Low => (3, 6),
            QualityPreset::Medium => (4, 10),
            QualityPreset::High => (6, 14),
        }
    }

    /// Trail length multiplier (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Player trail
    pub trails: bool,
    /// Freeze parallax and enemy bob
    pub reduced_motion: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            trails: true,
            reduced_motion: false,
            show_fps: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Parse a JSON config block; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        settings.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Apply a `?quality=` style override; unknown values are ignored
    pub fn apply_quality_override(&mut self, value: &str) {
        match QualityPreset::from_str(value) {
            Some(preset) => {
                log::info!("Quality override: {}", preset.as_str());
                self.quality = preset;
            }
            None => log::warn!("Ignoring unknown quality override '{}'", value),
        }
    }

    /// Effective trail length in points
    pub fn trail_points(&self, full: usize) -> usize {
        if !self.trails {
            0
        } else {
            ((full as f32) * self.quality.trail_quality()).round() as usize
        }
    }

    /// Effective volume for sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Load from the host page (WASM only)
    ///
    /// Reads `<script id="orb-runner-config" type="application/json">` when
    /// present, then applies the `quality` URL query parameter.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };

        let mut settings = window
            .document()
            .and_then(|doc| doc.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content())
            .and_then(|json| match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from page config");
                    Some(settings)
                }
                Err(e) => {
                    log::warn!("Invalid page config, using defaults: {}", e);
                    None
                }
            })
            .unwrap_or_default();

        if let Ok(search) = window.location().search() {
            if let Some(value) = query_param(&search, "quality") {
                settings.apply_quality_override(value);
            }
        }

        settings
    }

    #[cfg(target_arch = "wasm32")]
    const CONFIG_ELEMENT_ID: &'static str = "orb-runner-config";

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

/// Value of `key` in a `?a=1&b=2` query string
pub fn query_param<'a>(search: &'a str, key: &str) -> Option<&'a str> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}
