//! Player preferences
//!
//! Presentation only; nothing here reaches the simulation.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (freezes the lava texture loop)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether animated textures should flip frames
    pub fn effective_texture_animation(&self) -> bool {
        !self.reduced_motion
    }

    /// Combined cue volume
    pub fn effective_volume(&self) -> f32 {
        self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "reduced_motion": true }"#).unwrap();
        assert!(settings.reduced_motion);
        assert!(!settings.effective_texture_animation());
        assert_eq!(settings.master_volume, Settings::default().master_volume);
    }

    #[test]
    fn test_effective_volume_is_clamped() {
        let settings = Settings {
            master_volume: 2.0,
            sfx_volume: 0.5,
            ..Default::default()
        };
        assert!((settings.effective_volume() - 0.5).abs() < 1e-6);
    }
}
