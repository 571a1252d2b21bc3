//! Simulation settings
//!
//! Tunables that hosts may override from a JSON document. Everything has a
//! sensible default so a partial document is fine.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

/// Default cumulative XP needed to reach level 2, 3, ...
pub const DEFAULT_XP_THRESHOLDS: [u32; 9] = [100, 250, 500, 1000, 2000, 4000, 8000, 16000, 32000];

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Tiles per chunk side
    pub chunk_size: u32,
    /// Tile edge length in world units
    pub tile_size: f32,
    /// Chebyshev radius (in chunks) kept generated around the player
    pub render_distance: u32,
    /// Extra chunks tolerated before eviction
    pub eviction_slack: u32,

    // === Camera ===
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Pacing ===
    /// Seconds per wave
    pub wave_duration: f32,

    // === Progression ===
    /// Ascending cumulative XP thresholds
    pub xp_thresholds: Vec<u32>,
    /// Number of options offered on level up
    pub level_up_choices: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            tile_size: 32.0,
            render_distance: 2,
            eviction_slack: 1,

            viewport_width: 1280.0,
            viewport_height: 720.0,

            wave_duration: 30.0,

            xp_thresholds: DEFAULT_XP_THRESHOLDS.to_vec(),
            level_up_choices: 3,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Half extents of the camera view
    #[inline]
    pub fn half_viewport(&self) -> glam::Vec2 {
        glam::Vec2::new(self.viewport_width, self.viewport_height) * 0.5
    }

    /// Reject tables the engine cannot run with
    fn validate(&self) -> Result<(), serde_json::Error> {
        if self.chunk_size == 0 {
            return Err(serde_json::Error::custom("chunk_size must be positive"));
        }
        if self.tile_size <= 0.0 {
            return Err(serde_json::Error::custom("tile_size must be positive"));
        }
        if self.wave_duration <= 0.0 {
            return Err(serde_json::Error::custom("wave_duration must be positive"));
        }
        if !self.xp_thresholds.windows(2).all(|w| w[0] < w[1]) {
            return Err(serde_json::Error::custom(
                "xp_thresholds must be strictly ascending",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "render_distance": 3 }"#).unwrap();
        assert_eq!(settings.render_distance, 3);
        assert_eq!(settings.chunk_size, 16);
        assert_eq!(settings.xp_thresholds, DEFAULT_XP_THRESHOLDS.to_vec());
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings::default();
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{ not json").is_err());
    }

    #[test]
    fn test_unusable_tables_are_errors() {
        let err = Settings::from_json(r#"{ "xp_thresholds": [100, 50] }"#).unwrap_err();
        assert!(err.to_string().contains("ascending"));
        assert!(Settings::from_json(r#"{ "chunk_size": 0 }"#).is_err());
        assert!(Settings::from_json(r#"{ "tile_size": -1.0 }"#).is_err());
        assert!(Settings::from_json(r#"{ "wave_duration": 0.0 }"#).is_err());
    }
}
