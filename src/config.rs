//! Engine configuration
//!
//! The host page passes a partial options object; every missing field falls
//! back to its default. The result is immutable for the engine's lifetime.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::Result;
use crate::input::{Action, KeyMap};
use crate::render::{Palette, colors};

/// Visual theme tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Neon,
    Amber,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Classic => "classic",
            Theme::Neon => "neon",
            Theme::Amber => "amber",
        }
    }

    /// Colors every game draws with
    pub fn palette(&self) -> Palette {
        match self {
            Theme::Classic => Palette {
                background: colors::BLACK,
                foreground: colors::WHITE,
                accent: [0.2, 0.8, 0.4, 1.0],
                hazard: [1.0, 0.3, 0.2, 1.0],
                pickup: [1.0, 0.85, 0.3, 1.0],
                text: colors::WHITE,
            },
            Theme::Neon => Palette {
                background: [0.02, 0.02, 0.08, 1.0],
                foreground: [0.3, 0.9, 1.0, 1.0],
                accent: [1.0, 0.2, 0.8, 1.0],
                hazard: [1.0, 0.9, 0.1, 1.0],
                pickup: [0.4, 1.0, 0.4, 1.0],
                text: [0.9, 0.9, 1.0, 1.0],
            },
            Theme::Amber => Palette {
                background: [0.06, 0.03, 0.0, 1.0],
                foreground: [1.0, 0.7, 0.1, 1.0],
                accent: [1.0, 0.55, 0.0, 1.0],
                hazard: [1.0, 0.3, 0.1, 1.0],
                pickup: [1.0, 0.9, 0.5, 1.0],
                text: [1.0, 0.75, 0.2, 1.0],
            },
        }
    }
}

/// Engine options (camelCase on the wire, matching the host page's object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Attach keyboard listeners
    pub use_keyboard: bool,
    /// Attach touch listeners (and draw on-screen hints)
    pub use_mobile: bool,
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    pub theme: Theme,
    /// Logical action → physical key remapping
    pub keys: BTreeMap<Action, String>,
    /// RNG seed for game randomness (entropy when absent)
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_keyboard: true,
            use_mobile: false,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            theme: Theme::Classic,
            keys: BTreeMap::new(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Merge a partial JSON options object over the defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!(
            "Config: {}x{}, theme={}, keyboard={}, mobile={}",
            config.width,
            config.height,
            config.theme.as_str(),
            config.use_keyboard,
            config.use_mobile
        );
        Ok(config)
    }

    /// A surface needs at least one pixel on each axis
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(serde_json::Error::custom(format!(
                "surface must be at least 1x1, got {}x{}",
                self.width, self.height
            ))
            .into());
        }
        Ok(())
    }

    /// Key map with this config's remapping applied
    pub fn key_map(&self) -> KeyMap {
        KeyMap::with_overrides(&self.keys)
    }

    /// Seed to hand a game's RNG
    pub fn seed_or_entropy(&self) -> u64 {
        self.seed.unwrap_or_else(crate::entropy_seed)
    }

    /// Surface size in pixels, never smaller than 1x1
    pub fn size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width.max(1) as f32, self.height.max(1) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.use_keyboard);
        assert!(!config.use_mobile);
        assert_eq!((config.width, config.height), (400, 300));
        assert_eq!(config.theme, Theme::Classic);
        assert!(config.keys.is_empty());
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let config =
            EngineConfig::from_json(r#"{"useMobile": true, "width": 640, "keys": {"FIRE": "x"}}"#)
                .unwrap();
        assert!(config.use_keyboard);
        assert!(config.use_mobile);
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 300);

        let keys = config.key_map();
        assert_eq!(keys.key(Action::Fire), "x");
        assert_eq!(keys.key(Action::Start), "Enter");
    }

    #[test]
    fn test_empty_object_is_all_defaults() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_theme_by_name() {
        let config = EngineConfig::from_json(r#"{"theme": "neon"}"#).unwrap();
        assert_eq!(config.theme, Theme::Neon);
        assert!(EngineConfig::from_json(r#"{"theme": "vaporwave"}"#).is_err());
    }

    #[test]
    fn test_zero_sized_surface_is_rejected() {
        let err = EngineConfig::from_json(r#"{"width": 0, "height": 0}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
        assert!(err.to_string().contains("0x0"));
        assert!(EngineConfig::from_json(r#"{"height": 0}"#).is_err());
        assert!(EngineConfig::from_json(r#"{"width": 1, "height": 1}"#).is_ok());
    }

    #[test]
    fn test_size_is_at_least_one_pixel() {
        let config = EngineConfig {
            width: 0,
            height: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.size(), glam::Vec2::ONE);
    }

    #[test]
    fn test_unknown_action_in_keys_is_rejected() {
        assert!(EngineConfig::from_json(r#"{"keys": {"JUMP": "j"}}"#).is_err());
    }
}
