//! Engine configuration and user preferences
//!
//! `EngineConfig` is supplied by the host page per mount. `Settings` are user
//! preferences persisted separately in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_REDIRECT_PATH, DEFAULT_TARGET_GOAL, STAR_COUNT};
use crate::error::ConfigError;

/// What the engine animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    /// Full mini-game: ship, projectiles, targets, bosses
    #[default]
    Game,
    /// Decorative background: stars and shooting stars only
    StarsOnly,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Game => "game",
            GameMode::StarsOnly => "starsOnly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "game" => Some(GameMode::Game),
            "starsonly" | "stars-only" | "stars" => Some(GameMode::StarsOnly),
            _ => None,
        }
    }

    pub fn is_game(&self) -> bool {
        *self == GameMode::Game
    }
}

/// Per-mount engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub mode: GameMode,
    /// Kill count that ends the game; raw value, read through `goal()`
    pub target_goal: f64,
    /// Route requested once the goal is reached
    pub redirect_path: String,
    /// Stars seeded per resize
    pub star_count: usize,
    /// RNG seed; `None` lets the host pick one
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Game,
            target_goal: DEFAULT_TARGET_GOAL,
            redirect_path: DEFAULT_REDIRECT_PATH.to_string(),
            star_count: STAR_COUNT,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Decorative background config
    pub fn stars_only() -> Self {
        Self {
            mode: GameMode::StarsOnly,
            ..Self::default()
        }
    }

    /// Parse from JSON, missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Kill goal, clamped to at least 1
    pub fn goal(&self) -> u32 {
        sanitize_goal(self.target_goal)
    }
}

/// Clamp a raw goal: non-finite or below 1 becomes 1
pub fn sanitize_goal(raw: f64) -> u32 {
    if !raw.is_finite() || raw < 1.0 {
        1
    } else {
        raw.min(u32::MAX as f64).floor() as u32
    }
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// All sound off
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Reduced motion (no parallax, no shooting stars)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Volume actually applied to playback
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "starfield_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_clamping() {
        assert_eq!(sanitize_goal(100.0), 100);
        assert_eq!(sanitize_goal(0.0), 1);
        assert_eq!(sanitize_goal(-5.0), 1);
        assert_eq!(sanitize_goal(f64::NAN), 1);
        assert_eq!(sanitize_goal(f64::INFINITY), 1);
        assert_eq!(sanitize_goal(2.7), 2);
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config = EngineConfig::from_json(r#"{"mode":"starsOnly"}"#).unwrap();
        assert_eq!(config.mode, GameMode::StarsOnly);
        assert_eq!(config.goal(), 100);
        assert_eq!(config.redirect_path, "/guestbook");
        assert_eq!(config.star_count, 300);
    }

    #[test]
    fn test_config_from_json_rejects_garbage() {
        assert!(EngineConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(GameMode::from_str("Game"), Some(GameMode::Game));
        assert_eq!(GameMode::from_str("starsOnly"), Some(GameMode::StarsOnly));
        assert_eq!(GameMode::from_str("arcade"), None);
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
