//! Player preferences
//!
//! Persisted separately from the best score in LocalStorage.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off (the in-game toggle)
    pub sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Feedback ===
    /// Vibration on supported devices
    pub haptics: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, flashes or confetti)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            haptics: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        !self.reduced_motion
    }

    /// Effective flashes (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        !self.reduced_motion
    }

    /// Effective confetti (respects reduced_motion)
    pub fn effective_confetti(&self) -> bool {
        !self.reduced_motion
    }

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.sound {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "deep_dive_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
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
            match serde_json::to_string(self) {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("Failed to save settings");
                    } else {
                        log::info!("Settings saved");
                    }
                }
                Err(e) => log::warn!("Failed to encode settings: {}", e),
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
