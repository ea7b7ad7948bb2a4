//! Tracking configuration resource.
//!
//! Tunables for movement classification, animation playback and event
//! dispatch, loaded from an INI file. Every key is optional; missing keys keep
//! their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [movement]
//! hysteresis_band = 1.0
//! dead_reckoning = false
//!
//! [animation]
//! min_frame_interval = 1
//!
//! [dispatch]
//! warn_missing_handlers = false
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::tracking::classifier::DEFAULT_HYSTERESIS_BAND;
use crate::tracking::player::DEFAULT_MIN_FRAME_INTERVAL;

const DEFAULT_DEAD_RECKONING: bool = false;
const DEFAULT_WARN_MISSING_HANDLERS: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./tracking.ini";

/// Tracking configuration resource.
///
/// Copied into every new [`Session`](crate::resources::session::Session) when a
/// scene is pushed; changing it does not affect sessions already running.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    /// Width of the tie band in which the previous heading is kept.
    pub hysteresis_band: f32,
    /// Classify the position delta when velocity is zero.
    pub dead_reckoning: bool,
    /// Smallest accepted frame interval, in milliseconds.
    pub min_frame_interval: f32,
    /// Log missing handlers at `warn` instead of `debug`.
    pub warn_missing_handlers: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            hysteresis_band: DEFAULT_HYSTERESIS_BAND,
            dead_reckoning: DEFAULT_DEAD_RECKONING,
            min_frame_interval: DEFAULT_MIN_FRAME_INTERVAL,
            warn_missing_handlers: DEFAULT_WARN_MISSING_HANDLERS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [movement] section
        if let Some(band) = config.getfloat("movement", "hysteresis_band").ok().flatten() {
            self.hysteresis_band = (band as f32).abs();
        }
        if let Some(enabled) = config.getbool("movement", "dead_reckoning").ok().flatten() {
            self.dead_reckoning = enabled;
        }

        // [animation] section
        if let Some(min) = config
            .getfloat("animation", "min_frame_interval")
            .ok()
            .flatten()
        {
            if min > 0.0 {
                self.min_frame_interval = min as f32;
            }
        }

        // [dispatch] section
        if let Some(warn) = config
            .getbool("dispatch", "warn_missing_handlers")
            .ok()
            .flatten()
        {
            self.warn_missing_handlers = warn;
        }

        info!(
            "Loaded tracking config: band={}, dead_reckoning={}, min_frame_interval={}ms, warn_missing_handlers={}",
            self.hysteresis_band,
            self.dead_reckoning,
            self.min_frame_interval,
            self.warn_missing_handlers
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set(
            "movement",
            "hysteresis_band",
            Some(self.hysteresis_band.to_string()),
        );
        config.set(
            "movement",
            "dead_reckoning",
            Some(self.dead_reckoning.to_string()),
        );
        config.set(
            "animation",
            "min_frame_interval",
            Some(self.min_frame_interval.to_string()),
        );
        config.set(
            "dispatch",
            "warn_missing_handlers",
            Some(self.warn_missing_handlers.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved tracking config to {:?}", self.config_path);

        Ok(())
    }
}
