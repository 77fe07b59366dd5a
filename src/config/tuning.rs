use bevy::math::DVec2;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::game::stats::types::Seconds;

/// All tunable simulation parameters, loaded from tuning.ron.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct Tuning {
    /// Simulation ticks per second.
    pub tps: f64,
    pub screen_width: f64,
    pub screen_height: f64,
    pub meteor_interval: Seconds,
    /// Per-tick meteor spin is drawn from [-max, max].
    pub meteor_spin_max: f64,
    /// Ticks an explosion animation stays alive.
    pub explosion_ticks: u32,
    /// Ticks a beam afterimage stays visible.
    pub beam_trace_ticks: u32,
    /// Distance below the screen that "straight" enemies aim for.
    pub exit_margin: f64,
    /// Player start, as a fraction of screen width/height.
    pub player_start: (f64, f64),
    /// Max player turn per tick toward the cursor (radians).
    pub player_turn_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    TickRate(f64),
    ScreenSize { width: f64, height: f64 },
    Negative { field: &'static str },
    PlayerStart((f64, f64)),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TickRate(tps) => write!(f, "tps must be a positive number, got {tps}"),
            Self::ScreenSize { width, height } => {
                write!(f, "screen size must be positive, got {width}x{height}")
            }
            Self::Negative { field } => write!(f, "`{field}` must not be negative"),
            Self::PlayerStart((x, y)) => {
                write!(f, "player_start ({x}, {y}) lies outside the screen")
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tps: 60.0,
            screen_width: 600.0,
            screen_height: 800.0,
            meteor_interval: Seconds(2.0),
            meteor_spin_max: 0.05,
            explosion_ticks: 30,
            beam_trace_ticks: 12,
            exit_margin: 10.0,
            player_start: (0.5, 0.85),
            player_turn_rate: 0.15,
        }
    }
}

impl Tuning {
    /// Get the data directory for tuning and content files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("space_shooter")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("tuning.ron")
    }

    pub fn dt(&self) -> f64 {
        1.0 / self.tps.max(1.0)
    }

    pub fn screen_size(&self) -> DVec2 {
        DVec2::new(self.screen_width, self.screen_height)
    }

    pub fn player_start_position(&self) -> DVec2 {
        DVec2::new(
            self.screen_width * self.player_start.0,
            self.screen_height * self.player_start.1,
        )
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.tps.is_finite() && self.tps > 0.0) {
            return Err(TuningError::TickRate(self.tps));
        }
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(TuningError::ScreenSize {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        let non_negative = [
            ("meteor_interval", self.meteor_interval.0),
            ("meteor_spin_max", self.meteor_spin_max),
            ("exit_margin", self.exit_margin),
            ("player_turn_rate", self.player_turn_rate),
        ];
        if let Some(&(field, _)) = non_negative.iter().find(|(_, v)| v.is_nan() || *v < 0.0) {
            return Err(TuningError::Negative { field });
        }
        let (x, y) = self.player_start;
        if !((0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y)) {
            return Err(TuningError::PlayerStart(self.player_start));
        }
        Ok(())
    }

    /// Parse and validate tuning text. Anything unusable falls back to defaults.
    pub fn from_ron(contents: &str) -> Self {
        let tuning = match ron::from_str::<Tuning>(contents) {
            Ok(tuning) => tuning,
            Err(e) => {
                warn!("Failed to parse tuning.ron: {e}, using defaults");
                return Self::default();
            }
        };
        match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                warn!("Rejected tuning.ron: {e}, using defaults");
                Self::default()
            }
        }
    }

    /// Load from file. A missing file is created with defaults; a broken one
    /// is left in place for the user to fix.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if !path.exists() {
            let tuning = Self::default();
            tuning.save();
            return tuning;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::from_ron(&contents),
            Err(e) => {
                warn!("Failed to read tuning.ron: {e}, using defaults");
                Self::default()
            }
        }
    }

    /// Save current tuning to file.
    pub fn save(&self) {
        let path = Self::file_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    warn!("Failed to write tuning.ron: {e}");
                }
            }
            Err(e) => {
                warn!("Failed to serialize tuning: {e}");
            }
        }
    }

    /// Reload from file (called by key press).
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Tuning reloaded");
    }
}
