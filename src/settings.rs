//! Game settings and tuning
//!
//! Everything here is plain data with serde defaults, so a partial JSON file
//! only overrides the fields it names.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::motion::MotionState;
use crate::sim::state::{LevelLayout, SpriteCatalog};
use crate::sim::world::WorldConfig;

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Size of the ocean
    pub world: WorldConfig,
    /// Camera viewport (window size)
    pub viewport: Vec2,

    // === Turtle ===
    /// Acceleration, deceleration and max speed of the player
    pub turtle: TurtleTuning,

    // === Collision ===
    /// Sides of the boundary polygon for turtle, starfish and rocks
    pub boundary_sides: usize,

    // === Effects ===
    /// Idle starfish spin (degrees/s)
    pub starfish_spin: f32,
    /// Fade-out after collection (seconds)
    pub starfish_fade_secs: f32,
    /// Delay before the win banner starts fading in (seconds)
    pub win_banner_delay: f32,
    /// Win banner fade-in (seconds)
    pub win_banner_fade: f32,

    // === Content ===
    pub sprites: SpriteCatalog,
    /// Custom layout; the classic level when absent
    pub level: Option<LevelLayout>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),

            turtle: TurtleTuning::default(),

            boundary_sides: BOUNDARY_SIDES,

            starfish_spin: STARFISH_SPIN,
            starfish_fade_secs: STARFISH_FADE_SECS,
            win_banner_delay: WIN_BANNER_DELAY_SECS,
            win_banner_fade: WIN_BANNER_FADE_SECS,

            sprites: SpriteCatalog::default(),
            level: None,
        }
    }
}

/// Player movement tuning (pixels/s and pixels/s²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleTuning {
    pub acceleration: f32,
    pub max_speed: f32,
    pub deceleration: f32,
}

impl Default for TurtleTuning {
    fn default() -> Self {
        Self {
            acceleration: TURTLE_ACCELERATION,
            max_speed: TURTLE_MAX_SPEED,
            deceleration: TURTLE_DECELERATION,
        }
    }
}

impl TurtleTuning {
    /// Fresh motion state at rest with this tuning
    pub fn motion(&self) -> MotionState {
        MotionState::new(self.acceleration, self.max_speed, self.deceleration)
    }
}

impl Settings {
    /// Parse settings; out-of-range values are replaced by their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Replace values the simulation cannot run with (logged)
    pub fn sanitized(mut self) -> Self {
        self.boundary_sides = checked_boundary_sides(self.boundary_sides);
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Could not read settings {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

/// Boundary polygons need at least 3 sides; fewer falls back to the default
pub(crate) fn checked_boundary_sides(sides: usize) -> usize {
    if sides < 3 {
        log::warn!("boundary_sides {} is below 3, using {}", sides, BOUNDARY_SIDES);
        BOUNDARY_SIDES
    } else {
        sides
    }
}
