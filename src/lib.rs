//! Starfish Collector - a turtle gathers starfish in a rocky ocean
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, polygon collisions, game state)
//! - `host`: Ports the embedding application implements (input, frame drawing)
//! - `settings`: Data-driven tuning loaded from JSON

pub mod host;
pub mod settings;
pub mod sim;

pub use settings::{Settings, TurtleTuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World (ocean) dimensions
    pub const WORLD_WIDTH: f32 = 1200.0;
    pub const WORLD_HEIGHT: f32 = 900.0;

    /// Window/camera viewport
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Max speed of a freshly created actor (pixels/s)
    pub const DEFAULT_MAX_SPEED: f32 = 1000.0;

    /// Turtle tuning: reaches max speed in 0.25s from rest
    pub const TURTLE_ACCELERATION: f32 = 400.0;
    pub const TURTLE_MAX_SPEED: f32 = 100.0;
    pub const TURTLE_DECELERATION: f32 = 400.0;

    /// Sides of the ellipse-inscribed boundary used by moving and solid objects
    pub const BOUNDARY_SIDES: usize = 8;

    /// Starfish idle spin (degrees/s)
    pub const STARFISH_SPIN: f32 = 30.0;
    /// Starfish fade-out after collection (seconds)
    pub const STARFISH_FADE_SECS: f32 = 1.0;

    /// Whirlpool sprite sheet layout and playback
    pub const WHIRLPOOL_ROWS: u32 = 2;
    pub const WHIRLPOOL_COLS: u32 = 5;
    pub const WHIRLPOOL_FRAME_SECS: f32 = 0.1;
    pub const WHIRLPOOL_OPACITY: f32 = 0.25;

    /// Turtle swim cycle
    pub const TURTLE_FRAMES: u32 = 6;
    pub const TURTLE_FRAME_SECS: f32 = 0.1;

    /// "You win" banner: delay, then fade in
    pub const WIN_BANNER_DELAY_SECS: f32 = 1.0;
    pub const WIN_BANNER_FADE_SECS: f32 = 1.0;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negatives
    if a >= 360.0 { 0.0 } else { a }
}

/// Build a vector of the given length pointing at `degrees`
#[inline]
pub fn from_angle_degrees(length: f32, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(length * cos, length * sin)
}

/// Direction of a vector in degrees, in [0, 360). Zero vector reports 0.
#[inline]
pub fn angle_degrees(v: Vec2) -> f32 {
    normalize_degrees(v.y.atan2(v.x).to_degrees())
}

/// Rescale a vector to `length`, keeping its direction.
///
/// A zero vector has no direction and stays zero.
#[inline]
pub fn with_length(v: Vec2, length: f32) -> Vec2 {
    let len = v.length();
    if len == 0.0 { v } else { v * (length / len) }
}

/// Rotate a vector to point at `degrees`, keeping its length
#[inline]
pub fn with_angle_degrees(v: Vec2, degrees: f32) -> Vec2 {
    from_angle_degrees(v.length(), degrees)
}
