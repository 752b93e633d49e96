//! Velocity/acceleration integration
//!
//! Acceleration requests accumulate during a tick and are consumed by
//! [`MotionState::apply_physics`]; an object that stops requesting
//! acceleration coasts down at its deceleration rate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_MAX_SPEED;
use crate::{angle_degrees, from_angle_degrees, with_angle_degrees, with_length};

/// Result of one integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsStep {
    pub velocity: Vec2,
    /// How far the owner should move this tick
    pub displacement: Vec2,
}

/// Motion data owned by a single actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub velocity: Vec2,
    /// Requests made this tick, cleared by `apply_physics`
    pub accumulated: Vec2,
    /// Magnitude added by each `accelerate_at_angle` call (pixels/s²)
    pub acceleration: f32,
    /// Applied only on ticks with no acceleration request (pixels/s²)
    pub deceleration: f32,
    /// pixels/s
    pub max_speed: f32,
}

impl Default for MotionState {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            accumulated: Vec2::ZERO,
            acceleration: 0.0,
            deceleration: 0.0,
            max_speed: DEFAULT_MAX_SPEED,
        }
    }
}

impl MotionState {
    pub fn new(acceleration: f32, max_speed: f32, deceleration: f32) -> Self {
        Self {
            acceleration,
            max_speed,
            deceleration,
            ..Default::default()
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Set speed along the current direction. With no current direction the
    /// motion angle becomes 0 degrees.
    pub fn set_speed(&mut self, speed: f32) {
        if self.velocity == Vec2::ZERO {
            self.velocity = Vec2::new(speed, 0.0);
        } else {
            self.velocity = with_length(self.velocity, speed);
        }
    }

    pub fn is_moving(&self) -> bool {
        self.speed() > 0.0
    }

    /// Motion angle in degrees. Has no effect while stationary.
    pub fn set_motion_angle(&mut self, degrees: f32) {
        self.velocity = with_angle_degrees(self.velocity, degrees);
    }

    pub fn motion_angle(&self) -> f32 {
        angle_degrees(self.velocity)
    }

    /// Queue `acceleration` worth of thrust toward `degrees`. Calls within one
    /// tick add up, so two perpendicular requests give sqrt(2) times the thrust.
    pub fn accelerate_at_angle(&mut self, degrees: f32) {
        self.accumulated += from_angle_degrees(self.acceleration, degrees);
    }

    /// Advance by `dt` seconds: apply queued acceleration (or deceleration when
    /// none was queued), clamp speed to `[0, max_speed]`, and clear the queue.
    pub fn apply_physics(&mut self, dt: f32) -> PhysicsStep {
        self.velocity += self.accumulated * dt;

        let mut speed = self.speed();
        if self.accumulated == Vec2::ZERO {
            speed -= self.deceleration * dt;
        }
        // max first so a negative max_speed can't panic in clamp
        let speed = speed.max(0.0).min(self.max_speed.max(0.0));
        self.set_speed(speed);

        self.accumulated = Vec2::ZERO;

        PhysicsStep {
            velocity: self.velocity,
            displacement: self.velocity * dt,
        }
    }
}
