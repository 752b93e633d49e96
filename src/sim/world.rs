//! World bounds and the following camera

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::consts::*;

/// Size of the playable world, fixed once a level starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
        }
    }
}

impl WorldConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Bottom-left corner that keeps a `size` box fully inside the world.
    /// An object larger than the world ends up flush with the right/top edge.
    pub fn clamp_position(&self, position: Vec2, size: Vec2) -> Vec2 {
        let mut p = position;
        if p.x < 0.0 {
            p.x = 0.0;
        }
        if p.x + size.x > self.width {
            p.x = self.width - size.x;
        }
        if p.y < 0.0 {
            p.y = 0.0;
        }
        if p.y + size.y > self.height {
            p.y = self.height - size.y;
        }
        p
    }
}

/// Camera looking at the world through a fixed-size viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Centre of the view
    pub position: Vec2,
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        let viewport = Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
        Self {
            position: viewport / 2.0,
            viewport,
        }
    }
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            position: viewport / 2.0,
            viewport,
        }
    }

    /// Centre on `target` without showing anything outside the world
    pub fn focus(&mut self, target: Vec2, world: &WorldConfig) {
        let half = self.viewport / 2.0;
        self.position = Vec2::new(
            clamp_lenient(target.x, half.x, world.width - half.x),
            clamp_lenient(target.y, half.y, world.height - half.y),
        );
    }

    /// Visible region
    pub fn view(&self) -> Aabb {
        let min = self.position - self.viewport / 2.0;
        Aabb::new(min.x, min.y, self.viewport.x, self.viewport.y)
    }
}

/// Clamp that checks the lower bound first and tolerates `min > max`
/// (a world smaller than the viewport pins the camera to `min`).
#[inline]
fn clamp_lenient(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
