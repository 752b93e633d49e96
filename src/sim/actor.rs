//! Game object core: placement, motion, boundary polygon and animation clock
//!
//! An `Actor` is plain data. Scene membership and drawing belong to the
//! owner ([`super::state::GameState`] and the host's frame sink).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{Animation, AnimationPlayer};
use super::collision::{self, Mtv};
use super::motion::{MotionState, PhysicsStep};
use super::polygon::{Polygon, Transform};
use super::world::{Camera, WorldConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Bottom-left corner
    pub position: Vec2,
    pub size: Vec2,
    /// Rotation/scale pivot relative to `position`
    pub origin: Vec2,
    /// Degrees
    pub rotation: f32,
    pub scale: Vec2,
    /// 0 transparent .. 1 opaque
    pub opacity: f32,
    pub visible: bool,
    pub motion: MotionState,
    boundary: Option<Polygon>,
    animation: Option<AnimationPlayer>,
}

impl Actor {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::ZERO,
            origin: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            opacity: 1.0,
            visible: true,
            motion: MotionState::default(),
            boundary: None,
            animation: None,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            origin: self.origin,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size / 2.0
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    pub fn center_at_position(&mut self, center: Vec2) {
        self.position = center - self.size / 2.0;
    }

    pub fn center_at_actor(&mut self, other: &Actor) {
        self.center_at_position(other.center());
    }

    // --- animation ---

    /// Install `animation`: the actor takes the frame size, pivots on its
    /// centre, and gets a rectangular boundary unless one was already set.
    pub fn set_animation(&mut self, animation: Animation) {
        let size = animation.frame_size();
        self.size = size;
        self.origin = size / 2.0;
        self.animation = Some(AnimationPlayer::new(animation));
        if self.boundary.is_none() {
            self.set_boundary_rectangle();
        }
    }

    pub fn animation(&self) -> Option<&AnimationPlayer> {
        self.animation.as_ref()
    }

    pub fn set_animation_paused(&mut self, paused: bool) {
        if let Some(player) = self.animation.as_mut() {
            player.paused = paused;
        }
    }

    /// One-shot animations report finished once past their last frame;
    /// an actor without animation never finishes.
    pub fn is_animation_finished(&self) -> bool {
        self.animation.as_ref().is_some_and(AnimationPlayer::is_finished)
    }

    /// Per-tick housekeeping: advance the animation clock
    pub fn act(&mut self, dt: f32) {
        if let Some(player) = self.animation.as_mut() {
            player.advance(dt);
        }
    }

    // --- motion ---

    pub fn accelerate_at_angle(&mut self, degrees: f32) {
        self.motion.accelerate_at_angle(degrees);
    }

    /// Accelerate the way the actor is facing
    pub fn accelerate_forward(&mut self) {
        self.motion.accelerate_at_angle(self.rotation);
    }

    /// Integrate motion and move by the resulting displacement
    pub fn apply_physics(&mut self, dt: f32) -> PhysicsStep {
        let step = self.motion.apply_physics(dt);
        self.move_by(step.displacement);
        step
    }

    // --- boundary ---

    pub fn set_boundary_rectangle(&mut self) {
        self.boundary = Some(Polygon::rectangle(self.size.x, self.size.y));
    }

    /// Replace the boundary with a `num_sides`-gon inscribed in the actor's
    /// ellipse. Needs the size to be known already.
    pub fn set_boundary_polygon(&mut self, num_sides: usize) {
        self.boundary = Some(Polygon::ellipse(self.size.x, self.size.y, num_sides));
    }

    pub fn local_boundary(&self) -> Option<&Polygon> {
        self.boundary.as_ref()
    }

    /// Boundary in world space for the actor's current transform
    pub fn boundary_polygon(&self) -> Option<Polygon> {
        self.boundary.as_ref().map(|b| b.transformed(&self.transform()))
    }

    /// Boundary overlap test. Actors without a boundary never overlap anything.
    pub fn overlaps(&self, other: &Actor) -> bool {
        match (self.boundary_polygon(), other.boundary_polygon()) {
            (Some(a), Some(b)) => collision::overlaps(&a, &b),
            _ => false,
        }
    }

    /// MTV that would push this actor out of `other`, without moving anything
    pub fn overlap_with(&self, other: &Actor) -> Option<Mtv> {
        let a = self.boundary_polygon()?;
        let b = other.boundary_polygon()?;
        collision::resolve_overlap(&a, &b)
    }

    /// Treat `other` as solid: if overlapping, move this actor out along the
    /// minimum translation vector and return the push direction.
    pub fn prevent_overlap(&mut self, other: &Actor) -> Option<Vec2> {
        let mtv = self.overlap_with(other)?;
        self.move_by(mtv.displacement());
        Some(mtv.axis)
    }

    // --- world ---

    /// Keep the whole sprite inside the world
    pub fn bound_to_world(&mut self, world: &WorldConfig) {
        self.position = world.clamp_position(self.position, self.size);
    }

    /// Centre `camera` on this actor's pivot, keeping the view inside the world
    pub fn align_camera(&self, camera: &mut Camera, world: &WorldConfig) {
        camera.focus(self.position + self.origin, world);
    }
}
