//! Ports implemented by the embedding application
//!
//! The simulation never talks to a window, GPU or keyboard directly: the
//! host polls its input device through [`InputSource`] and receives draw
//! calls through [`FrameSink`].

use glam::Vec2;

use crate::sim::animation::FrameId;
use crate::sim::polygon::Transform;
use crate::sim::state::GameState;
use crate::sim::tick::TickInput;

/// Keys the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Title screen "S"
    Start,
}

/// Discrete key-down state, queried once per tick
pub trait InputSource {
    fn is_pressed(&self, key: Key) -> bool;
}

impl TickInput {
    pub fn poll<I: InputSource + ?Sized>(source: &I) -> Self {
        Self {
            left: source.is_pressed(Key::Left),
            right: source.is_pressed(Key::Right),
            up: source.is_pressed(Key::Up),
            down: source.is_pressed(Key::Down),
            start: source.is_pressed(Key::Start),
        }
    }
}

/// Everything needed to place one sprite frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParams {
    pub transform: Transform,
    pub size: Vec2,
    pub opacity: f32,
}

/// Receives the frames to draw, back to front
pub trait FrameSink {
    /// Camera centre and viewport for this frame
    fn begin(&mut self, _camera_center: Vec2, _viewport: Vec2) {}

    fn draw(&mut self, frame: FrameId, params: &DrawParams);

    /// Screen-space "you win" banner, only called once it is visible
    fn win_banner(&mut self, _opacity: f32) {}
}

/// Emit draw calls for every visible, animated entity in scene order
pub fn draw_scene<S: FrameSink + ?Sized>(state: &GameState, sink: &mut S) {
    sink.begin(state.camera.position, state.camera.viewport);

    for entity in &state.entities {
        let actor = &entity.actor;
        if !actor.visible {
            continue;
        }
        let Some(player) = actor.animation() else {
            continue;
        };
        sink.draw(
            player.current_frame(),
            &DrawParams {
                transform: actor.transform(),
                size: actor.size,
                opacity: actor.opacity,
            },
        );
    }

    let banner = state.win_banner_opacity();
    if banner > 0.0 {
        sink.win_banner(banner);
    }
}
