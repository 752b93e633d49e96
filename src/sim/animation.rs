//! Frame-based sprite animation
//!
//! Frames are opaque handles owned by the renderer; the simulation only
//! needs their count, timing and pixel size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Renderer-side handle for one animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayMode {
    /// Play once and hold the last frame
    Normal,
    #[default]
    Loop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnimationData")]
pub struct Animation {
    frames: Vec<FrameId>,
    frame_duration: f32,
    mode: PlayMode,
    /// Pixel size of every frame (taken from the first)
    frame_size: Vec2,
}

/// Unchecked wire form of [`Animation`]
#[derive(Deserialize)]
struct AnimationData {
    frames: Vec<FrameId>,
    frame_duration: f32,
    mode: PlayMode,
    frame_size: Vec2,
}

impl TryFrom<AnimationData> for Animation {
    type Error = String;

    fn try_from(data: AnimationData) -> Result<Self, Self::Error> {
        if data.frames.is_empty() {
            return Err("animation needs at least one frame".to_string());
        }
        if data.frame_duration.is_nan() || data.frame_duration <= 0.0 {
            return Err(format!(
                "frame duration must be positive, got {}",
                data.frame_duration
            ));
        }
        Ok(Self {
            frames: data.frames,
            frame_duration: data.frame_duration,
            mode: data.mode,
            frame_size: data.frame_size,
        })
    }
}

impl Animation {
    /// # Panics
    /// Panics on an empty frame list or a non-positive frame duration.
    pub fn new(frames: Vec<FrameId>, frame_duration: f32, mode: PlayMode, frame_size: Vec2) -> Self {
        assert!(!frames.is_empty(), "animation needs at least one frame");
        assert!(frame_duration > 0.0, "frame duration must be positive, got {frame_duration}");
        Self {
            frames,
            frame_duration,
            mode,
            frame_size,
        }
    }

    /// Single-frame "animation" for a still image
    pub fn still(frame: FrameId, frame_size: Vec2) -> Self {
        Self::new(vec![frame], 1.0, PlayMode::Loop, frame_size)
    }

    /// Frames `first..first + rows * cols` laid out row-major on a sprite sheet
    pub fn from_sheet(
        first: FrameId,
        rows: u32,
        cols: u32,
        frame_duration: f32,
        mode: PlayMode,
        frame_size: Vec2,
    ) -> Self {
        let frames = (0..rows * cols).map(|i| FrameId(first.0 + i)).collect();
        Self::new(frames, frame_duration, mode, frame_size)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_size(&self) -> Vec2 {
        self.frame_size
    }

    /// Total time to play every frame once
    pub fn duration(&self) -> f32 {
        self.frame_duration * self.frames.len() as f32
    }

    fn frame_number(&self, elapsed: f32) -> usize {
        (elapsed.max(0.0) / self.frame_duration) as usize
    }

    pub fn key_frame(&self, elapsed: f32) -> FrameId {
        let n = self.frame_number(elapsed);
        let last = self.frames.len() - 1;
        let index = match self.mode {
            PlayMode::Normal => n.min(last),
            PlayMode::Loop => n % self.frames.len(),
        };
        self.frames[index]
    }

    /// Past the last frame. A looping animation reports this too once its
    /// first cycle is over; callers only ask for one-shot effects.
    pub fn is_finished(&self, elapsed: f32) -> bool {
        self.frame_number(elapsed) > self.frames.len() - 1
    }
}

/// Playback clock for one actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationPlayer {
    pub animation: Animation,
    pub elapsed: f32,
    pub paused: bool,
}

impl AnimationPlayer {
    pub fn new(animation: Animation) -> Self {
        Self {
            animation,
            elapsed: 0.0,
            paused: false,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.paused {
            self.elapsed += dt;
        }
    }

    pub fn current_frame(&self) -> FrameId {
        self.animation.key_frame(self.elapsed)
    }

    pub fn is_finished(&self) -> bool {
        self.animation.is_finished(self.elapsed)
    }
}
