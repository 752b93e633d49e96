//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, ids ascending)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod actor;
pub mod animation;
pub mod collision;
pub mod motion;
pub mod polygon;
pub mod state;
pub mod tick;
pub mod world;

pub use aabb::Aabb;
pub use actor::Actor;
pub use animation::{Animation, AnimationPlayer, FrameId, PlayMode};
pub use collision::{Mtv, NarrowPhase, SeparatingAxis, overlaps, resolve_overlap};
pub use motion::{MotionState, PhysicsStep};
pub use polygon::{Polygon, Transform};
pub use state::{
    Entity, EntityKind, GameEvent, GamePhase, GameState, Kind, LevelLayout, SpriteCatalog,
    StarfishPhase, WinBanner,
};
pub use tick::{TickInput, autopilot, tick};
pub use world::{Camera, WorldConfig};
