//! Game state and core simulation types
//!
//! Entities are kept in insertion order (which is also draw order) and
//! looked up by their typed kind, never by name.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::animation::{Animation, FrameId, PlayMode};
use super::world::{Camera, WorldConfig};
use crate::consts::*;
use crate::settings::{Settings, TurtleTuning, checked_boundary_sides};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start input
    Title,
    /// Active gameplay
    Playing,
    /// Every starfish collected
    Won { banner: WinBanner },
}

/// "You win" message: hidden for a moment, then fades in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WinBanner {
    Waiting { remaining: f32 },
    FadingIn { progress: f32 },
    Shown,
}

impl WinBanner {
    pub fn new(delay: f32) -> Self {
        if delay > 0.0 {
            WinBanner::Waiting { remaining: delay }
        } else {
            WinBanner::FadingIn { progress: 0.0 }
        }
    }

    /// Time left over from the delay carries into the fade
    pub fn advance(self, dt: f32, fade_secs: f32) -> Self {
        match self {
            WinBanner::Waiting { remaining } if remaining > dt => WinBanner::Waiting {
                remaining: remaining - dt,
            },
            WinBanner::Waiting { remaining } => {
                WinBanner::FadingIn { progress: 0.0 }.advance(dt - remaining, fade_secs)
            }
            WinBanner::FadingIn { progress } => {
                let progress = if fade_secs > 0.0 { progress + dt / fade_secs } else { 1.0 };
                if progress >= 1.0 {
                    WinBanner::Shown
                } else {
                    WinBanner::FadingIn { progress }
                }
            }
            WinBanner::Shown => WinBanner::Shown,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            WinBanner::Waiting { .. } => 0.0,
            WinBanner::FadingIn { progress } => *progress,
            WinBanner::Shown => 1.0,
        }
    }
}

/// Starfish lifecycle: spins until collected, fades, then leaves the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StarfishPhase {
    Idle,
    /// `fade` runs 0 -> 1 over the fade duration
    Collected { fade: f32 },
    Removed,
}

/// What an entity is, with any per-kind state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Turtle,
    Starfish(StarfishPhase),
    Rock,
    /// Splash left behind by a collected starfish
    Whirlpool,
}

/// Kind tag without payload, for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Turtle,
    Starfish,
    Rock,
    Whirlpool,
}

impl EntityKind {
    pub fn tag(&self) -> Kind {
        match self {
            EntityKind::Turtle => Kind::Turtle,
            EntityKind::Starfish(_) => Kind::Starfish,
            EntityKind::Rock => Kind::Rock,
            EntityKind::Whirlpool => Kind::Whirlpool,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub actor: Actor,
}

/// Events produced by a tick, for audio/UI hooks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Started,
    StarfishCollected { id: u32, at: Vec2 },
    WhirlpoolSpawned { id: u32 },
    EntityRemoved { id: u32, kind: Kind },
    Won,
}

/// Frame sizes and first frame handles for each sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteCatalog {
    pub turtle_first_frame: FrameId,
    pub turtle_size: Vec2,
    pub starfish_frame: FrameId,
    pub starfish_size: Vec2,
    pub rock_frame: FrameId,
    pub rock_size: Vec2,
    pub whirlpool_first_frame: FrameId,
    pub whirlpool_size: Vec2,
}

impl Default for SpriteCatalog {
    fn default() -> Self {
        Self {
            turtle_first_frame: FrameId(0),
            turtle_size: Vec2::new(64.0, 64.0),
            starfish_frame: FrameId(TURTLE_FRAMES),
            starfish_size: Vec2::new(64.0, 64.0),
            rock_frame: FrameId(TURTLE_FRAMES + 1),
            rock_size: Vec2::new(64.0, 64.0),
            whirlpool_first_frame: FrameId(TURTLE_FRAMES + 2),
            whirlpool_size: Vec2::new(64.0, 64.0),
        }
    }
}

impl SpriteCatalog {
    pub fn turtle(&self) -> Animation {
        Animation::from_sheet(
            self.turtle_first_frame,
            1,
            TURTLE_FRAMES,
            TURTLE_FRAME_SECS,
            PlayMode::Loop,
            self.turtle_size,
        )
    }

    pub fn starfish(&self) -> Animation {
        Animation::still(self.starfish_frame, self.starfish_size)
    }

    pub fn rock(&self) -> Animation {
        Animation::still(self.rock_frame, self.rock_size)
    }

    pub fn whirlpool(&self) -> Animation {
        Animation::from_sheet(
            self.whirlpool_first_frame,
            WHIRLPOOL_ROWS,
            WHIRLPOOL_COLS,
            WHIRLPOOL_FRAME_SECS,
            PlayMode::Normal,
            self.whirlpool_size,
        )
    }
}

/// Where things start (bottom-left corners)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub turtle: Vec2,
    pub starfish: Vec<Vec2>,
    pub rocks: Vec<Vec2>,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::classic()
    }
}

impl LevelLayout {
    /// The hand-placed ocean level
    pub fn classic() -> Self {
        Self {
            turtle: Vec2::new(20.0, 20.0),
            starfish: vec![
                Vec2::new(400.0, 400.0),
                Vec2::new(500.0, 100.0),
                Vec2::new(100.0, 450.0),
                Vec2::new(200.0, 250.0),
            ],
            rocks: vec![
                Vec2::new(200.0, 150.0),
                Vec2::new(100.0, 300.0),
                Vec2::new(300.0, 350.0),
                Vec2::new(450.0, 200.0),
            ],
        }
    }

    /// Seeded random layout. Every sprite fits inside the world, and nothing
    /// is placed on top of the turtle's start or another object. Sprites that
    /// find no free spot are left out, so a crowded world can come back with
    /// fewer than asked for.
    pub fn scattered(
        seed: u64,
        world: &WorldConfig,
        sprites: &SpriteCatalog,
        starfish: usize,
        rocks: usize,
    ) -> Self {
        const MAX_ATTEMPTS: u32 = 64;

        let mut rng = Pcg32::seed_from_u64(seed);
        let turtle = Vec2::new(20.0, 20.0);
        let mut taken: Vec<(Vec2, Vec2)> = vec![(turtle, sprites.turtle_size)];

        let mut place = |rng: &mut Pcg32, size: Vec2, count: usize, what: &str| -> Vec<Vec2> {
            let mut placed = Vec::with_capacity(count);
            let max = Vec2::new(world.width - size.x, world.height - size.y);
            if max.x < 0.0 || max.y < 0.0 {
                log::warn!("{} sprite {}x{} does not fit in the world", what, size.x, size.y);
                return placed;
            }

            for _ in 0..count {
                let free = (0..MAX_ATTEMPTS)
                    .map(|_| Vec2::new(rng.random_range(0.0..=max.x), rng.random_range(0.0..=max.y)))
                    .find(|c| !taken.iter().any(|(p, s)| boxes_touch(*c, size, *p, *s)));
                match free {
                    Some(pos) => {
                        taken.push((pos, size));
                        placed.push(pos);
                    }
                    None => log::warn!(
                        "No free spot for {} #{} after {} attempts, skipping",
                        what,
                        placed.len() + 1,
                        MAX_ATTEMPTS
                    ),
                }
            }
            placed
        };

        let rock_positions = place(&mut rng, sprites.rock_size, rocks, "rock");
        let starfish_positions = place(&mut rng, sprites.starfish_size, starfish, "starfish");

        log::debug!(
            "Scattered layout seed={}: {} starfish, {} rocks",
            seed,
            starfish_positions.len(),
            rock_positions.len()
        );

        Self {
            turtle,
            starfish: starfish_positions,
            rocks: rock_positions,
        }
    }
}

fn boxes_touch(p1: Vec2, s1: Vec2, p2: Vec2, s2: Vec2) -> bool {
    p1.x <= p2.x + s2.x && p1.x + s1.x >= p2.x && p1.y <= p2.y + s2.y && p1.y + s1.y >= p2.y
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub world: WorldConfig,
    pub camera: Camera,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Live entities in insertion (draw) order
    pub entities: Vec<Entity>,
    pub sprites: SpriteCatalog,
    pub turtle_id: u32,
    pub boundary_sides: usize,
    pub starfish_spin: f32,
    pub starfish_fade_secs: f32,
    pub win_banner_delay: f32,
    pub win_banner_fade: f32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Classic level with default settings
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let layout = settings.level.clone().unwrap_or_else(LevelLayout::classic);
        Self::with_layout(settings, &layout)
    }

    pub fn with_layout(settings: &Settings, layout: &LevelLayout) -> Self {
        let mut state = Self {
            world: settings.world,
            camera: Camera::new(settings.viewport),
            phase: GamePhase::Title,
            time_ticks: 0,
            entities: Vec::new(),
            sprites: settings.sprites.clone(),
            turtle_id: 0,
            boundary_sides: checked_boundary_sides(settings.boundary_sides),
            starfish_spin: settings.starfish_spin,
            starfish_fade_secs: settings.starfish_fade_secs,
            win_banner_delay: settings.win_banner_delay,
            win_banner_fade: settings.win_banner_fade,
            next_id: 1,
        };

        for &pos in &layout.starfish {
            state.spawn_starfish(pos);
        }
        for &pos in &layout.rocks {
            state.spawn_rock(pos);
        }
        state.turtle_id = state.spawn_turtle(layout.turtle, &settings.turtle);

        state.follow_turtle();

        log::info!(
            "Level ready: world {}x{}, {} starfish, {} rocks",
            state.world.width,
            state.world.height,
            layout.starfish.len(),
            layout.rocks.len()
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn(&mut self, kind: EntityKind, actor: Actor) -> u32 {
        let id = self.next_entity_id();
        self.entities.push(Entity { id, kind, actor });
        id
    }

    pub fn spawn_turtle(&mut self, pos: Vec2, tuning: &TurtleTuning) -> u32 {
        let mut actor = Actor::new(pos.x, pos.y);
        actor.set_animation(self.sprites.turtle());
        actor.set_boundary_polygon(self.boundary_sides);
        actor.motion = tuning.motion();
        self.spawn(EntityKind::Turtle, actor)
    }

    pub fn spawn_starfish(&mut self, pos: Vec2) -> u32 {
        let mut actor = Actor::new(pos.x, pos.y);
        actor.set_animation(self.sprites.starfish());
        actor.set_boundary_polygon(self.boundary_sides);
        self.spawn(EntityKind::Starfish(StarfishPhase::Idle), actor)
    }

    pub fn spawn_rock(&mut self, pos: Vec2) -> u32 {
        let mut actor = Actor::new(pos.x, pos.y);
        actor.set_animation(self.sprites.rock());
        actor.set_boundary_polygon(self.boundary_sides);
        self.spawn(EntityKind::Rock, actor)
    }

    /// Whirlpool splash centred on `center`
    pub fn spawn_whirlpool(&mut self, center: Vec2) -> u32 {
        let mut actor = Actor::new(0.0, 0.0);
        actor.set_animation(self.sprites.whirlpool());
        actor.center_at_position(center);
        actor.opacity = WHIRLPOOL_OPACITY;
        self.spawn(EntityKind::Whirlpool, actor)
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn turtle(&self) -> Option<&Actor> {
        self.entity(self.turtle_id).map(|e| &e.actor)
    }

    pub fn turtle_mut(&mut self) -> Option<&mut Actor> {
        let id = self.turtle_id;
        self.entity_mut(id).map(|e| &mut e.actor)
    }

    /// Live entities of one kind, in insertion order
    pub fn iter_kind(&self, kind: Kind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind.tag() == kind)
    }

    pub fn ids_of(&self, kind: Kind) -> Vec<u32> {
        self.iter_kind(kind).map(|e| e.id).collect()
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.iter_kind(kind).count()
    }

    /// Drop an entity from the scene, returning it
    pub fn remove(&mut self, id: u32) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Point the camera at the turtle
    pub fn follow_turtle(&mut self) {
        let id = self.turtle_id;
        if let Some(entity) = self.entities.iter().find(|e| e.id == id) {
            entity.actor.align_camera(&mut self.camera, &self.world);
        }
    }

    pub fn win_banner_opacity(&self) -> f32 {
        match self.phase {
            GamePhase::Won { banner } => banner.opacity(),
            _ => 0.0,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
