//! Fixed timestep simulation tick
//!
//! Order within a tick: every actor updates (turtle input and integration,
//! starfish spin/fade, whirlpool playback), then collision queries run against
//! the freshly moved turtle, then the win check.

use glam::Vec2;

use super::actor::Actor;
use super::state::{Entity, EntityKind, GameEvent, GamePhase, GameState, Kind, StarfishPhase, WinBanner};

/// Keys held during a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Leave the title screen
    pub start: bool,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase == GamePhase::Title {
        if input.start {
            state.phase = GamePhase::Playing;
            events.push(GameEvent::Started);
            log::info!("Level started");
        }
        return events;
    }

    state.time_ticks += 1;

    act(state, input, dt, &mut events);
    resolve_collisions(state, &mut events);

    match state.phase {
        GamePhase::Playing if state.count(Kind::Starfish) == 0 => {
            state.phase = GamePhase::Won {
                banner: WinBanner::new(state.win_banner_delay),
            };
            events.push(GameEvent::Won);
            log::info!("All starfish collected after {} ticks", state.time_ticks);
        }
        GamePhase::Won { banner } => {
            state.phase = GamePhase::Won {
                banner: banner.advance(dt, state.win_banner_fade),
            };
        }
        _ => {}
    }

    events
}

/// Per-actor updates
fn act(state: &mut GameState, input: &TickInput, dt: f32, events: &mut Vec<GameEvent>) {
    let spin = state.starfish_spin;
    let fade_secs = state.starfish_fade_secs;
    let world = state.world;
    let mut removed = Vec::new();

    for entity in &mut state.entities {
        entity.actor.act(dt);

        match &mut entity.kind {
            EntityKind::Turtle => {
                steer_turtle(&mut entity.actor, input, dt);
                entity.actor.bound_to_world(&world);
            }
            EntityKind::Starfish(phase) => {
                *phase = advance_starfish(*phase, &mut entity.actor, dt, spin, fade_secs);
                if *phase == StarfishPhase::Removed {
                    removed.push((entity.id, Kind::Starfish));
                }
            }
            EntityKind::Whirlpool => {
                if entity.actor.is_animation_finished() {
                    removed.push((entity.id, Kind::Whirlpool));
                }
            }
            EntityKind::Rock => {}
        }
    }

    state.follow_turtle();

    for (id, kind) in removed {
        if state.remove(id).is_some() {
            log::debug!("Removed {:?} #{}", kind, id);
            events.push(GameEvent::EntityRemoved { id, kind });
        }
    }
}

/// Arrow keys request thrust; the turtle faces the way it swims and its
/// swim cycle only plays while moving.
fn steer_turtle(turtle: &mut Actor, input: &TickInput, dt: f32) {
    if input.left {
        turtle.accelerate_at_angle(180.0);
    }
    if input.right {
        turtle.accelerate_at_angle(0.0);
    }
    if input.up {
        turtle.accelerate_at_angle(90.0);
    }
    if input.down {
        turtle.accelerate_at_angle(270.0);
    }

    turtle.apply_physics(dt);

    let moving = turtle.motion.is_moving();
    turtle.set_animation_paused(!moving);
    if moving {
        turtle.rotation = turtle.motion.motion_angle();
    }
}

fn advance_starfish(
    phase: StarfishPhase,
    actor: &mut Actor,
    dt: f32,
    spin: f32,
    fade_secs: f32,
) -> StarfishPhase {
    match phase {
        StarfishPhase::Idle => {
            actor.rotation = crate::normalize_degrees(actor.rotation + spin * dt);
            StarfishPhase::Idle
        }
        StarfishPhase::Collected { fade } => {
            let fade = if fade_secs > 0.0 { fade + dt / fade_secs } else { 1.0 };
            actor.opacity = (1.0 - fade).max(0.0);
            if fade >= 1.0 {
                StarfishPhase::Removed
            } else {
                StarfishPhase::Collected { fade }
            }
        }
        StarfishPhase::Removed => StarfishPhase::Removed,
    }
}

/// Rocks block the turtle; touching an idle starfish collects it
fn resolve_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let Some(turtle_index) = state.entities.iter().position(|e| e.id == state.turtle_id) else {
        return;
    };

    {
        let (turtle, others) = split_out(&mut state.entities, turtle_index);
        for rock in others.filter(|e| e.kind == EntityKind::Rock) {
            turtle.actor.prevent_overlap(&rock.actor);
        }
    }

    let turtle = &state.entities[turtle_index].actor;
    let hits: Vec<(u32, Vec2)> = state
        .iter_kind(Kind::Starfish)
        .filter(|e| e.kind == EntityKind::Starfish(StarfishPhase::Idle))
        .filter(|e| turtle.overlaps(&e.actor))
        .map(|e| (e.id, e.actor.center()))
        .collect();

    for (id, at) in hits {
        if let Some(entity) = state.entity_mut(id) {
            entity.kind = EntityKind::Starfish(StarfishPhase::Collected { fade: 0.0 });
        }
        events.push(GameEvent::StarfishCollected { id, at });
        log::info!("Starfish #{} collected at ({:.0}, {:.0})", id, at.x, at.y);

        let whirl = state.spawn_whirlpool(at);
        events.push(GameEvent::WhirlpoolSpawned { id: whirl });
    }
}

/// The entity at `index` mutably, plus every other entity
fn split_out(entities: &mut [Entity], index: usize) -> (&mut Entity, impl Iterator<Item = &Entity>) {
    let (before, rest) = entities.split_at_mut(index);
    let (target, after) = rest.split_at_mut(1);
    (&mut target[0], before.iter().chain(after.iter()))
}

/// Keys that steer the turtle toward the nearest uncollected starfish
/// (demo/idle play)
pub fn autopilot(state: &GameState) -> TickInput {
    const DEADZONE: f32 = 4.0;

    if state.phase == GamePhase::Title {
        return TickInput {
            start: true,
            ..Default::default()
        };
    }

    let Some(turtle) = state.turtle() else {
        return TickInput::default();
    };
    let here = turtle.center();

    let target = state
        .iter_kind(Kind::Starfish)
        .filter(|e| e.kind == EntityKind::Starfish(StarfishPhase::Idle))
        .map(|e| e.actor.center())
        .min_by(|a, b| {
            a.distance_squared(here)
                .partial_cmp(&b.distance_squared(here))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match target {
        Some(target) => {
            let d = target - here;
            TickInput {
                left: d.x < -DEADZONE,
                right: d.x > DEADZONE,
                up: d.y > DEADZONE,
                down: d.y < -DEADZONE,
                start: false,
            }
        }
        None => TickInput::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::state::LevelLayout;

    fn playing(layout: &LevelLayout) -> GameState {
        let mut state = GameState::with_layout(&Settings::default(), layout);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    fn run(state: &mut GameState, input: &TickInput, ticks: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(tick(state, input, SIM_DT));
        }
        events
    }

    #[test]
    fn test_title_waits_for_start() {
        let mut state = GameState::new();
        let events = run(&mut state, &TickInput { right: true, ..Default::default() }, 30);
        assert!(events.is_empty());
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.time_ticks, 0);

        let events = tick(&mut state, &TickInput { start: true, ..Default::default() }, SIM_DT);
        assert_eq!(events, vec![GameEvent::Started]);
    }

    #[test]
    fn test_turtle_swims_right_and_faces_motion() {
        let mut state = playing(&LevelLayout::classic());
        let start = state.turtle().expect("turtle").position;

        run(&mut state, &TickInput { right: true, ..Default::default() }, 30);
        let turtle = state.turtle().expect("turtle");
        assert!(turtle.position.x > start.x);
        assert!((turtle.motion.speed() - 100.0).abs() < 1e-3);
        assert!(turtle.rotation.abs() < 1e-3);
        assert!(!turtle.animation().expect("animated").paused);
    }

    #[test]
    fn test_turtle_coasts_to_rest_and_pauses_animation() {
        let mut state = playing(&LevelLayout::classic());
        run(&mut state, &TickInput { up: true, ..Default::default() }, 30);
        run(&mut state, &TickInput::default(), 30);

        let turtle = state.turtle().expect("turtle");
        assert_eq!(turtle.motion.speed(), 0.0);
        assert!(turtle.animation().expect("animated").paused);
        // keeps facing the last direction of travel
        assert!((turtle.rotation - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_turtle_stays_in_world() {
        let mut state = playing(&LevelLayout::classic());
        run(&mut state, &TickInput { left: true, down: true, ..Default::default() }, 120);
        let turtle = state.turtle().expect("turtle");
        assert_eq!(turtle.position, Vec2::ZERO);
        assert_eq!(state.camera.position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_rock_blocks_turtle() {
        let layout = LevelLayout {
            turtle: Vec2::new(20.0, 100.0),
            starfish: vec![Vec2::new(1000.0, 800.0)],
            rocks: vec![Vec2::new(150.0, 100.0)],
        };
        let mut state = playing(&layout);
        // square boundaries meet face to face, so the push is straight back
        let rock_id = state.ids_of(Kind::Rock)[0];
        state.entity_mut(rock_id).expect("rock").actor.set_boundary_rectangle();
        state.turtle_mut().expect("turtle").set_boundary_rectangle();

        run(&mut state, &TickInput { right: true, ..Default::default() }, 240);

        let turtle = state.turtle().expect("turtle");
        let rock = &state.entity(rock_id).expect("rock").actor;
        let right_edge = turtle.position.x + turtle.size.x;
        assert!((right_edge - rock.position.x).abs() < 1e-2, "right edge at {right_edge}");
        assert!((turtle.position.y - 100.0).abs() < 1e-3);
        assert!(turtle.overlap_with(rock).is_none_or(|m| m.depth < 1e-3));
    }

    #[test]
    fn test_turtle_wedged_between_two_rocks_clears_both() {
        // one rock to the right, one above: swimming up-right drives the
        // turtle into the inside corner and against both at once
        let layout = LevelLayout {
            turtle: Vec2::new(20.0, 20.0),
            starfish: vec![Vec2::new(1000.0, 800.0)],
            rocks: vec![Vec2::new(150.0, 100.0), Vec2::new(70.0, 170.0)],
        };
        let mut state = playing(&layout);
        let rocks = state.ids_of(Kind::Rock);
        for &id in &rocks {
            state.entity_mut(id).expect("rock").actor.set_boundary_rectangle();
        }
        state.turtle_mut().expect("turtle").set_boundary_rectangle();

        let input = TickInput {
            right: true,
            up: true,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut state, &input, SIM_DT);
            let turtle = state.turtle().expect("turtle");
            for &id in &rocks {
                let rock = &state.entity(id).expect("rock").actor;
                let depth = turtle.overlap_with(rock).map_or(0.0, |m| m.depth);
                assert!(depth < 1e-2, "turtle {depth} deep in rock #{id}");
            }
        }

        // rotated 45 degrees the square reaches 32 * sqrt(2) from its centre
        let reach = 32.0 * std::f32::consts::SQRT_2;
        let center = state.turtle().expect("turtle").center();
        assert!((center.x - (150.0 - reach)).abs() < 0.05, "centre {center:?}");
        assert!((center.y - (170.0 - reach)).abs() < 0.05, "centre {center:?}");
    }

    #[test]
    fn test_octagon_rock_deflects_turtle() {
        let layout = LevelLayout {
            turtle: Vec2::new(20.0, 100.0),
            starfish: vec![Vec2::new(1000.0, 800.0)],
            rocks: vec![Vec2::new(150.0, 100.0)],
        };
        let mut state = playing(&layout);
        let rock_id = state.ids_of(Kind::Rock)[0];

        for _ in 0..240 {
            tick(&mut state, &TickInput { right: true, ..Default::default() }, SIM_DT);
            let turtle = state.turtle().expect("turtle");
            let rock = &state.entity(rock_id).expect("rock").actor;
            let depth = turtle.overlap_with(rock).map_or(0.0, |m| m.depth);
            assert!(depth < 1e-2, "turtle sunk {depth} into the rock");
        }
        // slanted faces steer it off the centre line
        assert!((state.turtle().expect("turtle").position.y - 100.0).abs() > 1.0);
    }

    #[test]
    fn test_collect_fade_remove_and_win() {
        let layout = LevelLayout {
            turtle: Vec2::new(100.0, 100.0),
            starfish: vec![Vec2::new(120.0, 100.0)],
            rocks: Vec::new(),
        };
        let mut state = playing(&layout);
        let starfish_id = state.ids_of(Kind::Starfish)[0];

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.iter().any(|e| matches!(e, GameEvent::StarfishCollected { id, .. } if *id == starfish_id)));
        assert!(events.iter().any(|e| matches!(e, GameEvent::WhirlpoolSpawned { .. })));
        assert_eq!(state.count(Kind::Whirlpool), 1);

        // collected starfish still present while fading; no double collection
        let events = run(&mut state, &TickInput::default(), 30);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::StarfishCollected { .. })));
        let starfish = state.entity(starfish_id).expect("still fading");
        assert!(starfish.actor.opacity < 1.0 && starfish.actor.opacity > 0.0);
        assert_eq!(state.phase, GamePhase::Playing);

        // fade (1s) and whirlpool (1s) both finish
        let events = run(&mut state, &TickInput::default(), 45);
        assert!(state.entity(starfish_id).is_none());
        assert_eq!(state.count(Kind::Whirlpool), 0);
        assert!(events.contains(&GameEvent::Won));
        assert!(matches!(state.phase, GamePhase::Won { .. }));
        assert_eq!(state.win_banner_opacity(), 0.0);

        run(&mut state, &TickInput::default(), 180);
        assert_eq!(state.win_banner_opacity(), 1.0);
    }

    #[test]
    fn test_idle_starfish_spins() {
        let mut state = playing(&LevelLayout::classic());
        run(&mut state, &TickInput::default(), 60);
        let starfish = state.iter_kind(Kind::Starfish).next().expect("starfish");
        assert!((starfish.actor.rotation - 30.0).abs() < 0.1);
    }

    #[test]
    fn test_autopilot_starts_and_heads_for_starfish() {
        let mut state = GameState::new();
        assert!(autopilot(&state).start);

        let first = autopilot(&state);
        tick(&mut state, &first, SIM_DT);
        let input = autopilot(&state);
        // nearest classic starfish from (20,20) is up and to the right
        assert!(input.right && input.up);
        assert!(!input.left && !input.down);
    }

    #[test]
    fn test_autopilot_clears_open_level() {
        let layout = LevelLayout {
            turtle: Vec2::new(20.0, 20.0),
            starfish: vec![
                Vec2::new(400.0, 400.0),
                Vec2::new(500.0, 100.0),
                Vec2::new(100.0, 450.0),
            ],
            rocks: Vec::new(),
        };
        let mut state = GameState::with_layout(&Settings::default(), &layout);

        let mut won = false;
        for _ in 0..(60 * 60) {
            let input = autopilot(&state);
            if tick(&mut state, &input, SIM_DT).contains(&GameEvent::Won) {
                won = true;
                break;
            }
        }
        assert!(won, "autopilot did not collect every starfish");
    }
}
