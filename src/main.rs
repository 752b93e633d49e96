//! Starfish Collector headless runner
//!
//! Drives the simulation with the autopilot at a fixed frame rate and logs
//! what happens. Usage:
//!
//! ```text
//! starfish-collector [SETTINGS.json] [--seed N] [--starfish N] [--rocks N]
//! ```

use starfish_collector::Settings;
use starfish_collector::consts::*;
use starfish_collector::host::{DrawParams, FrameSink, draw_scene};
use starfish_collector::sim::{
    FrameId, GameEvent, GamePhase, GameState, LevelLayout, TickInput, autopilot, tick,
};

/// Host frame interval (30 fps, so each frame runs two sim steps)
const FRAME_DT: f32 = 1.0 / 30.0;
/// Give up after this much simulated time
const MAX_SECONDS: f32 = 180.0;

#[derive(Debug, Default)]
struct Options {
    settings_path: Option<String>,
    seed: Option<u64>,
    starfish: usize,
    rocks: usize,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Self {
        let mut opts = Options {
            starfish: 4,
            rocks: 4,
            ..Default::default()
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => opts.seed = args.next().and_then(|v| v.parse().ok()),
                "--starfish" => {
                    opts.starfish = args.next().and_then(|v| v.parse().ok()).unwrap_or(opts.starfish)
                }
                "--rocks" => opts.rocks = args.next().and_then(|v| v.parse().ok()).unwrap_or(opts.rocks),
                other if !other.starts_with("--") => opts.settings_path = Some(other.to_string()),
                other => log::warn!("Ignoring unknown option {}", other),
            }
        }
        opts
    }
}

/// Counts draw calls instead of rendering
#[derive(Default)]
struct NullSink {
    draws: u64,
}

impl FrameSink for NullSink {
    fn draw(&mut self, _frame: FrameId, _params: &DrawParams) {
        self.draws += 1;
    }
}

/// Game instance holding all state
struct Game {
    state: GameState,
    accumulator: f32,
    sink: NullSink,
    collected: u32,
}

impl Game {
    fn new(state: GameState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            sink: NullSink::default(),
            collected: 0,
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) -> bool {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut won = false;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input: TickInput = autopilot(&self.state);
            for event in tick(&mut self.state, &input, SIM_DT) {
                match event {
                    GameEvent::StarfishCollected { .. } => self.collected += 1,
                    GameEvent::Won => won = true,
                    _ => {}
                }
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        won
    }

    fn render(&mut self) {
        draw_scene(&self.state, &mut self.sink);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Starfish Collector (headless) starting...");

    let opts = Options::parse(std::env::args().skip(1));
    let settings = match &opts.settings_path {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let state = match opts.seed {
        Some(seed) => {
            let layout = LevelLayout::scattered(
                seed,
                &settings.world,
                &settings.sprites,
                opts.starfish,
                opts.rocks,
            );
            GameState::with_layout(&settings, &layout)
        }
        None => GameState::from_settings(&settings),
    };

    let mut game = Game::new(state);
    let mut elapsed = 0.0;
    let mut won_at = None;

    while elapsed < MAX_SECONDS {
        if game.update(FRAME_DT) {
            won_at = Some(elapsed);
        }
        game.render();
        elapsed += FRAME_DT;

        // let the banner finish before stopping
        if matches!(game.state.phase, GamePhase::Won { .. }) && game.state.win_banner_opacity() >= 1.0 {
            break;
        }
    }

    match won_at {
        Some(t) => log::info!(
            "Won in {:.1}s ({} starfish, {} ticks, {} draw calls)",
            t,
            game.collected,
            game.state.time_ticks,
            game.sink.draws
        ),
        None => log::warn!(
            "Gave up after {:.0}s with {} starfish collected",
            MAX_SECONDS,
            game.collected
        ),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedding hosts drive `sim::tick` themselves
}
