//! Orbit Guard - headless runner
//!
//! Plays the game on autopilot at a fixed frame rate and saves on exit.
//!
//! Usage: `orbit-guard [tuning.json] [seconds]`

use orbit_guard::consts::{MAX_SUBSTEPS, SIM_DT};
use orbit_guard::sim::{GameEvent, GamePhase, GameSession, TickInput};
use orbit_guard::tuning::Tuning;
use orbit_guard::ui::Hud;

/// Frame time the runner pretends to render at
const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 60.0;

/// Fixed timestep driver around a session
struct Game {
    session: GameSession,
    accumulator: f32,
    input: TickInput,
    intercepts: u32,
    core_hits: u32,
}

impl Game {
    fn new(session: GameSession) -> Self {
        Self {
            session,
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            intercepts: 0,
            core_hits: 0,
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            for event in self.session.tick(&self.input, SIM_DT) {
                match event {
                    GameEvent::EnemyIntercepted { .. } => self.intercepts += 1,
                    GameEvent::CoreHit => self.core_hits += 1,
                }
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Orbit Guard (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{err}");
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let mut session = match GameSession::new(&tuning) {
        Ok(session) => session,
        Err(err) => {
            log::error!("Could not start: {err}");
            std::process::exit(1);
        }
    };
    log::info!(
        "Saving to {} ({} mode)",
        session.manager.store().dir().display(),
        session.manager.mode().as_str()
    );

    let max_lives = session.max_lives();
    let (hud, _) = Hud::attach(&mut session.manager, max_lives);
    session.start();

    let mut game = Game::new(session);
    let frames = (seconds / FRAME_DT).ceil() as u64;
    for _ in 0..frames {
        game.update(FRAME_DT);
        if game.session.phase() == GamePhase::GameOver {
            break;
        }
    }

    {
        let hud = hud.borrow();
        log::info!(
            "{} | {} | lives {} | {} intercepted, {} hits after {:.1}s",
            hud.score_text,
            hud.high_score_text,
            hud.lives_shown(),
            game.intercepts,
            game.core_hits,
            game.session.world.time_ticks as f32 * SIM_DT
        );
    }

    if let Err(err) = game.session.shutdown() {
        log::error!("Could not save progress: {err}");
    }
}
