//! Voxel Runner headless entry point
//!
//! Runs the gameplay core against the in-memory chunk store with the
//! autopilot steering, logging every lifecycle event.
//!
//! Usage: `voxel-runner [tuning.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::process::ExitCode;

    use voxel_runner::consts::FRAME_DT;
    use voxel_runner::sim::{GameEvent, GameSession, SessionError, TickInput, tick};
    use voxel_runner::world::ChunkStore;
    use voxel_runner::{Tuning, TuningError};

    /// Simulated seconds to run when no duration is given
    const DEFAULT_RUN_SECS: f32 = 120.0;

    struct Game {
        session: GameSession,
        world: ChunkStore,
        input: TickInput,
    }

    impl Game {
        fn new(tuning: Tuning) -> Result<Self, SessionError> {
            let session = GameSession::new(tuning)?;
            let world = ChunkStore::new(session.tuning());
            Ok(Self {
                session,
                world,
                input: TickInput {
                    idle_mode: true,
                    ..Default::default()
                },
            })
        }

        /// One frame: countdown timer, chunk streaming, then the gameplay tick
        fn update(&mut self, dt: f32) {
            let mut events = self.session.advance_timer(dt);
            self.session.stream_world(&mut self.world);

            // Run number of the run that may end this frame
            let run = self.session.run_index();
            events.extend(tick(&mut self.session, &self.world, &self.input, dt));
            for event in events {
                self.report(run, &event);
            }
        }

        fn report(&self, run: u32, event: &GameEvent) {
            match event {
                GameEvent::GameOver { reason, distance } => log::warn!(
                    "Run {} over after {:.1} units: {}",
                    run,
                    distance,
                    reason.message()
                ),
                GameEvent::Go => log::debug!("Run {} started", self.session.run_index()),
                _ => {}
            }
        }
    }

    fn parse_args() -> Result<(Tuning, f32), TuningError> {
        let mut args = std::env::args().skip(1);
        let tuning = match args.next() {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let seconds = match args.next() {
            Some(s) => s
                .parse::<f32>()
                .map_err(|e| TuningError::Invalid(format!("bad duration {s:?}: {e}")))?,
            None => DEFAULT_RUN_SECS,
        };
        Ok((tuning, seconds))
    }

    pub fn run() -> ExitCode {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Voxel Runner (headless) starting...");

        let (tuning, seconds) = match parse_args() {
            Ok(args) => args,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        };

        let mut game = match Game::new(tuning) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Failed to start session: {}", e);
                return ExitCode::FAILURE;
            }
        };

        game.session.start();
        let frames = (seconds / FRAME_DT).ceil() as u64;
        for _ in 0..frames {
            game.update(FRAME_DT);
        }

        let session = &game.session;
        log::info!(
            "Finished after {:.0}s: {} runs, best distance {:.1}, current run {:.1} (speed {:.2}, difficulty {:.4})",
            seconds,
            session.run_index(),
            session.best_distance(),
            session.distance(),
            session.difficulty().speed,
            session.difficulty().difficulty
        );
        ExitCode::SUCCESS
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is embedded by the engine instead
}
