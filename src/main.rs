//! Frog Leap entry point
//!
//! Native builds run the simulation headless: the autopilot (or an idle
//! player) drives a seeded game for a fixed number of ticks and the result is
//! summarised on stdout.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use frog_leap::autopilot;
    use frog_leap::consts::*;
    use frog_leap::sim::{
        Command, GameEvent, GamePhase, GameState, KeySet, RenderSnapshot, TickInput, tick,
    };
    use frog_leap::{FrameClock, Settings, Tuning};

    #[derive(Debug, Parser)]
    #[command(name = "frog-leap", version, about = "Run a headless Frog Leap game")]
    struct Cli {
        /// Run seed (defaults to the settings file, then the clock)
        #[arg(long)]
        seed: Option<u64>,
        /// Simulation ticks to run
        #[arg(long, default_value_t = 3600)]
        ticks: u64,
        /// Balance table (JSON); missing fields keep their defaults
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Host preferences (JSON)
        #[arg(long)]
        settings: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_CANVAS_WIDTH)]
        width: f32,
        #[arg(long, default_value_t = DEFAULT_CANVAS_HEIGHT)]
        height: f32,
        /// Send no input instead of using the autopilot
        #[arg(long)]
        manual: bool,
        /// Print the final render snapshot as JSON
        #[arg(long)]
        dump_snapshot: bool,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        clock: FrameClock,
        autopilot: bool,
        ticks_run: u64,
        flies_eaten: u32,
        deaths: u32,
    }

    impl Game {
        fn new(state: GameState, autopilot: bool) -> Self {
            Self {
                state,
                clock: FrameClock::new(),
                autopilot,
                ticks_run: 0,
                flies_eaten: 0,
                deaths: 0,
            }
        }

        /// Run simulation ticks for one host frame
        fn update(&mut self, elapsed: f32, budget: u64) {
            let steps = self.clock.advance(elapsed);
            for _ in 0..steps {
                if self.ticks_run >= budget {
                    return;
                }
                let keys = if self.autopilot {
                    autopilot::drive(&self.state)
                } else {
                    KeySet::new()
                };
                tick(&mut self.state, &TickInput::keys(keys));
                self.ticks_run += 1;
                self.report_events();
            }
        }

        fn report_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::FlyCaught { .. } => self.flies_eaten += 1,
                    GameEvent::FrogDied { lives_left } => {
                        self.deaths += 1;
                        log::info!("tick {}: splash, {} lives left", self.ticks_run, lives_left);
                    }
                    GameEvent::GameOver { final_score } => {
                        log::info!("tick {}: game over with {}", self.ticks_run, final_score);
                    }
                    other => log::trace!("tick {}: {:?}", self.ticks_run, other),
                }
            }
        }
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let cli = Cli::parse();

        let settings = match &cli.settings {
            Some(path) => Settings::load(path).context("loading settings")?,
            None => Settings::default(),
        };
        let mut tuning = match &cli.tuning {
            Some(path) => Tuning::load(path).context("loading tuning")?,
            None => Tuning::default(),
        };
        settings.apply(&mut tuning);

        let seed = cli.seed.or(settings.seed).unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });
        log::info!("Frog Leap (headless) seed {} quality {}", seed, settings.quality.as_str());

        let mut state = GameState::new(seed, tuning);
        state.set_bounds(cli.width, cli.height);
        tick(&mut state, &TickInput::command(Command::Start));

        let mut game = Game::new(state, !cli.manual);
        while game.ticks_run < cli.ticks && game.state.phase == GamePhase::Playing {
            game.update(SIM_DT, cli.ticks);
        }

        let state = &game.state;
        println!("seed:        {}", seed);
        println!("ticks:       {}", game.ticks_run);
        println!("phase:       {:?}", state.phase);
        println!("score:       {}", state.score);
        println!("lives:       {}", state.lives);
        println!("flies eaten: {}", game.flies_eaten);
        println!("deaths:      {}", game.deaths);
        println!("scroll:      {:.3}", state.scroll_speed);
        if game.clock.dropped_ticks() > 0 {
            println!("dropped:     {}", game.clock.dropped_ticks());
        }

        if cli.dump_snapshot {
            let snapshot = RenderSnapshot::capture(state);
            let json =
                serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
            println!("{json}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a web host; there is no binary entry point
}
