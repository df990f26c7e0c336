//! Tile Bomber entry point
//!
//! Headless runner: loads tuning, layout and sprite sheets (or the built-in
//! defaults), generates a seeded level and plays a scripted input sequence
//! through the fixed-timestep loop, logging every game event.
//!
//! ```text
//! tile-bomber [--seed N] [--ticks N] [--tuning FILE] [--layout FILE] [--sheet FILE]...
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::path::PathBuf;

    use tile_bomber::Tuning;
    use tile_bomber::assets::{SpriteSheet, load_layout};
    use tile_bomber::consts::{MAX_SUBSTEPS, SIM_DT};
    use tile_bomber::platform::{Action, ScriptStep, ScriptedInput};
    use tile_bomber::renderer::{DrawList, render_frame};
    use tile_bomber::sim::{AnimationLibrary, BaseLayout, GameEvent, GameState, TickInput, tick};

    /// Simulated display refresh, deliberately not a multiple of the sim rate
    const FRAME_DT: f32 = 1.0 / 50.0;

    /// Command-line options
    #[derive(Debug)]
    pub struct Options {
        seed: u64,
        ticks: u64,
        tuning: Option<PathBuf>,
        layout: Option<PathBuf>,
        sheets: Vec<PathBuf>,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                seed: 12345,
                ticks: 900,
                tuning: None,
                layout: None,
                sheets: Vec::new(),
            }
        }
    }

    impl Options {
        pub fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
            let mut options = Self::default();
            while let Some(arg) = args.next() {
                let mut value = || args.next().ok_or_else(|| format!("{} needs a value", arg));
                match arg.as_str() {
                    "--seed" => {
                        let v = value()?;
                        options.seed = v.parse().map_err(|_| format!("bad seed '{}'", v))?;
                    }
                    "--ticks" => {
                        let v = value()?;
                        options.ticks = v.parse().map_err(|_| format!("bad tick count '{}'", v))?;
                    }
                    "--tuning" => options.tuning = Some(value()?.into()),
                    "--layout" => options.layout = Some(value()?.into()),
                    "--sheet" => options.sheets.push(value()?.into()),
                    other => return Err(format!("unknown argument '{}'", other)),
                }
            }
            Ok(options)
        }
    }

    /// Game instance driven by a frame clock
    struct Game {
        state: GameState,
        input: ScriptedInput,
        accumulator: f32,
        draws: DrawList,
        exit_requested: bool,
    }

    impl Game {
        fn new(state: GameState, input: ScriptedInput) -> Self {
            Self {
                state,
                input,
                accumulator: 0.0,
                draws: DrawList::default(),
                exit_requested: false,
            }
        }

        /// Run simulation ticks for one display frame, then draw it
        fn update(&mut self, dt: f32) -> Vec<GameEvent> {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut events = Vec::new();
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = TickInput::sample(&mut self.input);
                if input.exit {
                    self.exit_requested = true;
                    break;
                }
                events.extend(tick(&mut self.state, &input, SIM_DT));
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            self.draws.clear();
            render_frame(&self.state, &mut self.draws);
            events
        }
    }

    /// Walk out of the spawn corner, drop a bomb, retreat and wait it out
    fn demo_script() -> ScriptedInput {
        use Action::*;
        ScriptedInput::new(vec![
            ScriptStep::new(30, &[Right]),
            ScriptStep::new(1, &[PlaceBomb]),
            ScriptStep::new(30, &[Left]),
            ScriptStep::new(40, &[Down]),
            ScriptStep::new(240, &[]),
            ScriptStep::new(1, &[Pause]),
            ScriptStep::new(30, &[]),
            ScriptStep::new(1, &[Pause]),
            ScriptStep::new(60, &[Right]),
            ScriptStep::new(1, &[PlaceBomb]),
            ScriptStep::new(60, &[Left, Up]),
            ScriptStep::new(240, &[]),
            ScriptStep::new(1, &[Exit]),
        ])
    }

    fn load_state(options: &Options) -> Result<GameState, Box<dyn Error>> {
        let tuning = match &options.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let layout = match &options.layout {
            Some(path) => load_layout(path)?,
            None => {
                log::info!("No layout given, using the classic arena");
                BaseLayout::classic()
            }
        };

        let mut library = AnimationLibrary::new(tuning.animation.clone());
        for path in &options.sheets {
            SpriteSheet::load(path)?.apply_to(&mut library);
        }

        Ok(GameState::new(options.seed, tuning, layout, library)?)
    }

    pub fn run(options: Options) -> Result<(), Box<dyn Error>> {
        log::info!("Tile Bomber (headless) starting...");
        let state = load_state(&options)?;
        log::info!("Game initialized with seed: {}", options.seed);

        let mut game = Game::new(state, demo_script());
        while game.state.time_ticks < options.ticks && !game.state.is_over() && !game.exit_requested {
            for event in game.update(FRAME_DT) {
                log::info!("[tick {}] {:?}", game.state.time_ticks, event);
            }
        }

        let player = &game.state.players[0];
        log::info!(
            "Finished after {} ticks: phase {:?}, actor {:?} at tile {}, {} draw calls in the last frame",
            game.state.time_ticks,
            game.state.phase,
            player.state,
            game.state.world.tile_of(player.position),
            game.draws.len()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();

    let options = match native::Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(msg) => {
            log::error!("{}", msg);
            eprintln!("usage: tile-bomber [--seed N] [--ticks N] [--tuning FILE] [--layout FILE] [--sheet FILE]...");
            return std::process::ExitCode::FAILURE;
        }
    };

    match native::run(options) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library on the web; there is no headless runner
}
