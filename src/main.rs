//! Brick Breaker headless runner
//!
//! Loads (or generates) a stage and plays it on autopilot until the field is
//! cleared or the last ball is lost. Exit code 0 means cleared, 1 means the
//! last ball was lost and 3 means the tick limit stopped the run.
//!
//! ```text
//! brick-breaker [STAGE_FILE] [--catalog FILE] [--config FILE] [--seed N] [--realtime]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use brick_breaker::render::{HeadlessSurface, SurfaceSync};
use brick_breaker::sim::{GameEvent, GamePhase, Simulation, TickInput};
use brick_breaker::{BlockCatalog, GameConfig, Stage};

/// Play a brick breaker stage headlessly on autopilot
#[derive(Debug, Parser)]
#[command(name = "brick-breaker", version, about)]
struct Args {
    /// Stage file to play; a stage is generated from the seed when omitted
    stage: Option<PathBuf>,
    /// Block catalog mapping stage keys to block types
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,
    /// JSON game configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Seed for stage generation, overrides the config
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Sleep one tick interval between ticks
    #[arg(long)]
    realtime: bool,
}

fn load_config(args: &Args) -> GameConfig {
    let mut config = match &args.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Ignoring config {}: {err}", path.display());
                GameConfig::default()
            }
        },
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config
}

fn load_stage(args: &Args, config: &GameConfig) -> Result<Stage> {
    let catalog = match &args.catalog {
        Some(path) => BlockCatalog::load(path)
            .with_context(|| format!("loading block catalog {}", path.display()))?,
        None => BlockCatalog::default(),
    };
    match &args.stage {
        Some(path) => {
            Stage::load(path, &catalog).with_context(|| format!("loading stage {}", path.display()))
        }
        None => {
            log::info!("No stage file given, generating one from seed {}", config.seed);
            Ok(Stage::generate(
                format!("generated-{}", config.seed),
                config.seed,
                config.generated_rows,
                config.generated_cols,
            ))
        }
    }
}

/// How a run ended
enum Outcome {
    Finished(GamePhase),
    /// Stopped by `max_ticks` before the game ended on its own
    TimedOut,
}

fn run() -> Result<Outcome> {
    let args = Args::parse();
    let config = load_config(&args);
    let stage = load_stage(&args, &config)?;

    let mut sim = Simulation::new(&stage, config.width, config.height);
    let mut surface = HeadlessSurface::new();
    let mut sync = SurfaceSync::new();
    sync.sync(sim.world(), &mut surface);

    let input = TickInput {
        autopilot: config.autopilot,
        ..Default::default()
    };

    let mut timed_out = false;
    sim.start();
    while !sim.phase().is_terminal() {
        if sim.ticks() >= config.max_ticks {
            log::warn!("Tick limit {} reached, stopping", config.max_ticks);
            sim.stop();
            timed_out = true;
            break;
        }
        sim.tick(&input);
        sync.sync(sim.world(), &mut surface);

        for event in sim.drain_events() {
            match event {
                GameEvent::BlockDestroyed { kind, .. } => {
                    log::debug!("{} destroyed (score {})", kind.type_name(), sim.score())
                }
                GameEvent::PhaseChanged { .. } => {}
                other => log::trace!("{other:?}"),
            }
        }

        if args.realtime {
            std::thread::sleep(config.tick_interval());
        }
    }

    let result = if timed_out {
        "stopped at tick limit"
    } else {
        sim.phase().as_str()
    };
    log::info!(
        "Stage {} finished: {} after {} ticks, score {} ({} shapes created, {} deleted)",
        stage.name,
        result,
        sim.ticks(),
        sim.score(),
        surface.stats.created,
        surface.stats.deleted
    );
    Ok(if timed_out {
        Outcome::TimedOut
    } else {
        Outcome::Finished(sim.phase())
    })
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brick Breaker (headless) starting...");

    match run() {
        Ok(Outcome::Finished(GamePhase::Cleared)) => ExitCode::SUCCESS,
        Ok(Outcome::Finished(_)) => ExitCode::from(1),
        Ok(Outcome::TimedOut) => ExitCode::from(3),
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(2)
        }
    }
}
