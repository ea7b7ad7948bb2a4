//! Sprite Director headless driver.
//!
//! Plays the role of a host game loop: it owns the ECS world, feeds a fixed
//! frame delta to the tracking callbacks, and scripts sprite velocities from a
//! scenario file (or a seeded random walk). Events and frame changes are
//! reported through the log.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --scenario demos/hero.json
//! cargo run --release -- --walkers 8 --seed 42
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;

use spritedirector::game::setup_world;
use spritedirector::resources::trackingconfig::TrackingConfig;
use spritedirector::scenario::Scenario;

/// Sprite Director
#[derive(Parser)]
#[command(
    version,
    about = "Headless driver for sprite movement events and frame animation."
)]
struct Cli {
    /// Scenario JSON to replay. Without it a random walk is generated.
    #[arg(long, value_name = "PATH")]
    scenario: Option<PathBuf>,

    /// Tracking configuration INI file.
    #[arg(long, value_name = "PATH", default_value = "./tracking.ini")]
    config: PathBuf,

    /// Override the number of frames to run.
    #[arg(long)]
    frames: Option<u32>,

    /// Override the frame delta in milliseconds.
    #[arg(long)]
    frame_ms: Option<f32>,

    /// Sprites in the random walk.
    #[arg(long, default_value_t = 4)]
    walkers: u32,

    /// Seed for the random walk.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = TrackingConfig::with_path(&cli.config);
    config.load_from_file().ok(); // ignore errors, use defaults

    let mut scenario = match &cli.scenario {
        Some(path) => match Scenario::load_from_file(path) {
            Ok(scenario) => scenario,
            Err(e) => {
                eprintln!("Error loading scenario {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => {
            let seed = cli.seed.unwrap_or_else(|| fastrand::u64(..));
            log::info!("Random walk with {} walkers, seed {}", cli.walkers, seed);
            Scenario::random_walk(
                cli.walkers,
                seed,
                cli.frames.unwrap_or(600),
                cli.frame_ms.unwrap_or(16.0),
            )
        }
    };
    if let Some(frames) = cli.frames {
        scenario.frames = frames;
    }
    if let Some(frame_ms) = cli.frame_ms {
        scenario.frame_ms = frame_ms;
    }

    let mut world = World::new();
    setup_world(&mut world, config);

    match scenario.run(&mut world) {
        Ok(reports) => {
            for report in reports {
                let event = report
                    .latest_event
                    .map_or_else(|| "-".to_string(), |e| e.to_string());
                println!(
                    "{:<12} {:<14} {:<16} {}",
                    report.name,
                    event,
                    report.image.as_deref().unwrap_or("-"),
                    if report.destroyed { "destroyed" } else { "alive" }
                );
            }
        }
        Err(e) => {
            log::error!("Frame loop aborted: {}", e);
            std::process::exit(1);
        }
    }
}
