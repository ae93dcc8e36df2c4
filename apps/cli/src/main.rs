#![deny(warnings)]

//! Headless driver: replays placement and purchase commands against a saved game.

mod commands;
mod surfaces;

use anyhow::{Context, Result};
use dispatch_core::{Catalog, GameConfig};
use dispatch_runtime::{GameStore, Orchestrator};
use persistence::{FileStore, PersistenceAdapter};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use surfaces::{ConsoleDisplay, ConsoleMap};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    data_dir: PathBuf,
    script: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args {
        config: None,
        data_dir: PathBuf::from("saves"),
        script: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = it.next().map(PathBuf::from),
            "--data-dir" => {
                if let Some(dir) = it.next() {
                    args.data_dir = PathBuf::from(dir);
                }
            }
            "--script" => args.script = it.next().map(PathBuf::from),
            _ => {}
        }
    }
    args
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::DEBUG)
        .with_writer(io::stderr)
        .init();

    let args = parse_args();
    info!(?args, "starting CLI");

    let config = match &args.config {
        Some(path) => GameConfig::load_from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    let store = FileStore::open(&args.data_dir)
        .with_context(|| format!("opening save directory {}", args.data_dir.display()))?;
    let adapter = PersistenceAdapter::with_config(store, &config);
    let game = GameStore::open(Catalog::standard(), adapter, &config);
    let mut orchestrator = Orchestrator::new(game, ConsoleMap::default(), ConsoleDisplay);
    orchestrator.restore();

    let summary = match &args.script {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening script {}", path.display()))?;
            commands::run_session(&mut orchestrator, BufReader::new(file))?
        }
        None => commands::run_session(&mut orchestrator, io::stdin().lock())?,
    };

    let store = orchestrator.store();
    info!(
        executed = summary.executed,
        rejected = summary.rejected,
        invalid = summary.invalid,
        "session finished"
    );
    println!(
        "Session OK | budget: ${} | buildings: {} | vehicles: {}",
        store.budget(),
        store.buildings().len(),
        store.vehicles().len()
    );
    Ok(())
}
