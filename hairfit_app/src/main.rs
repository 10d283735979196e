//! hairfit command-line front end
//!
//! Headless driver for the placement core: inspect a mesh, bake a placement
//! into it, or replay a scripted interactive session through the frame loop.

mod commands;
mod replay;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hairfit_core::core::{ApplicationConfig, Config};
use hairfit_core::foundation::logging;

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG: &str = "hairfit.toml";

#[derive(Parser, Debug)]
#[command(name = "hairfit", version, about = "Place hair meshes on a head and bake the result")]
struct Cli {
    /// Configuration file (.toml or .ron)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, overrides the configured level (RUST_LOG still wins)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print mesh counts and bounds
    Inspect {
        /// Mesh file
        mesh: PathBuf,
    },

    /// Bake a placement into a mesh file
    Bake(commands::BakeArgs),

    /// Run a scripted session through the frame loop
    Replay {
        /// RON script of frames
        script: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ApplicationConfig> {
    let config = match path {
        Some(path) => ApplicationConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ApplicationConfig::load_or_default(DEFAULT_CONFIG)?,
    };
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    run(Cli::parse())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.engine.log_level);
    logging::init_with_level(level);
    log::debug!("Configuration: {config:?}");

    match cli.command {
        Command::Inspect { mesh } => commands::inspect(&mesh),
        Command::Bake(args) => commands::bake(&args).map(|_| ()),
        Command::Replay { script } => replay::run(config, &script),
    }
}
