// Doxmap TUI
// Interactive keymap simulator for the anydoby ErgoDox EZ layout

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use doxmap_core::Settings;

#[path = "../tui/mod.rs"]
mod tui;

/// Interactive anydoby keymap simulator
#[derive(Parser, Debug)]
#[command(name = "doxmap-tui")]
#[command(version)]
#[command(about = "Step through the anydoby ErgoDox EZ keymap in a terminal UI", long_about = None)]
struct Args {
    /// TOML settings file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The alternate screen owns stdout, so only warnings go to stderr
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let settings = match &args.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::load_default().context("loading default settings")?,
    };

    tui::run(&settings).context("terminal UI failed")?;
    Ok(())
}
