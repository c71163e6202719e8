//! HandCloud - hand-driven particle cloud
//!
//! Headless runner: builds the particle scene and the configured distance
//! source, then drives the frame loop and writes snapshots or stats.

#![warn(missing_docs)]

mod app;
mod cli;
mod config;
mod logging_setup;
mod renderer;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::app::App;
use crate::cli::Args;
use crate::config::AppConfig;

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(AppConfig::default_path);
    let mut config = match &config_path {
        Some(path) => AppConfig::load_or_default(path)?,
        None => AppConfig::default(),
    };

    let _log_guard = logging_setup::init(&config.logging)?;

    info!("==========================================");
    info!("===      HandCloud Session Started     ===");
    info!("==========================================");
    if let Some(path) = &config_path {
        info!("Config: {}", path.display());
    }

    config.apply_args(&args);

    let mut app = App::new(&config)?;
    let report = app.run();

    info!(
        "Finished {} after {} frames (distance {:.2}, scale {:.2}, {} snapshots)",
        app.controller().shape(),
        report.frames,
        report.final_distance,
        report.final_scale,
        report.snapshots
    );
    info!("Source: {}", app.router().status());
    Ok(())
}
