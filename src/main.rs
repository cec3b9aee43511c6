//! CSV Viewer - browse dated CSV outputs
//!
//! Picks a date and a file from an output folder, previews it as a table
//! and offers the displayed data for download.

mod config;
mod data;
mod gui;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use config::AppConfig;
use data::ViewMode;
use eframe::egui;
use gui::ViewerApp;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Preferred columns with formatted performance figures
    Filtered,
    /// Whole file, downloaded unchanged
    PassThrough,
}

impl From<ModeArg> for ViewMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Filtered => ViewMode::Filtered,
            ModeArg::PassThrough => ViewMode::PassThrough,
        }
    }
}

/// Output CSV viewer.
#[derive(Parser)]
#[command(name = "csv_viewer", version, about)]
struct Cli {
    /// Folder holding *YYYY-MM-DD.csv files
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Presentation mode
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default(),
    }
    .with_overrides(cli.dir, cli.mode.map(ViewMode::from));
    info!("Starting with {:?}", config);

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("CSV Viewer"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "CSV Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
