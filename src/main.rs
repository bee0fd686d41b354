mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::CordExplorerApp;
use clap::Parser;
use data::loader::{self, DEFAULT_DATA_PATH};
use eframe::egui;
use state::AppState;

/// CORD-19 Data Explorer - browse research paper metadata by year and journal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the metadata CSV
    #[arg(long, env = "CORD_EXPLORER_DATA", default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    // Loaded once, before the window opens; the app only ever reads it.
    let state = AppState::new(&cli.data, loader::shared(&cli.data));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CORD-19 Data Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(CordExplorerApp::new(state)))),
    )
}
