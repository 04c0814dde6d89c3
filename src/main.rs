mod app;
mod color;
mod data;
mod state;
mod ui;
mod views;

use std::path::PathBuf;

use app::FundingApp;
use clap::Parser;
use eframe::egui;
use state::AppState;

/// Startup funding analysis dashboard.
#[derive(Debug, Parser)]
#[command(name = "funding-dashboard", version, about)]
struct Args {
    /// Funding dataset to open at startup (.csv, .json or .parquet).
    path: Option<PathBuf>,

    /// Number of entries in the top-N rankings.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    top: u16,

    /// Currency unit label shown after amounts.
    #[arg(long, default_value = "Cr")]
    unit: String,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let mut state = AppState::new(usize::from(args.top), args.unit);
    if let Some(path) = &args.path {
        state.open(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Startup Funding Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(FundingApp::new(state)))),
    )
}
