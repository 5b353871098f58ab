mod app;
mod color;
mod config;
mod data;
mod error;
mod report;
mod state;
mod ui;

use app::CsrdDashboardApp;
use clap::Parser;
use config::{Args, LoadOptions};
use data::cache::DatasetCache;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let args = Args::parse();
    log::debug!("Starting with {args:?}");

    // A missing default workbook is not fatal: the UI shows the error and
    // the user can open another file.
    let mut state = AppState::new(DatasetCache::new(LoadOptions::from(&args)));
    state.open(&args.source);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        report::html::PAGE_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(CsrdDashboardApp::new(state)))),
    )
}
