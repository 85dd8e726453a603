mod analysis;
mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod view;

use anyhow::{Context, anyhow};
use app::ClimateDebtApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Everything that can make the table unusable fails here, before a
    // window exists.
    let config = DashboardConfig::load_or_default()?;
    let dataset = data::loader::load_file(&config.data_path)
        .with_context(|| format!("cannot start without {}", config.data_path.display()))
        .inspect_err(|e| log::error!("{e:#}"))?;
    let state = AppState::new(config, dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Climate Debt Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(ClimateDebtApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
