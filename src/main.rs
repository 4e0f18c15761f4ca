mod app;
mod color;
mod config;
mod data;
mod format;
mod geo;
mod state;
mod ui;

use std::path::PathBuf;

use app::Co2DashboardApp;
use clap::Parser;
use eframe::egui;

use config::DashboardConfig;
use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "co2-dashboard", version, about = "Historical CO₂ emissions dashboard")]
struct Cli {
    /// Emissions table (.csv, .json or .parquet)
    #[arg(long, default_value = "data/co2_emissions_1940_clean.csv")]
    data: PathBuf,

    /// World boundaries as a GeoJSON FeatureCollection
    #[arg(long)]
    geo: Option<PathBuf>,

    /// TOML file overriding the built-in dashboard settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let config = match DashboardConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(2);
        }
    };

    let mut state = AppState::new(config);
    if let Some(path) = &cli.geo {
        match geo::load_geography(path) {
            Ok(geography) => state.geography = Some(geography),
            Err(e) => log::error!("Map disabled: {e}"),
        }
    }
    state.start_load(cli.data);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CO₂ Emissions Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(Co2DashboardApp::new(state)))),
    )
}
