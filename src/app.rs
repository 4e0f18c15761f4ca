use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, map, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct Co2DashboardApp {
    pub state: AppState,
}

impl Co2DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for Co2DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.loading && !self.state.poll_load() {
            // Keep polling the loader thread while the UI is idle.
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.loading && self.state.dataset.is_empty() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Loading CO₂ data…  please wait");
                });
                return;
            }
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state));
        });
    }
}

/// All charts, two per row, then the full-width map.
fn dashboard(ui: &mut Ui, state: &mut AppState) {
    let ranking = &state.config.ranking;
    ui.columns(2, |cols: &mut [Ui]| {
        charts::emissions_chart(&mut cols[0], &state.views.time_series);
        charts::comparison_chart(&mut cols[1], &state.views.comparison, ranking.comparison_top_n);
    });
    ui.separator();

    ui.columns(2, |cols: &mut [Ui]| {
        charts::top_countries_chart(&mut cols[0], &state.views.historical, ranking.historical_top_n);
        charts::bloc_chart(&mut cols[1], &state.views.bloc);
    });
    ui.separator();

    table::data_table(ui, state);
    ui.separator();

    map::world_map(ui, state);
}
