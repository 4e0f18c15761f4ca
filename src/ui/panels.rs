use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{entities_with_initial, initial_letters};
use crate::data::model::EntityTypeSelector;
use crate::geo::load_geography;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Edits go to the draft selection; nothing is
/// recomputed until "Apply" is pressed.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    let entities = state.dataset.entities().to_vec();
    let letters = initial_letters(&entities);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Countries / regions ----
            ui.strong("Countries / regions");
            let letter = state.letter.or_else(|| letters.first().copied());
            let group = letter
                .map(|l| entities_with_initial(&entities, l))
                .unwrap_or_default();

            ui.horizontal(|ui: &mut Ui| {
                ui.label("Initial letter:");
                egui::ComboBox::from_id_salt("initial_letter")
                    .selected_text(letter.map(String::from).unwrap_or_default())
                    .width(50.0)
                    .show_ui(ui, |ui: &mut Ui| {
                        for &l in &letters {
                            ui.selectable_value(&mut state.letter, Some(l), l.to_string());
                        }
                    });
                ui.label(format!("({} names)", group.len()));
            });

            let all_selected = !group.is_empty()
                && group
                    .iter()
                    .all(|e| state.filters.draft.entities.contains(e));
            let group_label = if all_selected { "Deselect all" } else { "Select all" };
            if ui.small_button(group_label).clicked() {
                state.filters.toggle_group(&group);
            }

            ScrollArea::vertical()
                .id_salt("entity_list")
                .max_height(220.0)
                .show(ui, |ui: &mut Ui| {
                    for entity in &group {
                        let mut checked = state.filters.draft.entities.contains(entity);
                        let text = if checked {
                            RichText::new(entity).strong()
                        } else {
                            RichText::new(entity)
                        };
                        if ui.checkbox(&mut checked, text).changed() {
                            state.filters.toggle_entity(entity);
                        }
                    }
                });

            ui.horizontal(|ui: &mut Ui| {
                ui.label(format!("Selected: {}", state.filters.draft.entities.len()));
                if !state.filters.draft.entities.is_empty() && ui.small_button("Clear").clicked()
                {
                    state.filters.clear_entities();
                }
            });
            ui.separator();

            // ---- Year range ----
            ui.strong("Year range");
            let (min_year, max_year) = (state.config.filters.year_from, state.config.filters.year_to);
            let mut lo = state.filters.draft.years.lo;
            let mut hi = state.filters.draft.years.hi;
            if ui
                .add(egui::Slider::new(&mut lo, min_year..=max_year).text("from"))
                .changed()
            {
                state.filters.set_year_lo(lo);
            }
            if ui
                .add(egui::Slider::new(&mut hi, min_year..=max_year).text("to"))
                .changed()
            {
                state.filters.set_year_hi(hi);
            }
            ui.label(format!("Showing data from {lo} to {hi}"));
            if lo > hi {
                ui.label(RichText::new("Start year is after end year").color(Color32::YELLOW));
            }
            ui.separator();

            // ---- Entity type ----
            ui.strong("Entity type");
            let mut selector = state.filters.draft.entity_type.clone();
            egui::ComboBox::from_id_salt("entity_type")
                .selected_text(selector.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut selector, EntityTypeSelector::All, "All types");
                    for ty in state.dataset.entity_types() {
                        let option = EntityTypeSelector::Only(ty.clone());
                        let label = option.to_string();
                        ui.selectable_value(&mut selector, option, label);
                    }
                });
            if selector != state.filters.draft.entity_type {
                state.filters.set_entity_type(selector);
            }
            ui.separator();

            // ---- Actions ----
            ui.horizontal(|ui: &mut Ui| {
                let apply = egui::Button::new(RichText::new("Apply filters").strong());
                if ui.add_enabled(state.filters.is_dirty(), apply).clicked() {
                    state.apply_filters();
                }
                if ui.button("Reset").clicked() {
                    state.reset_filters();
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data…").clicked() {
                open_data_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open geography…").clicked() {
                open_geography_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label("Loading CO₂ data…");
        } else if !state.dataset.is_empty() {
            ui.label(format!(
                "{} records loaded, {} match the filters",
                state.dataset.len(),
                state.views.subset.len()
            ));
        }

        if state.filters.is_dirty() {
            ui.separator();
            ui.label(RichText::new("Unapplied filter changes").color(Color32::YELLOW));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_data_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CO₂ emissions data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.start_load(path);
    }
}

pub fn open_geography_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open world boundaries")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file();

    if let Some(path) = file {
        match load_geography(&path) {
            Ok(geo) => {
                state.geography = Some(geo);
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load geography: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
