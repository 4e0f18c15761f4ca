use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::table::{SortKey, page_window};
use crate::format::grouped;
use crate::state::AppState;
use crate::ui::charts::no_data;

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Sortable, paginated data table
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data table");
    if state.views.subset.is_empty() {
        no_data(ui, "No rows match the current filters");
        return;
    }

    let page = state.table.page_of(&state.views.subset);

    // ---- Controls ----
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Rows per page:");
        let current = state.table.page_size;
        egui::ComboBox::from_id_salt("rows_per_page")
            .selected_text(current.to_string())
            .width(60.0)
            .show_ui(ui, |ui: &mut Ui| {
                for &size in &state.config.table.page_sizes {
                    if ui.selectable_label(current == size, size.to_string()).clicked() {
                        state.table.set_page_size(size);
                    }
                }
            });
        ui.separator();
        ui.label(format!(
            "Showing {} of {} rows",
            page.rows.len(),
            page.total_rows
        ));
    });

    // ---- Table ----
    let mut clicked: Option<SortKey> = None;
    let sort_key = state.table.sort_key;
    let descending = state.table.descending;

    TableBuilder::new(ui)
        .id_salt("data_table")
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::remainder().at_least(140.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(80.0))
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for key in SortKey::ALL {
                header.col(|ui: &mut Ui| {
                    let icon = if key != sort_key {
                        "↕"
                    } else if descending {
                        "⬇"
                    } else {
                        "⬆"
                    };
                    if ui
                        .button(RichText::new(format!("{} {icon}", key.title())).strong())
                        .clicked()
                    {
                        clicked = Some(key);
                    }
                });
            }
        })
        .body(|mut body| {
            for rec in &page.rows {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(&rec.entity);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(rec.year.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(grouped(rec.annual_co2_emissions));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&rec.tipo_entidad);
                    });
                });
            }
        });

    if let Some(key) = clicked {
        state.table.toggle_sort(key);
    }

    // ---- Pagination ----
    if page.total_pages > 1 {
        ui.horizontal(|ui: &mut Ui| {
            let first = page.page == 1;
            let last = page.page == page.total_pages;
            if ui.add_enabled(!first, egui::Button::new("⏮ First")).clicked() {
                state.table.set_page(1);
            }
            if ui.add_enabled(!first, egui::Button::new("◀ Previous")).clicked() {
                state.table.set_page(page.page - 1);
            }
            for n in page_window(page.page, page.total_pages) {
                if ui.selectable_label(n == page.page, n.to_string()).clicked() {
                    state.table.set_page(n);
                }
            }
            if ui.add_enabled(!last, egui::Button::new("Next ▶")).clicked() {
                state.table.set_page(page.page + 1);
            }
            if ui.add_enabled(!last, egui::Button::new("Last ⏭")).clicked() {
                state.table.set_page(page.total_pages);
            }
        });
    }
}
