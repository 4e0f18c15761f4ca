use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Line, Plot, PlotPoints, Polygon};

use crate::color;
use crate::data::snapshot::available_years;
use crate::format::{grouped, short_tons};
use crate::geo::data_name;
use crate::state::AppState;
use crate::ui::charts::no_data;

const MAP_HEIGHT: f32 = 520.0;

// ---------------------------------------------------------------------------
// Choropleth world map
// ---------------------------------------------------------------------------

pub fn world_map(ui: &mut Ui, state: &mut AppState) {
    let mut reset_view = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("World map of CO₂ emissions");
        ui.separator();
        ui.label("Year:");
        let mut year = state.map_year;
        egui::ComboBox::from_id_salt("map_year")
            .selected_text(year.to_string())
            .height(300.0)
            .show_ui(ui, |ui: &mut Ui| {
                for y in available_years(&state.dataset) {
                    ui.selectable_value(&mut year, y, y.to_string());
                }
            });
        state.set_map_year(year);
        if ui.small_button("Reset view").clicked() {
            reset_view = true;
        }
        if let Some(scale) = &state.views.snapshot.scale {
            let (lo, hi) = scale.domain();
            ui.separator();
            ui.label(format!("log scale {} – {} t", short_tons(lo), short_tons(hi)));
        }
    });

    let Some(geo) = &state.geography else {
        no_data(ui, "No geography loaded (start with --geo <world.geojson>)");
        return;
    };
    if state.views.snapshot.is_empty() {
        ui.label(RichText::new("No country data for this year").italics().weak());
    }

    let snapshot = &state.views.snapshot;
    let aliases = &state.config.map.aliases;
    let border = Stroke::new(0.5, Color32::WHITE);

    let mut plot = Plot::new("world_map")
        .height(MAP_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_boxed_zoom(false);
    if reset_view {
        plot = plot.reset();
    }

    let response = plot.show(ui, |plot_ui| {
        let hovered = plot_ui
            .pointer_coordinate()
            .and_then(|p| geo.hit_test([p.x, p.y]));

        for shape in &geo.shapes {
            let entity = data_name(&shape.name, aliases);
            let fill = if hovered.is_some_and(|h| std::ptr::eq(h, shape)) {
                color::HOVER
            } else {
                color::map_fill(snapshot.intensity(entity))
            };
            // Fill per triangle, outline per ring.
            for tri in &shape.triangles {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(tri.to_vec()))
                        .fill_color(fill)
                        .stroke(Stroke::new(0.5, fill)),
                );
            }
            for ring in &shape.rings {
                plot_ui.line(
                    Line::new(PlotPoints::from(ring.clone()))
                        .color(border.color)
                        .width(border.width),
                );
            }
        }
        hovered
    });

    if let Some(shape) = response.inner {
        let entity = data_name(&shape.name, aliases);
        let value = snapshot
            .value(entity)
            .map(|v| format!("{} t CO₂", grouped(v)))
            .unwrap_or_else(|| "no data".to_string());
        let title = match &shape.iso_a2 {
            Some(code) => format!("{} ({code})", shape.name),
            None => shape.name.clone(),
        };
        response
            .response
            .on_hover_text_at_pointer(format!("{title}\n{value}"));
    }

    ui.label(RichText::new("Darker colours = higher emissions; grey = no data").small());
}
