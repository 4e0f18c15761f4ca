use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color;
use crate::data::bloc::BlocSeries;
use crate::data::ranking::{RankedEntity, ranking_axis_max};
use crate::data::timeseries::TimeSeries;
use crate::format::{short_tons, tooltip_tons};

const CHART_HEIGHT: f32 = 350.0;

/// Placeholder shown instead of a chart with nothing to draw.
pub fn no_data(ui: &mut Ui, hint: &str) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(hint).italics().weak());
    });
    ui.add_space(40.0);
}

/// Label for an integer bar position, empty between bars.
fn label_at(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Emissions over time (line chart)
// ---------------------------------------------------------------------------

pub fn emissions_chart(ui: &mut Ui, ts: &TimeSeries) {
    ui.heading("CO₂ emissions over time");
    if ts.is_empty() {
        no_data(ui, "Select countries in the filters to see their emissions over time");
        return;
    }
    ui.label(RichText::new("Fixed scale for comparison between countries").small());

    let n = ts.entities.len();
    Plot::new("emissions_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Emissions (t)")
        .include_y(0.0)
        .include_y(ts.y_max)
        .y_axis_formatter(|mark, _range| short_tons(mark.value))
        .label_formatter(|name, point| {
            let year = point.x.round();
            if name.is_empty() {
                format!("Year: {year}")
            } else {
                format!("{name}\nYear: {year}\n{}", tooltip_tons(point.y))
            }
        })
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, entity) in ts.entities.iter().enumerate() {
                let points: PlotPoints = ts.series_for(entity).into();
                plot_ui.line(
                    Line::new(points)
                        .name(entity)
                        .color(color::series_color(i, n))
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Rankings (bar charts)
// ---------------------------------------------------------------------------

/// Top entities of the filtered subset, vertical bars.
pub fn comparison_chart(ui: &mut Ui, ranking: &[RankedEntity], top_n: usize) {
    ui.heading("Comparison by country / region");
    if ranking.is_empty() {
        no_data(ui, "Select countries and adjust the filters to compare them");
        return;
    }
    ui.label(RichText::new(format!("Top {top_n} by total emissions in the selected period")).small());

    let labels: Vec<String> = ranking.iter().map(|r| r.label.clone()).collect();
    let bars: Vec<Bar> = ranking
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.total)
                .name(&r.entity)
                .width(0.6)
                .fill(color::COMPARISON_BAR)
        })
        .collect();
    let chart = BarChart::new(bars)
        .name("Total emissions")
        .color(color::COMPARISON_BAR)
        .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
            format!("{}\n{}", bar.name, tooltip_tons(bar.value))
        }));

    Plot::new("comparison_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .include_y(0.0)
        .include_y(ranking_axis_max(ranking))
        .x_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
        .y_axis_formatter(|mark, _range| short_tons(mark.value))
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Historical top countries, horizontal bars in billions of tons.
pub fn top_countries_chart(ui: &mut Ui, ranking: &[RankedEntity], top_n: usize) {
    ui.heading(format!("Top {top_n} countries, all years"));
    if ranking.is_empty() {
        no_data(ui, "No country data to show");
        return;
    }
    ui.label(
        RichText::new("Countries with the largest cumulative emissions (regions excluded)")
            .small(),
    );

    // Largest at the top: the first entry gets the highest position.
    let n = ranking.len();
    let position = move |i: usize| (n - 1 - i) as f64;

    let labels: Vec<String> = (0..n).map(|pos| ranking[n - 1 - pos].label.clone()).collect();
    let raw_totals: Vec<f64> = ranking.iter().map(|r| r.total).collect();

    let bars: Vec<Bar> = ranking
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(position(i), r.total_billions())
                .name(&r.entity)
                .width(0.7)
                .fill(color::HISTORICAL_BAR)
        })
        .collect();
    let chart = BarChart::new(bars)
        .name("Total emissions")
        .color(color::HISTORICAL_BAR)
        .horizontal()
        .element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
            let raw = (n - 1)
                .checked_sub(bar.argument.round() as usize)
                .and_then(|i| raw_totals.get(i).copied())
                .unwrap_or(bar.value * 1e9);
            format!("{}\n{:.2}B ton", bar.name, raw / 1e9)
        }));

    Plot::new("top_countries_plot")
        .height(CHART_HEIGHT + 50.0)
        .legend(Legend::default())
        .x_axis_label("Billions of tons")
        .include_x(0.0)
        .y_axis_formatter(move |mark, _range| label_at(&labels, mark.value))
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Bloc vs rest of world (stacked area)
// ---------------------------------------------------------------------------

pub fn bloc_chart(ui: &mut Ui, series: &BlocSeries) {
    let bloc_name = series.name.as_str();
    ui.heading(format!("{bloc_name} vs rest of the world"));
    if series.is_empty() {
        no_data(ui, "Select countries in the filters to compare them with the bloc");
        return;
    }
    let Some(shares) = series.shares.as_ref() else {
        no_data(ui, "Not enough data to build this chart");
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(format!("{bloc_name}:")).color(color::BLOC).strong());
        ui.label(format!("{:.0}M ton ({:.1}%)", shares.bloc_total, shares.bloc_pct));
        ui.separator();
        ui.label(RichText::new("Rest:").color(color::REST).strong());
        ui.label(format!("{:.0}M ton ({:.1}%)", shares.rest_total, shares.rest_pct));
    });

    let bloc_points: Vec<[f64; 2]> = series
        .points
        .iter()
        .map(|p| [p.year as f64, p.bloc])
        .collect();
    // Rest is stacked on top of the bloc.
    let stacked_points: Vec<[f64; 2]> = series
        .points
        .iter()
        .map(|p| [p.year as f64, p.bloc + p.rest])
        .collect();

    let rest_name = "Rest of the world".to_string();
    let bloc_label = format!("{bloc_name} countries");
    Plot::new("bloc_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Emissions (million t)")
        .include_y(0.0)
        .label_formatter(|name, point| {
            if name.is_empty() {
                format!("Year: {}", point.x.round())
            } else {
                format!("{name}\nYear: {}\n{:.2}M ton", point.x.round(), point.y)
            }
        })
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(stacked_points))
                    .name(&rest_name)
                    .color(color::REST)
                    .fill(0.0_f32),
            );
            plot_ui.line(
                Line::new(PlotPoints::from(bloc_points))
                    .name(&bloc_label)
                    .color(color::BLOC)
                    .fill(0.0_f32),
            );
        });
}
