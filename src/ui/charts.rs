use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::ColorMap;
use crate::data::aggregate::CategoryCount;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Category bar charts (central panel)
// ---------------------------------------------------------------------------

/// Reports per country, one coloured bar per country.
pub fn country_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("CSRD Reports by Country");
    category_chart(
        ui,
        "country_chart",
        "Country",
        &state.view.country_counts,
        &state.country_colors,
    );
}

/// Distribution of the filtered reports over industries.
pub fn industry_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("CSRD Reports by Industry");
    category_chart(
        ui,
        "industry_chart",
        "Industry",
        &state.view.industry_counts,
        &state.industry_colors,
    );
}

/// One single-bar series per category so the legend names each category.
/// An empty count list draws an empty plot.
fn category_chart(
    ui: &mut Ui,
    id: &str,
    axis_label: &str,
    counts: &[CategoryCount],
    colors: &ColorMap,
) {
    let empty = counts.is_empty();

    let response = Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(axis_label)
        .y_axis_label("Reports")
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            for (i, category) in counts.iter().enumerate() {
                let color = colors.color_for(&category.label);
                let bar = Bar::new(i as f64, category.count as f64)
                    .name(&category.label)
                    .fill(color)
                    .width(0.7);
                let chart = BarChart::new(vec![bar]).name(&category.label).color(color);
                plot_ui.bar_chart(chart);
            }
        })
        .response;

    if empty {
        ui.painter().text(
            response.rect.center(),
            Align2::CENTER_CENTER,
            "No reports match the current filters",
            eframe::egui::FontId::proportional(14.0),
            Color32::GRAY,
        );
    }
}

/// Placeholder shown before a source loaded (or after it failed to).
pub fn empty_dashboard(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
        Some(msg) => {
            ui.heading(RichText::new(msg.as_str()).color(Color32::RED));
        }
        None => {
            ui.heading("Open a report spreadsheet to begin  (File → Open…)");
        }
    });
}
