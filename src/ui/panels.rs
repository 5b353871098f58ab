use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            country_filter(ui, state);
            industry_filter(ui, state);
            ui.separator();
            date_filter(ui, state);
            ui.separator();

            let reset = ui.add_enabled(state.filters.is_active(), egui::Button::new("Reset Filters"));
            if reset.clicked() {
                state.reset_filters();
            }
        });
}

fn country_filter(ui: &mut Ui, state: &mut AppState) {
    let header = format!(
        "Country  ({}/{})",
        state.filters.countries.len(),
        state.options.countries.len()
    );
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("country_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_countries();
                }
                if ui.small_button("None").clicked() {
                    state.clear_countries();
                }
            });

            let mut toggled = None;
            for country in &state.options.countries {
                let mut checked = state.filters.countries.contains(country);
                let text = RichText::new(country.as_str()).color(state.country_colors.color_for(country));
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(country.clone());
                }
            }
            if let Some(country) = toggled {
                state.toggle_country(&country);
            }
        });
}

fn industry_filter(ui: &mut Ui, state: &mut AppState) {
    let header = format!(
        "Industry (SASB SICS)  ({}/{})",
        state.filters.industries.len(),
        state.options.industries.len()
    );
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt("industry_filter")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_industries();
                }
                if ui.small_button("None").clicked() {
                    state.clear_industries();
                }
            });

            let mut toggled = None;
            for industry in &state.options.industries {
                let mut checked = state.filters.industries.contains(industry);
                if ui.checkbox(&mut checked, industry.as_str()).changed() {
                    toggled = Some(industry.clone());
                }
            }
            if let Some(industry) = toggled {
                state.toggle_industry(&industry);
            }
        });
}

fn date_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Publication Date Range");

    let mut changed = false;
    egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("From");
        changed |= ui
            .add(DatePickerButton::new(&mut state.date_inputs.0).id_salt("date_start"))
            .changed();
        ui.end_row();

        ui.label("To");
        changed |= ui
            .add(DatePickerButton::new(&mut state.date_inputs.1).id_salt("date_end"))
            .changed();
        ui.end_row();
    });

    if changed {
        state.apply_date_inputs();
    }
    if let Some(warning) = &state.filter_warning {
        ui.label(RichText::new(warning.as_str()).color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.table.is_some(), egui::Button::new("Export…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} reports loaded, {} visible",
                table.len(),
                state.view.visible()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg.as_str()).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSRD report data")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered reports")
        .set_file_name("csrd-reports.html")
        .add_filter("HTML", &["html", "htm"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = crate::report::generate(&path, &state.view.display) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Export failed: {e:#}"));
        }
    }
}
