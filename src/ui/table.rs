use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::present::DisplayCell;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;

/// The filtered report data; report links open in the browser.
pub fn report_table(ui: &mut Ui, state: &AppState) {
    let display = &state.view.display;
    ui.strong(format!("Filtered CSRD Report Data  ({} rows)", display.len()));

    if display.headers.is_empty() {
        return;
    }

    let mut builder = TableBuilder::new(ui).striped(true).resizable(true).vscroll(false);
    for idx in 0..display.headers.len() {
        let column = if display.link_column == Some(idx) {
            // Labels here are company names.
            Column::auto().at_least(140.0).clip(true)
        } else {
            Column::auto().at_least(80.0).clip(true)
        };
        builder = builder.column(column);
    }

    builder
        .header(ROW_HEIGHT, |mut header| {
            for title in &display.headers {
                header.col(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.strong(title.as_str());
                    });
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, display.len(), |mut row| {
                let cells = &display.rows[row.index()];
                for cell in cells {
                    row.col(|ui| match cell {
                        DisplayCell::Link { href, label } => {
                            ui.add(
                                egui::Hyperlink::from_label_and_url(label.as_str(), href)
                                    .open_in_new_tab(true),
                            );
                        }
                        DisplayCell::Text(text) => {
                            ui.label(text.as_str());
                        }
                    });
                }
            });
        });
}
