use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Data table (one per panel)
// ---------------------------------------------------------------------------

const HEADER_HEIGHT: f32 = 20.0;
const ROW_HEIGHT: f32 = 18.0;
const MAX_HEIGHT: f32 = 240.0;

/// Render a table as a striped grid, header row bold, cells as displayed
/// text. `id_salt` keeps scroll state separate when a page shows more
/// than one table.
pub fn data_table(ui: &mut Ui, table: &Table, id_salt: &str) {
    ui.push_id(id_salt, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .columns(Column::auto().at_least(90.0), table.columns.len())
            .max_scroll_height(MAX_HEIGHT)
            .header(HEADER_HEIGHT, |mut header| {
                for name in &table.columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.len(), |mut row| {
                    let i = row.index();
                    for cell in &table.rows[i] {
                        row.col(|ui| {
                            ui.label(cell.to_string());
                        });
                    }
                });
            });
    });
}
