use std::fs;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export;
use crate::state::AppState;
use crate::ui::{plot, table};
use crate::view::{self, resolver, GenderFilter, Panel, ResolvedView, ViewSelector};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Fichier", |ui: &mut Ui| {
            if ui.button("Ouvrir un classeur…").clicked() {
                open_workbook_dialog(state);
                ui.close_menu();
            }
            if ui.button("Ouvrir un fond de carte…").clicked() {
                open_boundaries_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(
            RichText::new("📊 Tableau de bord – Immigration en Tunisie (2020-2021)").strong(),
        );

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – navigation menu
// ---------------------------------------------------------------------------

/// Render the left navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📂 Navigation");
    ui.separator();
    ui.strong("Explorez les données de l'enquête Tunisia-HIMS");
    ui.add_space(4.0);

    for view in ViewSelector::ALL {
        ui.radio_value(&mut state.view, view, view.label());
    }

    // The education & employment page carries its sex filter here.
    if state.view == ViewSelector::EducationActivity {
        ui.separator();
        ui.strong("👥 Filtrer par sexe :");
        egui::ComboBox::from_id_salt("education_filter")
            .selected_text(state.education_filter.label())
            .show_ui(ui, |ui: &mut Ui| {
                for choice in GenderFilter::CHOICES {
                    ui.selectable_value(&mut state.education_filter, choice, choice.label());
                }
            });
    }

    ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui: &mut Ui| {
        ui.small("Enquête Tunisia-HIMS · ONM / INS (2020-2021)");
        ui.separator();
    });
}

// ---------------------------------------------------------------------------
// Central panel – the current page
// ---------------------------------------------------------------------------

/// Render the current page: heading, table, download button and chart for
/// each resolved panel.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    if state.view == ViewSelector::Home {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| home_page(ui));
        return;
    }

    if state.store.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Chargez un classeur pour commencer  (Fichier → Ouvrir un classeur…)");
        });
        return;
    }

    // Page-local sex selector of the motives view, above its panel.
    if state.view == ViewSelector::Motives {
        ui.horizontal(|ui: &mut Ui| {
            ui.strong("👥 Filtrer par sexe :");
            egui::ComboBox::from_id_salt("motives_filter")
                .selected_text(state.motives_filter.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for choice in GenderFilter::CHOICES {
                        ui.selectable_value(&mut state.motives_filter, choice, choice.label());
                    }
                });
        });
        ui.add_space(4.0);
    }

    let resolved = match &state.store {
        Some(store) => view::resolve(state.view, state.active_filter(), store, &state.boundaries),
        None => return,
    };
    let panels = match resolved {
        Ok(ResolvedView::Panels(panels)) => panels,
        Ok(ResolvedView::Home) => return,
        Err(e) => {
            log::error!("failed to resolve `{}`: {e:#}", state.view.label());
            ui.colored_label(Color32::RED, format!("Erreur: {e:#}"));
            return;
        }
    };

    // This runs every repaint; warn only when the unmatched set changes.
    for panel in &panels {
        if let Some(geo) = &panel.chart.geo {
            if state.note_unmatched_governorates(&geo.unmatched) {
                log::warn!(
                    "{} gouvernorat(s) absent(s) du fond de carte: {}",
                    geo.unmatched.len(),
                    geo.unmatched.join(", ")
                );
            }
        }
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, panel) in panels.iter().enumerate() {
                if i > 0 {
                    ui.add_space(12.0);
                    ui.separator();
                }
                ui.heading(panel.heading);
                ui.add_space(4.0);

                table::data_table(ui, &panel.table, panel.export_file_name);
                ui.add_space(4.0);

                if ui.button("📥 Télécharger les données").clicked() {
                    download_panel_csv(panel, &mut state.status_message);
                }

                ui.add_space(8.0);
                plot::chart(ui, &panel.chart, &state.boundaries, panel.export_file_name);
            }
        });
}

/// Landing page.
fn home_page(ui: &mut Ui) {
    ui.heading(resolver::HOME_TITLE);
    ui.add_space(8.0);
    ui.label(resolver::HOME_INTRO);
    ui.add_space(8.0);
    ui.strong(resolver::HOME_OBJECTIVES_TITLE);
    for objective in resolver::HOME_OBJECTIVES {
        ui.label(format!("• {objective}"));
    }
    ui.add_space(8.0);
    ui.small(resolver::HOME_NOTE);
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn open_workbook_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Ouvrir les données de l'enquête")
        .add_filter("Classeurs", &["xlsx", "xlsm", "json"])
        .add_filter("Excel", &["xlsx", "xlsm"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_workbook(&path);
    }
}

fn open_boundaries_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Ouvrir un fond de carte")
        .add_filter("GeoJSON", &["geojson", "json"])
        .pick_file();

    if let Some(path) = file {
        state.load_boundaries(&path);
    }
}

/// Encode the panel's table and ask where to save it.
fn download_panel_csv(panel: &Panel, status: &mut Option<String>) {
    let payload = match export::encode_csv(&panel.table, panel.export_file_name) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("failed to encode CSV: {e:#}");
            *status = Some(format!("Erreur: {e:#}"));
            return;
        }
    };

    let file = rfd::FileDialog::new()
        .set_title("Enregistrer le CSV")
        .set_file_name(&payload.file_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match fs::write(&path, &payload.bytes) {
            Ok(()) => log::info!(
                "wrote {} ({}, {} bytes)",
                path.display(),
                payload.mime,
                payload.bytes.len()
            ),
            Err(e) => {
                log::error!("failed to write CSV: {e:#}");
                *status = Some(format!("Erreur: {e:#}"));
            }
        }
    }
}
