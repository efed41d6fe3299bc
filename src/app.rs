use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HimsDashApp {
    pub state: AppState,
}

impl Default for HimsDashApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl HimsDashApp {
    /// Fresh app that picks up the conventional data files if present.
    pub fn with_default_files() -> Self {
        let mut app = Self::default();
        app.state.load_default_files();
        app
    }
}

impl eframe::App for HimsDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: navigation ----
        egui::SidePanel::left("navigation_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: current page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &mut self.state);
        });
    }
}
