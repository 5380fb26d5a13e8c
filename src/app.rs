use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct YearlineApp {
    pub state: AppState,
}

impl YearlineApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for YearlineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: options and datasets ----
        egui::SidePanel::left("dataset_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: dense series table ----
        if self.state.show_table && self.state.chart.is_some() {
            egui::TopBottomPanel::bottom("series_table")
                .resizable(true)
                .default_height(180.0)
                .show(ctx, |ui| {
                    panels::series_table(ui, &self.state);
                });
        }

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::year_plot(ui, &self.state);
        });
    }
}
