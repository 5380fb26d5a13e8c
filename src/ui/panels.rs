use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use yearline::chart::builder::X_AXIS_LABEL;

use super::to_color32;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – options and dataset toggles
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Options");
    ui.separator();
    options_editor(ui, state);

    ui.add_space(8.0);
    ui.heading("Datasets");
    ui.separator();

    if state.datasets.is_empty() {
        ui.label("No datasets loaded.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.show_all();
        }
        if ui.small_button("None").clicked() {
            state.hide_all();
        }
        ui.checkbox(&mut state.show_table, "Table");
    });

    let entries = state
        .chart
        .as_ref()
        .map(|spec| spec.legend_entries())
        .unwrap_or_default();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (idx, (label, color)) in entries.iter().enumerate() {
                let years = state.datasets.get(idx).map(|d| d.series.len()).unwrap_or(0);
                let text = RichText::new(format!("{label}  ({years})")).color(to_color32(*color));
                let mut checked = state.is_visible(idx);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_visibility(idx);
                }
            }
        });
}

fn options_editor(ui: &mut Ui, state: &mut AppState) {
    let mut options = state.options.clone();

    ui.add(egui::Slider::new(&mut options.height, 20..=800).text("Height (px)"));

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Y label");
        ui.text_edit_singleline(&mut options.y_label);
    });

    let mut title = options.title.clone().unwrap_or_default();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Title");
        if ui.text_edit_singleline(&mut title).changed() {
            options.title = (!title.is_empty()).then(|| title.clone());
        }
    });

    ui.checkbox(&mut options.index_page, "Index page");
    ui.checkbox(&mut options.search_page, "Search page (no legend)");

    state.set_options(options);
}

// ---------------------------------------------------------------------------
// Bottom panel – dense series table
// ---------------------------------------------------------------------------

/// One row per axis year, one column per visible dataset.
pub fn series_table(ui: &mut Ui, state: &AppState) {
    let Some(spec) = &state.chart else {
        return;
    };
    let visible: Vec<usize> = (0..spec.series.len())
        .filter(|i| state.is_visible(*i))
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(60.0))
        .columns(Column::auto().at_least(80.0), visible.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(X_AXIS_LABEL);
            });
            for &i in &visible {
                header.col(|ui| {
                    ui.strong(RichText::new(&spec.series[i].label).color(to_color32(spec.colors[i])));
                });
            }
        })
        .body(|mut body| {
            for (row_idx, year) in spec.config.data.labels.iter().enumerate() {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(year.to_string());
                    });
                    for &i in &visible {
                        let value = spec.series[i].points.get(row_idx).map(|p| p.1);
                        row.col(|ui| {
                            ui.label(value.map(|v| v.to_string()).unwrap_or_default());
                        });
                    }
                });
            }
        });
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
            let can_export = state.chart.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export config…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(spec) = &state.chart {
            ui.label(format!(
                "{} datasets, {} visible, {}",
                state.datasets.len(),
                state.visible_count(),
                spec.range
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open datasets")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match yearline::data::loader::load_file(&path) {
            Ok(datasets) => state.set_datasets(datasets, Some(path)),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let Some(spec) = &state.chart else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export chart configuration")
        .set_file_name("chart.json")
        .add_filter("JSON", &["json"])
        .save_file();

    let Some(path) = file else {
        return;
    };
    let result = spec
        .config
        .to_json_pretty()
        .map_err(anyhow::Error::from)
        .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from));
    match result {
        Ok(()) => log::info!("Exported chart configuration to {}", path.display()),
        Err(e) => {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
