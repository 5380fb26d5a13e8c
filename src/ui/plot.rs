use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use yearline::chart::builder::{LINE_WIDTH, X_AXIS_LABEL};
use yearline::ChartConfig;

use super::to_color32;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Year plot (central panel)
// ---------------------------------------------------------------------------

/// Tooltip for a hovered point: the year, then the series line.
/// An unlabeled series still shows its value.
fn hover_text(config: &ChartConfig, name: &str, x: f64, y: f64) -> String {
    let year = x.round() as i64;
    match config.data.datasets.iter().position(|d| d.label == name) {
        Some(index) => format!("{year}\n{}", config.tooltip_label(index, y)),
        None => format!("{year}"),
    }
}

/// Render the line chart in the central panel.
pub fn year_plot(ui: &mut Ui, state: &AppState) {
    let spec = match &state.chart {
        Some(spec) => spec,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a dataset file to view the chart  (File → Open…)");
            });
            return;
        }
    };

    if let Some(title) = &spec.config.options.title.text {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading(title);
        });
    }

    let y_label = spec
        .config
        .y_axis()
        .map(|axis| axis.scale_label.label_string.clone())
        .unwrap_or_default();

    // The formatter outlives this borrow of `state`, so it owns a copy.
    let config = spec.config.clone();

    let mut plot = Plot::new("year_plot")
        .x_axis_label(X_AXIS_LABEL)
        .y_axis_label(y_label)
        .include_y(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, point| hover_text(&config, name, point.x, point.y));
    if spec.config.options.legend.display {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for (idx, (series, color)) in spec.series.iter().zip(&spec.colors).enumerate() {
            if !state.is_visible(idx) {
                continue;
            }

            let points: PlotPoints = series
                .points
                .iter()
                .map(|&(year, value)| [year as f64, value])
                .collect();

            let line = Line::new(points)
                .name(&series.label)
                .color(to_color32(*color))
                .width(LINE_WIDTH as f32);

            plot_ui.line(line);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use yearline::{build_config, Dataset, LineChartOptions, PALETTE};

    fn config(labels: &[&str]) -> ChartConfig {
        let datasets: Vec<Dataset> = labels
            .iter()
            .map(|l| Dataset::new(*l, [(2020, 1.5)]).unwrap())
            .collect();
        build_config(
            &datasets,
            &LineChartOptions::default(),
            &PALETTE,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap()
        .config
    }

    #[test]
    fn unlabeled_series_shows_its_value() {
        let config = config(&["", "B"]);
        assert_eq!(hover_text(&config, "", 2020.2, 1.5), "2020\n1.500000");
        assert_eq!(hover_text(&config, "B", 2019.7, 1.5), "2020\nB: 1.500000");
    }

    #[test]
    fn unknown_name_shows_only_the_year() {
        let config = config(&["A"]);
        assert_eq!(hover_text(&config, "Z", 2021.0, 3.0), "2021");
    }
}
