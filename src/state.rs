use std::collections::BTreeSet;
use std::path::PathBuf;

use yearline::{ChartBuilder, ChartSpec, Dataset, LineChartOptions};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full preview state, independent of rendering.
pub struct AppState {
    /// Loaded datasets (empty until the user loads a file).
    pub datasets: Vec<Dataset>,

    /// File the datasets came from.
    pub source: Option<PathBuf>,

    /// Builder options, editable in the side panel.
    pub options: LineChartOptions,

    /// Last successfully built chart.
    pub chart: Option<ChartSpec>,

    /// Dataset indices hidden from the plot.
    pub hidden: BTreeSet<usize>,

    /// Whether the dense-series table is shown.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            datasets: Vec::new(),
            source: None,
            options: LineChartOptions::default(),
            chart: None,
            hidden: BTreeSet::new(),
            show_table: false,
            status_message: None,
        }
    }
}

impl AppState {
    pub fn with_options(options: LineChartOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Ingest newly loaded datasets and rebuild the chart.
    pub fn set_datasets(&mut self, datasets: Vec<Dataset>, source: Option<PathBuf>) {
        self.datasets = datasets;
        self.source = source;
        self.hidden.clear();
        self.rebuild();
    }

    /// Replace the options; the chart is rebuilt only when they changed.
    pub fn set_options(&mut self, options: LineChartOptions) {
        if options != self.options {
            self.options = options;
            self.rebuild();
        }
    }

    /// Recompute the chart from `datasets` and `options`.
    ///
    /// Overflow colors are random, so this runs on change only, never per frame.
    pub fn rebuild(&mut self) {
        if self.datasets.is_empty() {
            self.chart = None;
            return;
        }
        match ChartBuilder::default().config(&self.datasets, &self.options) {
            Ok(spec) => {
                log::info!(
                    "Built chart for {} datasets over {}",
                    self.datasets.len(),
                    spec.range
                );
                self.chart = Some(spec);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to build chart: {e}");
                self.chart = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn is_visible(&self, index: usize) -> bool {
        !self.hidden.contains(&index)
    }

    /// Toggle a single dataset's visibility.
    pub fn toggle_visibility(&mut self, index: usize) {
        if !self.hidden.remove(&index) {
            self.hidden.insert(index);
        }
    }

    pub fn show_all(&mut self) {
        self.hidden.clear();
    }

    pub fn hide_all(&mut self) {
        self.hidden = (0..self.datasets.len()).collect();
    }

    pub fn visible_count(&self) -> usize {
        self.datasets.len() - self.hidden.len()
    }
}
