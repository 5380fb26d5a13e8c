//! Year-axis line charts for page templates.
//!
//! Datasets are sparse `year → value` maps. [`build_line_chart`] puts them on
//! one shared, zero-filled axis, assigns palette colors, mounts a canvas in a
//! [`DocumentHandle`] and hands a Chart.js-shaped [`ChartConfig`] to a
//! [`ChartRenderer`].

pub mod array;
pub mod chart;
pub mod color;
pub mod data;
pub mod dom;
pub mod error;

pub use chart::builder::{
    build_config, build_line_chart, ChartBuilder, ChartRenderer, ChartSpec, JsonRenderer,
    LineChart,
};
pub use chart::config::ChartConfig;
pub use chart::options::LineChartOptions;
pub use color::PALETTE;
pub use data::model::{Dataset, NormalizedSeries, RawDataset, YearRange};
pub use dom::{on_ready, DocumentHandle, MemoryDocument, ReadyReport};
pub use error::ChartError;
