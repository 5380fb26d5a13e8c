use log::{debug, info};
use palette::Srgb;
use rand::Rng;

use super::config::{
    Axis, ChartConfig, ChartData, ChartOptions, Legend, LineDataset, Scales, Ticks, Title,
};
use super::options::LineChartOptions;
use crate::color::{self, PALETTE};
use crate::data::model::{Dataset, NormalizedSeries, YearRange};
use crate::data::normalize::normalize;
use crate::dom::{mount_canvas, Canvas, DocumentHandle};
use crate::error::ChartError;

/// Label of the shared year axis.
pub const X_AXIS_LABEL: &str = "Jahr";
pub const LINE_WIDTH: u32 = 2;

// ---------------------------------------------------------------------------
// Renderer seam
// ---------------------------------------------------------------------------

/// The charting library that turns a configuration into pixels.
pub trait ChartRenderer {
    type Handle;

    fn render(&mut self, canvas: &Canvas, config: &ChartConfig) -> Result<Self::Handle, ChartError>;
}

/// Keeps every configuration it is asked to render, serialized as JSON.
/// The handle is the index into [`JsonRenderer::rendered`].
#[derive(Debug, Default)]
pub struct JsonRenderer {
    rendered: Vec<(Canvas, String)>,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> &[(Canvas, String)] {
        &self.rendered
    }

    pub fn get(&self, handle: usize) -> Option<&str> {
        self.rendered.get(handle).map(|(_, json)| json.as_str())
    }
}

impl ChartRenderer for JsonRenderer {
    type Handle = usize;

    fn render(&mut self, canvas: &Canvas, config: &ChartConfig) -> Result<usize, ChartError> {
        let json = config
            .to_json()
            .map_err(|e| ChartError::Render(e.to_string()))?;
        self.rendered.push((*canvas, json));
        Ok(self.rendered.len() - 1)
    }
}

// ---------------------------------------------------------------------------
// Pure configuration
// ---------------------------------------------------------------------------

/// Everything derived from the datasets, before any document is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub config: ChartConfig,
    /// Unpadded bounds of the input years.
    pub range: YearRange,
    pub series: Vec<NormalizedSeries>,
    pub colors: Vec<Srgb<u8>>,
}

impl ChartSpec {
    /// `(label, color)` per dataset, in input order.
    pub fn legend_entries(&self) -> Vec<(String, Srgb<u8>)> {
        self.series
            .iter()
            .zip(&self.colors)
            .map(|(s, c)| (s.label.clone(), *c))
            .collect()
    }
}

/// Build the chart configuration for `datasets`.
///
/// Colors past the end of `palette` come from `rng`.
pub fn build_config<R: Rng + ?Sized>(
    datasets: &[Dataset],
    options: &LineChartOptions,
    palette: &[Srgb<u8>],
    rng: &mut R,
) -> Result<ChartSpec, ChartError> {
    let (axis, series) = normalize(datasets)?;

    let colors: Vec<Srgb<u8>> = (0..series.len())
        .map(|i| color::color_for(i, palette, &mut *rng))
        .collect();

    let line_datasets = series
        .iter()
        .zip(&colors)
        .map(|(s, c)| {
            let hex = color::to_hex(*c);
            LineDataset {
                label: s.label.clone(),
                line_tension: 0.0,
                fill: false,
                background_color: hex.clone(),
                border_color: hex,
                data: s.values(),
                border_width: LINE_WIDTH,
            }
        })
        .collect();

    let x_axis = Axis::labelled(
        X_AXIS_LABEL,
        Ticks {
            max_ticks_limit: options.x_max_ticks(),
            begin_at_zero: None,
            integer_steps: None,
        },
    );
    let y_axis = Axis::labelled(
        options.y_label.clone(),
        Ticks {
            max_ticks_limit: options.y_max_ticks(),
            begin_at_zero: Some(true),
            integer_steps: Some(true),
        },
    );

    let config = ChartConfig {
        kind: "line",
        data: ChartData {
            labels: axis.years(),
            datasets: line_datasets,
        },
        options: ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            title: Title {
                display: options.title.is_some(),
                text: options.title.clone(),
            },
            legend: Legend {
                display: !options.search_page,
            },
            scales: Scales {
                x_axes: vec![x_axis],
                y_axes: vec![y_axis],
            },
        },
    };

    debug!(
        "built line chart config: {} series over {} labels",
        series.len(),
        config.data.labels.len()
    );

    Ok(ChartSpec {
        config,
        range: axis.range,
        series,
        colors,
    })
}

// ---------------------------------------------------------------------------
// Full build: config + canvas + render
// ---------------------------------------------------------------------------

/// A rendered chart plus the year bounds the surrounding page labels with.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart<H> {
    pub handle: H,
    pub min_year: i32,
    pub max_year: i32,
}

/// Builds line charts with a fixed palette.
#[derive(Debug, Clone, Copy)]
pub struct ChartBuilder<'p> {
    palette: &'p [Srgb<u8>],
}

impl Default for ChartBuilder<'static> {
    fn default() -> Self {
        Self { palette: &PALETTE }
    }
}

impl<'p> ChartBuilder<'p> {
    pub fn with_palette(palette: &'p [Srgb<u8>]) -> Self {
        Self { palette }
    }

    pub fn config(
        &self,
        datasets: &[Dataset],
        options: &LineChartOptions,
    ) -> Result<ChartSpec, ChartError> {
        build_config(datasets, options, self.palette, &mut rand::thread_rng())
    }

    /// Normalize `datasets`, mount a canvas under `container_id` and render.
    ///
    /// The configuration is validated before the document is touched, so a
    /// failed build leaves no stray canvas behind.
    pub fn build<D, R>(
        &self,
        doc: &mut D,
        renderer: &mut R,
        datasets: &[Dataset],
        container_id: &str,
        options: &LineChartOptions,
    ) -> Result<LineChart<R::Handle>, ChartError>
    where
        D: DocumentHandle + ?Sized,
        R: ChartRenderer + ?Sized,
    {
        let spec = self.config(datasets, options)?;
        let canvas = mount_canvas(doc, container_id, options.height)?;
        let handle = renderer.render(&canvas, &spec.config)?;
        info!(
            "rendered {} datasets into #{container_id} ({})",
            datasets.len(),
            spec.range
        );
        Ok(LineChart {
            handle,
            min_year: spec.range.min,
            max_year: spec.range.max,
        })
    }
}

/// [`ChartBuilder::build`] with the default palette.
pub fn build_line_chart<D, R>(
    doc: &mut D,
    renderer: &mut R,
    datasets: &[Dataset],
    container_id: &str,
    options: &LineChartOptions,
) -> Result<LineChart<R::Handle>, ChartError>
where
    D: DocumentHandle + ?Sized,
    R: ChartRenderer + ?Sized,
{
    ChartBuilder::default().build(doc, renderer, datasets, container_id, options)
}
