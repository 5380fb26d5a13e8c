//! Serializable chart configuration in the shape Chart.js 2.x consumes:
//! `{type, data: {labels, datasets}, options: {...}}`.

use serde::Serialize;

/// Decimal places shown for values in hover tooltips.
pub const TOOLTIP_DECIMALS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<i32>,
    pub datasets: Vec<LineDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDataset {
    pub label: String,
    pub line_tension: f64,
    pub fill: bool,
    pub background_color: String,
    pub border_color: String,
    pub data: Vec<f64>,
    pub border_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub title: Title,
    pub legend: Legend,
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub display: bool,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub display: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scales {
    pub x_axes: Vec<Axis>,
    pub y_axes: Vec<Axis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub scale_label: ScaleLabel,
    pub ticks: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleLabel {
    pub display: bool,
    pub label_string: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticks {
    pub max_ticks_limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer_steps: Option<bool>,
}

impl Axis {
    pub fn labelled(label: impl Into<String>, ticks: Ticks) -> Self {
        Axis {
            scale_label: ScaleLabel {
                display: true,
                label_string: label.into(),
            },
            ticks,
        }
    }
}

impl ChartConfig {
    pub fn x_axis(&self) -> Option<&Axis> {
        self.options.scales.x_axes.first()
    }

    pub fn y_axis(&self) -> Option<&Axis> {
        self.options.scales.y_axes.first()
    }

    /// Hover text for a point: `"<label>: <value>"`, or just the value when
    /// the dataset has no label.
    pub fn tooltip_label(&self, dataset_index: usize, value: f64) -> String {
        let label = self
            .data
            .datasets
            .get(dataset_index)
            .map(|d| d.label.as_str())
            .unwrap_or("");
        if label.is_empty() {
            format!("{value:.prec$}", prec = TOOLTIP_DECIMALS)
        } else {
            format!("{label}: {value:.prec$}", prec = TOOLTIP_DECIMALS)
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
