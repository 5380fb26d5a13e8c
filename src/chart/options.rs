use serde::{Deserialize, Serialize};

/// Optional knobs of [`build_line_chart`](super::builder::build_line_chart).
///
/// Deserializes from partial JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineChartOptions {
    /// Canvas height in pixels.
    pub height: u32,
    pub y_label: String,
    pub title: Option<String>,
    /// Index pages show fewer year ticks.
    pub index_page: bool,
    /// Search pages hide the legend.
    pub search_page: bool,
}

impl Default for LineChartOptions {
    fn default() -> Self {
        Self {
            height: 50,
            y_label: "Seiten".to_string(),
            title: None,
            index_page: false,
            search_page: false,
        }
    }
}

impl LineChartOptions {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn x_max_ticks(&self) -> u32 {
        if self.index_page {
            8
        } else {
            11
        }
    }

    pub fn y_max_ticks(&self) -> u32 {
        match self.height {
            h if h < 100 => 5,
            h if h < 400 => 6,
            _ => 11,
        }
    }
}
