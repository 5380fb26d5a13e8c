use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

// ---------------------------------------------------------------------------
// Dataset – one named year → value series
// ---------------------------------------------------------------------------

/// A caller-supplied series. Years may be sparse; the map keeps them unique
/// and ordered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub series: BTreeMap<i32, f64>,
}

impl Dataset {
    /// Build a dataset from typed pairs, rejecting non-finite values.
    pub fn new(
        label: impl Into<String>,
        points: impl IntoIterator<Item = (i32, f64)>,
    ) -> Result<Self, ChartError> {
        let label = label.into();
        let mut series = BTreeMap::new();
        for (year, value) in points {
            if !value.is_finite() {
                return Err(ChartError::invalid(
                    &label,
                    format!("value for year {year} is not a finite number"),
                ));
            }
            series.insert(year, value);
        }
        Ok(Dataset { label, series })
    }

    pub fn first_year(&self) -> Option<i32> {
        self.series.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.series.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RawDataset – the textual wire shape `["label", {"2020": 5}]`
// ---------------------------------------------------------------------------

/// Untrusted input as page templates emit it. Keys are still text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDataset {
    Pair(String, BTreeMap<String, f64>),
    Record {
        label: String,
        series: BTreeMap<String, f64>,
    },
}

impl RawDataset {
    pub fn label(&self) -> &str {
        match self {
            RawDataset::Pair(label, _) => label,
            RawDataset::Record { label, .. } => label,
        }
    }
}

impl TryFrom<RawDataset> for Dataset {
    type Error = ChartError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        let (label, keyed) = match raw {
            RawDataset::Pair(label, series) => (label, series),
            RawDataset::Record { label, series } => (label, series),
        };
        let mut points = Vec::with_capacity(keyed.len());
        for (key, value) in keyed {
            let year = parse_year(&key).ok_or_else(|| {
                ChartError::invalid(&label, format!("year key '{key}' is not an integer"))
            })?;
            points.push((year, value));
        }
        // Two textual keys ("2020" and " 2020") can name the same year.
        let distinct: std::collections::BTreeSet<i32> = points.iter().map(|(y, _)| *y).collect();
        if distinct.len() != points.len() {
            return Err(ChartError::invalid(&label, "duplicate year keys"));
        }
        Dataset::new(label, points)
    }
}

/// Strict year parsing: surrounding whitespace is tolerated, trailing junk is not.
pub fn parse_year(key: &str) -> Option<i32> {
    key.trim().parse::<i32>().ok()
}

// ---------------------------------------------------------------------------
// YearRange – the shared x axis bounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// Number of years in `[min, max]`.
    pub fn len(&self) -> usize {
        (i64::from(self.max) - i64::from(self.min) + 1) as usize
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.min..=self.max
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}–{}", self.min, self.max)
        }
    }
}

// ---------------------------------------------------------------------------
// NormalizedSeries – dense, gap-filled output
// ---------------------------------------------------------------------------

/// One dataset aligned to the shared axis. `points` is contiguous in years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub label: String,
    pub points: Vec<(i32, f64)>,
}

impl NormalizedSeries {
    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|(y, _)| *y).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
