use log::debug;

use super::model::{Dataset, NormalizedSeries, YearRange};
use crate::error::ChartError;

// ---------------------------------------------------------------------------
// Year bounds
// ---------------------------------------------------------------------------

/// Global `[min, max]` over every dataset's years.
pub fn year_range(datasets: &[Dataset]) -> Result<YearRange, ChartError> {
    let min = datasets.iter().filter_map(Dataset::first_year).min();
    let max = datasets.iter().filter_map(Dataset::last_year).max();
    match (min, max) {
        (Some(min), Some(max)) => Ok(YearRange { min, max }),
        _ => Err(ChartError::NoYears),
    }
}

// ---------------------------------------------------------------------------
// Shared axis with short-axis padding
// ---------------------------------------------------------------------------

/// Widest `[min, max]` span accepted. Every series gets one point per year,
/// so a stray year such as `0` next to `2020` must not turn into millions of
/// labels.
pub const MAX_YEAR_SPAN: usize = 5_000;

/// The x axis every series is aligned to.
///
/// `padding` synthetic years precede `range.min`; the renderer needs at
/// least three points to draw a readable line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearAxis {
    pub range: YearRange,
    pub padding: usize,
}

impl YearAxis {
    pub fn new(range: YearRange) -> Result<Self, ChartError> {
        if range.len() > MAX_YEAR_SPAN {
            return Err(ChartError::YearSpanTooLarge {
                min: range.min,
                max: range.max,
            });
        }
        let padding = match range.len() {
            1 => 2,
            // A dense axis of two years is always consecutive.
            2 => 1,
            _ => 0,
        };
        range
            .min
            .checked_sub(padding as i32)
            .ok_or(ChartError::YearOutOfRange(range.min))?;
        Ok(YearAxis { range, padding })
    }

    pub fn first_year(&self) -> i32 {
        self.range.min - self.padding as i32
    }

    /// All labels, padding included.
    pub fn years(&self) -> Vec<i32> {
        (self.first_year()..=self.range.max).collect()
    }

    pub fn len(&self) -> usize {
        self.range.len() + self.padding
    }
}

// ---------------------------------------------------------------------------
// Densification
// ---------------------------------------------------------------------------

/// Walk the axis and emit the stored value or 0 for every year.
pub fn densify(dataset: &Dataset, axis: &YearAxis) -> NormalizedSeries {
    let mut points = Vec::with_capacity(axis.len());
    points.extend((axis.first_year()..axis.range.min).map(|year| (year, 0.0)));
    points.extend(
        axis.range
            .years()
            .map(|year| (year, dataset.series.get(&year).copied().unwrap_or(0.0))),
    );
    NormalizedSeries {
        label: dataset.label.clone(),
        points,
    }
}

/// Normalize every dataset onto one shared, padded axis.
///
/// The returned range is the unpadded `[min, max]` actually present in the
/// input.
pub fn normalize(datasets: &[Dataset]) -> Result<(YearAxis, Vec<NormalizedSeries>), ChartError> {
    let range = year_range(datasets)?;
    let axis = YearAxis::new(range)?;
    debug!(
        "normalizing {} datasets onto {} ({} padding years)",
        datasets.len(),
        range,
        axis.padding
    );
    let series = datasets.iter().map(|ds| densify(ds, &axis)).collect();
    Ok((axis, series))
}
