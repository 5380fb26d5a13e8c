use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{parse_year, Dataset, RawDataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load datasets from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[["label", {"2020": 5, ...}], ...]` or `[{ "label": ..., "series": {...} }, ...]`
/// * `.csv`     – long format, header `label,year,value`
/// * `.parquet` – long format columns `label`, `year`, `value`
pub fn load_file(path: &Path) -> Result<Vec<Dataset>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let datasets = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;
    info!("Loaded {} datasets from {}", datasets.len(), path.display());
    Ok(datasets)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Vec<Dataset>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Parse the JSON shape page templates hand to the chart.
pub fn parse_json(text: &str) -> Result<Vec<Dataset>> {
    let raw: Vec<RawDataset> = serde_json::from_str(text).context("parsing JSON datasets")?;
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| Dataset::try_from(r).with_context(|| format!("dataset {i}")))
        .collect()
}

// ---------------------------------------------------------------------------
// Long-format accumulation (CSV and Parquet)
// ---------------------------------------------------------------------------

/// Groups `(label, year, value)` rows into datasets, ordered by first
/// appearance of each label.
#[derive(Default)]
struct LongFormat {
    order: Vec<String>,
    series: BTreeMap<String, BTreeMap<i32, f64>>,
}

impl LongFormat {
    /// `at` names the source location in error messages.
    fn push(&mut self, label: &str, year: i32, value: f64, at: &str) -> Result<()> {
        if !self.series.contains_key(label) {
            self.order.push(label.to_string());
        }
        let entry = self.series.entry(label.to_string()).or_default();
        if entry.insert(year, value).is_some() {
            bail!("{at}: duplicate year {year} for '{label}'");
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Dataset>> {
        self.order
            .iter()
            .map(|label| {
                let points = self.series.remove(label).unwrap_or_default();
                Dataset::new(label.clone(), points).map_err(anyhow::Error::from)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row containing `label`, `year` and `value` (any order,
/// extra columns ignored). One row per observation.
fn load_csv(path: &Path) -> Result<Vec<Dataset>> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Dataset>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let label_idx = column("label")?;
    let year_idx = column("year")?;
    let value_idx = column("value")?;

    let mut long = LongFormat::default();

    for (row_no, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let fallback_line = row_no as u64 + 2;
        let record = result.with_context(|| format!("CSV line {fallback_line}"))?;
        let line = record.position().map_or(fallback_line, |p| p.line());
        let at = format!("CSV line {line}");

        let label = record.get(label_idx).unwrap_or("");
        let year_text = record.get(year_idx).unwrap_or("");
        let year = parse_year(year_text)
            .with_context(|| format!("{at}: year '{year_text}' is not an integer"))?;
        let value_text = record.get(value_idx).unwrap_or("").trim();
        let value = value_text
            .parse::<f64>()
            .with_context(|| format!("{at}: value '{value_text}' is not a number"))?;

        long.push(label, year, value, &at)?;
    }

    long.finish()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file in long format.
///
/// Expected schema:
/// - `label`: Utf8 / LargeUtf8
/// - `year`: Int32 or Int64
/// - `value`: Float64, Float32, Int64 or Int32
fn load_parquet(path: &Path) -> Result<Vec<Dataset>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut long = LongFormat::default();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &str| {
            schema
                .index_of(name)
                .map(|i| batch.column(i))
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))
        };
        let label_col = column("label")?;
        let year_col = column("year")?;
        let value_col = column("value")?;

        for row in 0..batch.num_rows() {
            let abs = offset + row;
            let label = extract_label(label_col, row)
                .with_context(|| format!("Row {abs}: failed to read 'label'"))?;
            let year = extract_year(year_col, row)
                .with_context(|| format!("Row {abs}: failed to read 'year'"))?;
            let value = extract_value(value_col, row)
                .with_context(|| format!("Row {abs}: failed to read 'value'"))?;
            long.push(&label, year, value, &format!("Row {abs}"))?;
        }
        offset += batch.num_rows();
    }

    long.finish()
}

// -- Parquet / Arrow helpers --

fn extract_label(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null label");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("Expected Utf8 label column, got {other:?}"),
    }
}

fn extract_year(col: &Arc<dyn Array>, row: usize) -> Result<i32> {
    if col.is_null(row) {
        bail!("null year");
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row))
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            i32::try_from(arr.value(row)).context("year does not fit in 32 bits")
        }
        other => bail!("Expected Int32 or Int64 year column, got {other:?}"),
    }
}

fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Ok(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        Ok(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(arr.value(row) as f64)
    } else {
        bail!("Expected a numeric value column, got {:?}", col.data_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn json_pairs_load_in_order() {
        let ds = parse_json(r#"[["B", {"2001": 1}], ["A", {"1999": 2, "2003": 3}]]"#).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[0].label, "B");
        assert_eq!(ds[1].series.len(), 2);
    }

    #[test]
    fn json_rejects_bad_year_keys() {
        let err = parse_json(r#"[["A", {"year": 1}]]"#).unwrap_err();
        assert!(format!("{err:#}").contains("not an integer"));
    }

    #[test]
    fn csv_groups_by_label() {
        let text = "label,year,value\nA,2001,1\nB,2002,2.5\nA,2003,3\n";
        let ds = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[0].label, "A");
        assert_eq!(ds[0].series.keys().copied().collect::<Vec<_>>(), vec![2001, 2003]);
        assert_eq!(ds[1].series[&2002], 2.5);
    }

    #[test]
    fn csv_duplicate_year_is_an_error() {
        let text = "label,year,value\nA,2001,1\nA,2001,2\n";
        assert!(read_csv(csv::Reader::from_reader(text.as_bytes())).is_err());
    }

    #[test]
    fn csv_errors_name_the_file_line() {
        let text = "label,year,value\nA,2001,x\n";
        let err = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap_err();
        assert!(err.to_string().starts_with("CSV line 2:"), "{err}");

        let text = "label,year,value\nA,2001,1\nB,2002,2\nA,2001,3\n";
        let err = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap_err();
        assert!(err.to_string().starts_with("CSV line 4:"), "{err}");
    }

    #[test]
    fn csv_missing_column_is_an_error() {
        let text = "label,year\nA,2001\n";
        let err = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap_err();
        assert!(err.to_string().contains("value"));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, r#"[["A", {{"2020": 5}}]]"#).unwrap();
        drop(f);
        let ds = load_file(&path).unwrap();
        assert_eq!(ds[0].series[&2020], 5.0);

        let bad = dir.path().join("data.xlsx");
        std::fs::write(&bad, b"").unwrap();
        assert!(load_file(&bad).is_err());
    }
}
