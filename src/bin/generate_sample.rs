use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Sparse yearly counts: each year is skipped with probability `gap`.
fn generate_series(
    first: i32,
    last: i32,
    base: f64,
    trend: f64,
    gap: f64,
    rng: &mut StdRng,
) -> Vec<(i32, f64)> {
    let mut out = Vec::new();
    for year in first..=last {
        if rng.gen_bool(gap) {
            continue;
        }
        let t = (year - first) as f64;
        let noise: f64 = rng.gen_range(-0.15..0.15);
        let value = (base + trend * t) * (1.0 + noise);
        out.push((year, value.max(0.0).round()));
    }
    out
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = StdRng::seed_from_u64(42);

    // (label, first year, last year, base, trend per year, gap probability)
    let specs = [
        ("Bund", 1993, 2023, 40.0, 2.5, 0.05),
        ("Bayern", 1995, 2023, 25.0, 1.0, 0.2),
        ("Berlin", 2001, 2023, 10.0, 3.0, 0.3),
        ("Sachsen", 2010, 2020, 60.0, -2.0, 0.0),
        ("Hamburg", 2018, 2018, 12.0, 0.0, 0.0),
    ];

    let mut labels: Vec<String> = Vec::new();
    let mut years: Vec<i32> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    let mut pairs = Vec::new();

    for &(label, first, last, base, trend, gap) in &specs {
        let series = generate_series(first, last, base, trend, gap, &mut rng);
        let keyed: serde_json::Map<String, serde_json::Value> = series
            .iter()
            .map(|&(year, value)| (year.to_string(), serde_json::json!(value)))
            .collect();
        pairs.push(serde_json::json!([label, keyed]));

        for (year, value) in series {
            labels.push(label.to_string());
            years.push(year);
            values.push(value);
        }
    }

    // JSON in the page-template shape
    let json_path = "sample_datasets.json";
    std::fs::write(json_path, serde_json::to_string_pretty(&pairs)?)
        .with_context(|| format!("writing {json_path}"))?;

    // CSV, long format
    let csv_path = "sample_datasets.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV")?;
    writer.write_record(["label", "year", "value"])?;
    for ((label, year), value) in labels.iter().zip(&years).zip(&values) {
        writer.write_record([label.clone(), year.to_string(), value.to_string()])?;
    }
    writer.flush()?;

    // Parquet, long format
    let schema = Arc::new(Schema::new(vec![
        Field::new("label", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("value", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                labels.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int32Array::from(years.clone())),
            Arc::new(Float64Array::from(values.clone())),
        ],
    )
    .context("building record batch")?;

    let parquet_path = "sample_datasets.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!(
        "Wrote {} datasets ({} observations) to {json_path}, {csv_path} and {parquet_path}",
        specs.len(),
        values.len()
    );
    Ok(())
}
