use yearline::dom::{Canvas, ElementId, LAZYLOAD_CLASS};
use yearline::{
    build_line_chart, on_ready, ChartConfig, ChartError, ChartRenderer, Dataset, JsonRenderer,
    LineChartOptions, MemoryDocument, RawDataset,
};

fn page_with_container(id: &str) -> (MemoryDocument, ElementId) {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let host = doc.add(body, "div");
    doc.set_id(host, id);
    (doc, host)
}

fn parse(json: &str) -> Vec<Dataset> {
    let raw: Vec<RawDataset> = serde_json::from_str(json).unwrap();
    raw.into_iter().map(|r| Dataset::try_from(r).unwrap()).collect()
}

#[test]
fn gap_is_zero_filled_and_bounds_returned() {
    let (mut doc, host) = page_with_container("hits");
    let mut renderer = JsonRenderer::new();
    let datasets = parse(r#"[["A", {"2020": 5, "2022": 9}]]"#);

    let chart = build_line_chart(
        &mut doc,
        &mut renderer,
        &datasets,
        "hits",
        &LineChartOptions::default(),
    )
    .unwrap();

    assert_eq!((chart.min_year, chart.max_year), (2020, 2022));
    let config: serde_json::Value = serde_json::from_str(renderer.get(chart.handle).unwrap()).unwrap();
    assert_eq!(config["data"]["labels"], serde_json::json!([2020, 2021, 2022]));
    assert_eq!(config["data"]["datasets"][0]["data"], serde_json::json!([5.0, 0.0, 9.0]));

    let canvas = doc.children(host)[0];
    assert_eq!(doc.tag(canvas), Some("canvas"));
    assert_eq!(doc.style(canvas, "height"), Some("50px"));
}

#[test]
fn single_year_is_padded_but_bounds_are_not() {
    let (mut doc, _) = page_with_container("c");
    let mut renderer = JsonRenderer::new();
    let datasets = parse(r#"[["A", {"2021": 4}]]"#);

    let chart =
        build_line_chart(&mut doc, &mut renderer, &datasets, "c", &LineChartOptions::default())
            .unwrap();

    assert_eq!((chart.min_year, chart.max_year), (2021, 2021));
    let config: serde_json::Value = serde_json::from_str(renderer.get(chart.handle).unwrap()).unwrap();
    assert_eq!(config["data"]["labels"], serde_json::json!([2019, 2020, 2021]));
    assert_eq!(config["data"]["datasets"][0]["data"], serde_json::json!([0.0, 0.0, 4.0]));
}

#[test]
fn each_call_mounts_its_own_canvas() {
    let (mut doc, host) = page_with_container("c");
    let mut renderer = JsonRenderer::new();
    let datasets = parse(r#"[["A", {"2000": 1, "2001": 2, "2002": 3}]]"#);
    let options = LineChartOptions {
        height: 420,
        ..LineChartOptions::default()
    };

    let first = build_line_chart(&mut doc, &mut renderer, &datasets, "c", &options).unwrap();
    let second = build_line_chart(&mut doc, &mut renderer, &datasets, "c", &options).unwrap();

    assert_eq!((first.handle, second.handle), (0, 1));
    assert_eq!(doc.children(host).len(), 2);
    assert_eq!(renderer.rendered()[1].0.height, 420);
}

#[test]
fn missing_container_fails_without_rendering() {
    let mut doc = MemoryDocument::new();
    let mut renderer = JsonRenderer::new();
    let datasets = parse(r#"[["A", {"2020": 1}]]"#);

    let err = build_line_chart(
        &mut doc,
        &mut renderer,
        &datasets,
        "absent",
        &LineChartOptions::default(),
    )
    .unwrap_err();

    assert_eq!(err, ChartError::MissingContainer("absent".into()));
    assert!(renderer.rendered().is_empty());
}

#[test]
fn empty_input_leaves_document_untouched() {
    let (mut doc, host) = page_with_container("c");
    let mut renderer = JsonRenderer::new();

    let err = build_line_chart(&mut doc, &mut renderer, &[], "c", &LineChartOptions::default())
        .unwrap_err();

    assert_eq!(err, ChartError::NoYears);
    assert!(doc.children(host).is_empty());
}

#[test]
fn oversized_year_span_mounts_no_canvas() {
    let (mut doc, host) = page_with_container("c");
    let mut renderer = JsonRenderer::new();
    let datasets = parse(r#"[["A", {"0": 1, "2020": 5}], ["B", {"2000000000": 2}]]"#);

    let err = build_line_chart(&mut doc, &mut renderer, &datasets, "c", &LineChartOptions::default())
        .unwrap_err();

    assert_eq!(err, ChartError::YearSpanTooLarge { min: 0, max: 2_000_000_000 });
    assert!(doc.children(host).is_empty());
    assert!(renderer.rendered().is_empty());
}

#[test]
fn malformed_year_keys_are_rejected_at_the_boundary() {
    let raw: Vec<RawDataset> = serde_json::from_str(r#"[["A", {"abc": 1}]]"#).unwrap();
    let err = Dataset::try_from(raw[0].clone()).unwrap_err();
    assert!(matches!(err, ChartError::InvalidDataset { .. }));
}

struct FailingRenderer;

impl ChartRenderer for FailingRenderer {
    type Handle = ();

    fn render(&mut self, _canvas: &Canvas, _config: &ChartConfig) -> Result<(), ChartError> {
        Err(ChartError::Render("no context".into()))
    }
}

#[test]
fn renderer_errors_propagate() {
    let (mut doc, _) = page_with_container("c");
    let datasets = parse(r#"[["A", {"2020": 1}]]"#);
    let err = build_line_chart(
        &mut doc,
        &mut FailingRenderer,
        &datasets,
        "c",
        &LineChartOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err, ChartError::Render("no context".into()));
}

#[test]
fn page_ready_then_chart() {
    let (mut doc, host) = page_with_container("trend");
    doc.set_width(host, 600.0);
    let body = doc.body();
    let figure = doc.add(body, "figure");
    doc.set_width(figure, 300.0);
    let img = doc.add(figure, "img");
    doc.add_class(img, LAZYLOAD_CLASS);
    doc.set_location_hash("#trend");

    let report = on_ready(&mut doc).unwrap();
    assert_eq!(report.resized, 1);
    assert_eq!(doc.scrolled(), &[host]);
    let expected = format!("{}px", 300.0 * std::f64::consts::SQRT_2);
    assert_eq!(doc.style(figure, "min-height"), Some(expected.as_str()));

    let mut renderer = JsonRenderer::new();
    let datasets = parse(r#"[["A", {"1999": 1}], ["B", {"2003": 2}]]"#);
    let chart = build_line_chart(
        &mut doc,
        &mut renderer,
        &datasets,
        "trend",
        &LineChartOptions::default(),
    )
    .unwrap();
    assert_eq!((chart.min_year, chart.max_year), (1999, 2003));
}
