mod app;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use app::YearlineApp;
use clap::{Parser, Subcommand};
use eframe::egui;
use log::info;
use state::AppState;
use yearline::dom::DocumentHandle;
use yearline::{build_line_chart, JsonRenderer, LineChartOptions, MemoryDocument};

#[derive(Parser)]
#[command(name = "yearline")]
#[command(about = "Year-axis line charts from sparse year → value datasets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the chart configuration and write it as JSON
    Export {
        /// Dataset file (.json, .csv or .parquet)
        file: PathBuf,

        /// JSON file with chart options
        #[arg(long)]
        options: Option<PathBuf>,

        /// Id of the element hosting the canvas
        #[arg(long, default_value = "chart")]
        container: String,

        /// Output path; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the chart in a window
    Preview {
        /// Dataset file to open on start
        file: Option<PathBuf>,

        /// JSON file with chart options
        #[arg(long)]
        options: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Export {
            file,
            options,
            container,
            out,
        }) => export(&file, options.as_deref(), &container, out.as_deref()),
        Some(Command::Preview { file, options }) => preview(file, options.as_deref()),
        None => preview(None, None),
    }
}

fn load_options(path: Option<&Path>) -> Result<LineChartOptions> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading options file {}", path.display()))?;
            LineChartOptions::from_json(&text).context("parsing options")
        }
        None => Ok(LineChartOptions::default()),
    }
}

fn export(file: &Path, options: Option<&Path>, container: &str, out: Option<&Path>) -> Result<()> {
    let options = load_options(options)?;
    let datasets = yearline::data::loader::load_file(file)?;

    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let host = doc.create_element("div");
    doc.set_id(host, container);
    doc.append_child(body, host);

    let mut renderer = JsonRenderer::new();
    let chart = build_line_chart(&mut doc, &mut renderer, &datasets, container, &options)?;
    info!("Year range {}–{}", chart.min_year, chart.max_year);

    let json = renderer
        .get(chart.handle)
        .context("renderer lost the configuration")?;
    let value: serde_json::Value = serde_json::from_str(json)?;
    let pretty = serde_json::to_string_pretty(&value)?;

    match out {
        Some(path) => {
            std::fs::write(path, pretty).with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote chart configuration to {}", path.display());
        }
        None => println!("{pretty}"),
    }
    Ok(())
}

fn preview(file: Option<PathBuf>, options: Option<&Path>) -> Result<()> {
    let mut state = AppState::with_options(load_options(options)?);
    if let Some(path) = file {
        let datasets = yearline::data::loader::load_file(&path)?;
        state.set_datasets(datasets, Some(path));
    }

    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Yearline – Chart Preview",
        native,
        Box::new(|_cc| Ok(Box::new(YearlineApp::new(state)))),
    )
    .map_err(|e| anyhow!("preview window failed: {e}"))
}
