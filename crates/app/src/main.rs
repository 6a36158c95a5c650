mod state;
mod ui;

use clap::Parser;
use eframe::egui;
use salesmap_core::{Config, DataSource};
use state::AppState;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "salesmap-app", about = "Interactive video game sales treemap")]
struct Args {
    /// Dataset URL or local JSON file (defaults to the configured URL)
    source: Option<String>,
    /// JSON config file; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
}

struct SalesMapApp {
    state: AppState,
}

impl SalesMapApp {
    fn new(_cc: &eframe::CreationContext<'_>, config: Config, source: Option<DataSource>) -> Self {
        let mut state = AppState::new(config);
        match source {
            Some(source) => state.start_load(source),
            None => state.load_default(),
        }
        Self { state }
    }
}

impl eframe::App for SalesMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::draw(&mut self.state, ctx);
    }
}

fn main() -> anyhow::Result<()> {
    salesmap_core::logging::init("info");
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    let source = args.source.as_deref().map(DataSource::parse).transpose()?;

    let width = (config.layout.width as f32).max(config.legend.width as f32) + 40.0;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([width, 1000.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Video Game Sales",
        options,
        Box::new(move |cc| Ok(Box::new(SalesMapApp::new(cc, config, source)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
