use anyhow::Context;
use clap::Parser;
use salesmap_core::export;
use salesmap_core::label::FixedAdvance;
use salesmap_core::{Config, DataSource, Visualization};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "salesmap-cli", about = "Render a video game sales treemap to SVG")]
struct Args {
    /// Dataset URL or local JSON file (defaults to the configured URL)
    source: Option<String>,
    /// JSON config file; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Treemap SVG output path
    #[arg(short, long, default_value = "treemap.svg")]
    svg: PathBuf,
    /// Legend SVG output path
    #[arg(short, long)]
    legend: Option<PathBuf>,
    /// Tile report as JSON
    #[arg(short, long)]
    json: Option<PathBuf>,
    /// Tile report as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Gap between tiles
    #[arg(long)]
    padding: Option<f64>,
    /// Canvas width
    #[arg(long)]
    width: Option<f64>,
    /// Canvas height
    #[arg(long)]
    height: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    salesmap_core::logging::init("info");
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(p) = args.padding {
        config.layout.padding = p;
    }
    if let Some(w) = args.width {
        config.layout.width = w;
    }
    if let Some(h) = args.height {
        config.layout.height = h;
    }

    let source = DataSource::parse(args.source.as_deref().unwrap_or(&config.data_url))?;
    let tree = match source.load() {
        Ok(tree) => tree,
        Err(e) => {
            tracing::error!("error fetching data: {e}");
            return Err(e.into());
        }
    };
    let vis = Visualization::draw(tree, &config, &FixedAdvance::default())?;

    std::fs::write(&args.svg, export::to_svg(&vis.treemap.scene()))
        .with_context(|| format!("writing {}", args.svg.display()))?;
    if let Some(path) = &args.legend {
        std::fs::write(path, export::to_svg(&vis.legend.scene()))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.json {
        let json = export::to_json(&vis.treemap);
        std::fs::write(path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.csv {
        let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export::to_csv(&vis.treemap, std::io::BufWriter::new(file))?;
    }

    println!(
        "Rendered {} tiles in {} categories from {} ({} skipped)",
        vis.treemap.tiles.len(),
        vis.categories.len(),
        source,
        vis.hierarchy.rejected.len()
    );
    Ok(())
}
