use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use fundmap_core::config::RenderConfig;
use fundmap_core::export;
use fundmap_core::human::format_currency;
use fundmap_core::loader::{load, Source, DEFAULT_SOURCE};
use fundmap_core::render::generate_treemap_padded;

#[derive(Parser, Debug)]
#[command(name = "fundmap-cli", about = "Treemap renderer for funding datasets")]
struct Args {
    /// JSON document: a file path or an http(s) URL
    #[arg(default_value = DEFAULT_SOURCE)]
    source: String,
    /// Write a standalone HTML page
    #[arg(long)]
    html: Option<PathBuf>,
    /// Write the chart SVG
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Write the legend SVG
    #[arg(long)]
    legend_svg: Option<PathBuf>,
    /// Write one CSV row per tile
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Write the computed layout as JSON
    #[arg(short, long)]
    json: Option<PathBuf>,
    /// JSON file with render settings
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    padding: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    fundmap_core::init_logging();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<RenderConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RenderConfig::default(),
    };
    if let Some(w) = args.width {
        config.width = w;
    }
    if let Some(h) = args.height {
        config.height = h;
    }
    if let Some(p) = args.padding {
        config.padding = p;
    }

    let source = Source::parse(&args.source);
    let data = match load(&source) {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(%source, error = %e, "failed to load document");
            return Err(e).context("loading document");
        }
    };

    let (mut container, mut svg, mut legend) = config.surfaces();
    let session = generate_treemap_padded(&mut container, &mut svg, &mut legend, &data, config.padding)
        .context("rendering treemap")?;

    if let Some(path) = &args.html {
        std::fs::write(path, export::to_html(&config, &svg, &legend))
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.svg {
        std::fs::write(path, svg.to_svg()).with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.legend_svg {
        std::fs::write(path, legend.to_svg())
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &args.csv {
        let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        export::to_csv(&session, std::io::BufWriter::new(file))?;
    }
    if let Some(path) = &args.json {
        let json = export::to_json(&session);
        std::fs::write(path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    println!(
        "Rendered {} tiles in {} categories, {} total",
        session.tiles.len(),
        session.categories.len(),
        format_currency(session.hierarchy.total_value())
    );
    Ok(())
}
