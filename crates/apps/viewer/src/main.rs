use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use viewer::{ChoroplethMap, ViewerConfig, load_countries, source_for};

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a world choropleth map as SVG")]
struct Args {
    /// JSON config file (default: $ATLAS_CONFIG, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Attribute table location, file path or http(s) URL
    #[arg(long)]
    tsv_url: Option<String>,

    /// TopoJSON topology location, file path or http(s) URL
    #[arg(long)]
    topology_url: Option<String>,

    /// Output SVG file
    #[arg(long)]
    out: Option<PathBuf>,

    /// Fit the projection to the loaded features
    #[arg(long)]
    fit: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run(Args::parse()).await {
        error!("choropleth failed: {err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)?.with_overrides(|k| std::env::var(k).ok()),
        None => ViewerConfig::load()?,
    };
    if let Some(url) = args.tsv_url {
        config.tsv_url = url;
    }
    if let Some(url) = args.topology_url {
        config.topology_url = url;
    }
    if let Some(out) = args.out {
        config.out = out;
    }
    config.fit_to_viewport |= args.fit;

    let client = reqwest::Client::new();
    let attributes = source_for(&config.tsv_url, &client);
    let topology = source_for(&config.topology_url, &client);
    let loaded = load_countries(
        attributes.as_ref(),
        topology.as_ref(),
        &config.object_name,
        &config.join_key,
    )
    .await?;

    let mut map = ChoroplethMap::new(&config)?;
    map.render(&loaded.countries)?;
    let svg = map.to_svg()?;

    tokio::fs::write(&config.out, svg).await?;
    info!(
        out = %config.out.display(),
        unmatched = loaded.report.unmatched.len(),
        "wrote choropleth"
    );
    Ok(())
}
