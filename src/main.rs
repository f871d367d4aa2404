//! Command line front end for browsing destinations and auditing their image fallbacks.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use destination_gallery::asset_paths::{AttemptMarker, image_source, resolve_fallback};
use destination_gallery::logging::init_tracing;
use destination_gallery::store::RefreshOutcome;
use destination_gallery::{DestinationStore, GalleryConfig, HttpBackend};

#[derive(Debug, Parser)]
#[command(name = "destination-gallery", version, about)]
struct Cli {
    /// Configuration file. Defaults to `gallery.config.json` in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Backend base URL, overriding the configuration.
    #[arg(long, global = true)]
    backend: Option<String>,
    /// Image asset directory, overriding the configuration.
    #[arg(long, global = true)]
    asset_base: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and print the destinations.
    List {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Ask the backend to regenerate its data, then print the destinations.
    Refresh {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Run one step of the image fallback chain.
    Resolve {
        /// Display name of the destination.
        #[arg(long)]
        name: String,
        /// Source that just failed to load.
        #[arg(long)]
        source: String,
        /// The extension swap was already tried for this element.
        #[arg(long)]
        swap_tried: bool,
    },
    /// Print every image source each destination may fall back to.
    Candidates,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Command::List { json } => {
            let mut store = open_store(&config)?;
            store.load();
            print_destinations(&config, &store, json)
        }
        Command::Refresh { json } => {
            let mut store = open_store(&config)?;
            let outcome = store.refresh();
            if let Some(message) = store.status_message(Instant::now()) {
                eprintln!("{message}");
            }
            if matches!(outcome, RefreshOutcome::Failed) {
                store.load();
            }
            print_destinations(&config, &store, json)
        }
        Command::Resolve {
            name,
            source,
            swap_tried,
        } => {
            let marker = if swap_tried {
                AttemptMarker::SwapTried
            } else {
                AttemptMarker::NotTried
            };
            let step = resolve_fallback(&source, marker, &name, &config.asset_base());
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "source": step.source,
                    "state": format!("{:?}", step.state),
                    "swap_tried": step.marker == AttemptMarker::SwapTried,
                    "changed": step.source != source,
                }))?
            );
            Ok(())
        }
        Command::Candidates => {
            let mut store = open_store(&config)?;
            store.load();
            for (destination, candidates) in store.image_candidates() {
                println!("{}", destination.name);
                for candidate in candidates {
                    println!("  {candidate}");
                }
            }
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<GalleryConfig> {
    let mut config = match &cli.config {
        Some(path) => GalleryConfig::from_path(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("failed to resolve working directory")?;
            GalleryConfig::discover(&cwd)
        }
    };
    config = config.with_backend_override(cli.backend.clone());
    if let Some(dir) = &cli.asset_base {
        config.asset_base_dir = dir.clone();
    }
    Ok(config)
}

fn open_store(config: &GalleryConfig) -> Result<DestinationStore<HttpBackend>> {
    let backend = HttpBackend::from_config(config)?;
    Ok(DestinationStore::from_config(backend, config))
}

fn print_destinations(
    config: &GalleryConfig,
    store: &DestinationStore<HttpBackend>,
    as_json: bool,
) -> Result<()> {
    let base = store.asset_base();

    if as_json {
        let items: Vec<_> = store
            .destinations()
            .iter()
            .map(|destination| {
                json!({
                    "destination": destination,
                    "image_src": image_source(destination, base),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("{}", config.title);
    if store.destinations().is_empty() {
        println!("(no destinations)");
        return Ok(());
    }

    for (index, destination) in store.destinations().iter().enumerate() {
        println!();
        println!(
            "{}. {}, {} ({})",
            index + 1,
            destination.name,
            destination.state,
            destination.region
        );
        if !destination.summary.is_empty() {
            println!("   {}", destination.summary);
        }
        if !destination.best_time.is_empty() {
            println!("   best time: {}", destination.best_time);
        }
        if !destination.tags().is_empty() {
            println!("   tags: {}", destination.tags().join(", "));
        }
        println!("   image: {}", image_source(destination, base));
    }

    Ok(())
}
