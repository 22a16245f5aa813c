//! forgework - anvil smithing and casting calculations over a content pack
//!
//! Loads a JSON content pack and TOML smithing settings, runs one query and
//! prints the result as JSON.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use commands::Command;
use forgework_assets::catalog_from_file;
use forgework_smithing::Smithy;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Anvil smithing and mold casting calculator", long_about = None)]
struct Args {
    /// JSON content pack with items, smithing recipes and molds
    #[arg(long)]
    pack: PathBuf,
    /// TOML smithing settings (defaults to config/smithing.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    // WARN by default, overridable via RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let catalog = catalog_from_file(&args.pack)
        .with_context(|| format!("failed to load content pack {}", args.pack.display()))?;
    let config = config::load_smithing_config(args.config.as_deref());
    info!(pack = %args.pack.display(), "content pack loaded");

    let smithy = Smithy::new(catalog, config);
    let output = args.command.run(&smithy)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
