//! `pix-exhibits` - render the Pix vs CoDi/DiMo exhibits
//!
//! `pix-exhibits list` prints the catalogue; `pix-exhibits render` writes
//! PNG/SVG files and a manifest into the output directory.

use anyhow::{Context, Result};
use clap::Parser;
use pix_exhibits::cli::{Cli, Command, RenderArgs};
use pix_exhibits::config::{load_user_properties, RenderConfig};
use pix_exhibits::exhibits::catalog::{catalog, select};
use pix_exhibits::exhibits::palettes::palette_registry;
use pix_exhibits::exhibits::render_properties::registry;
use pix_exhibits::{generate_exhibits, init_logging};
use std::path::Path;

#[cfg(feature = "jemalloc")]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    let result = match &cli.command {
        Command::List => {
            list_exhibits();
            Ok(())
        }
        Command::Properties => {
            list_properties();
            Ok(())
        }
        Command::Render(args) => render(cli.config.as_deref(), args).await,
    };

    if let Err(e) = result {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn list_exhibits() {
    for exhibit in catalog() {
        println!("{:<10} {:<48} {}", exhibit.id, exhibit.file_stem, exhibit.summary);
    }
}

fn list_properties() {
    for def in registry().definitions() {
        let allowed = def
            .valid_values
            .as_ref()
            .map(|values| format!(" [{}]", values.join("|")))
            .unwrap_or_default();
        println!("{:<16} {:<12} {}{}", def.name, def.default_value, def.description, allowed);
    }

    let palettes = palette_registry();
    println!();
    println!("categorical palettes: {}", palettes.categorical_palettes().join(", "));
    println!("status palettes:      {}", palettes.status_palettes().join(", "));
}

async fn render(config_file: Option<&Path>, args: &RenderArgs) -> Result<()> {
    tracing::info!("pix-exhibits v{}", env!("CARGO_PKG_VERSION"));

    let mut values = load_user_properties(config_file).context("Failed to load configuration")?;
    values.extend(args.overrides());
    let config = RenderConfig::from_properties(&values);

    let selection = select(args.only.as_slice()).context("Invalid exhibit selection")?;

    let outputs = generate_exhibits(&selection, &config)
        .await
        .context("Exhibit generation failed")?;

    let files: usize = outputs
        .iter()
        .map(|o| o.png.is_some() as usize + o.svg.is_some() as usize)
        .sum();
    tracing::info!(
        "✓ {} exhibit(s), {} file(s) in {}",
        outputs.len(),
        files,
        config.output_dir.display()
    );
    Ok(())
}
