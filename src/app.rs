// Declare modules
pub mod capture;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod minify;
pub mod models;
pub mod paths;
pub mod php;
pub mod rules;
pub mod walker;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::env;

use self::cli::Cli;
use self::config::{load_presets_file, presets_path, resolve_config};
use self::engine::Engine;
use self::formatter::OutputGenerator;
use self::php::PhpMinifier;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. No arguments at all: show usage and touch nothing
    if env::args_os().len() <= 1 {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }

    // 2. Parse Args (--help exits here)
    let args = Cli::parse();
    let json = args.json;

    // 3. Resolve Configuration
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let project_name = current_dir.file_name().and_then(|n| n.to_str());
    let presets = match presets_path() {
        Some(path) => load_presets_file(&path)?,
        None => {
            log::debug!("No home directory, presets disabled");
            Default::default()
        }
    };
    let config = resolve_config(args, &presets, project_name);

    if config.minify_extensions.is_empty() {
        log::warn!("⚠️ No extensions to minify; every file will be copied as is.");
    }

    // 4. Mirror the tree
    let engine = Engine::new(config, Box::new(PhpMinifier));
    let report = engine.run_with_summary().with_context(|| {
        format!(
            "Failed to mirror {} into {}",
            engine.config().source_root.display(),
            engine.config().target_root.display()
        )
    })?;

    // 5. Print the manifest
    if json {
        println!("{}", OutputGenerator::generate_json(&report.manifest)?);
    } else if !report.manifest.is_empty() {
        println!("{}", OutputGenerator::generate_listing(&report.manifest));
    }
    log::info!("Done: {}", OutputGenerator::format_summary(&report.summary));

    Ok(())
}
