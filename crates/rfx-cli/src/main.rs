//! rfx - preview and timing tool for rfx effects
//!
//! Renders any built-in effect over a synthetic test pattern, split into
//! region tiles, and reports the time taken and a hash of the result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "rfx")]
#[command(author, version, about = "Raster effect preview and timing tool")]
#[command(long_about = "
Renders rfx effects over synthetic test patterns.

Examples:
  rfx render -e median --size 1024x768          # Default median filter
  rfx render -e median -p median.yaml -t 4x4    # Parameters from YAML, 16 tiles
  rfx render -e soften-portrait --pattern noise --sequential
  rfx params -e levels                           # Parameter table and defaults
  rfx palette                                    # Default palette colors
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an effect over a test pattern
    #[command(visible_alias = "r")]
    Render(RenderArgs),

    /// Show an effect's parameters and defaults
    #[command(visible_alias = "p")]
    Params(ParamsArgs),

    /// Print the default palette, or a palette loaded from a file
    Palette(PaletteArgs),
}

/// Arguments for the `render` command.
#[derive(Args)]
struct RenderArgs {
    /// Effect name (median, reduce-noise, gaussian-blur, levels, posterize,
    /// brightness-contrast, soften-portrait)
    #[arg(short, long)]
    effect: String,

    /// YAML file with parameter overrides (`name: value` per line)
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Surface size as WIDTHxHEIGHT
    #[arg(short, long, default_value = "512x512")]
    size: String,

    /// Test pattern: checker, gradient, noise
    #[arg(long, default_value = "gradient")]
    pattern: String,

    /// Region tiling as COLSxROWS
    #[arg(short, long, default_value = "1x1")]
    tiles: String,

    /// Render on the calling thread only
    #[arg(long)]
    sequential: bool,

    /// Number of timed repetitions
    #[arg(short = 'n', long, default_value = "1")]
    repeat: usize,
}

/// Arguments for the `params` command.
#[derive(Args)]
struct ParamsArgs {
    /// Effect name
    #[arg(short, long)]
    effect: String,
}

/// Arguments for the `palette` command.
#[derive(Args)]
struct PaletteArgs {
    /// Palette file of `#RRGGBB` lines; omit for the default palette
    input: Option<PathBuf>,

    /// Resize the palette before printing
    #[arg(long)]
    resize: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Render(args) => commands::render::run(args, cli.verbose),
        Commands::Params(args) => commands::params::run(args),
        Commands::Palette(args) => commands::palette::run(args, cli.verbose),
    }
}
