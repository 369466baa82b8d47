mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "surfing", about = "HARP/ACSIS reduction and co-adding for SURFING")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full reduction: reduce, residuals, co-add, convert
    Run(commands::pipeline::RunArgs),
    /// Reduce datescans with ORAC-DR
    Reduce(commands::reduce::ReduceArgs),
    /// Subtract P0 moment 0 maps from P1 moment 0 maps
    Residuals(commands::residuals::ResidualsArgs),
    /// Merge reduced cubes into the region co-adds
    Coadd(commands::coadd::CoaddArgs),
    /// Convert reduced SDF files to FITS
    Convert(commands::convert::ConvertArgs),
    /// Print or save a default config file
    Config(commands::config::ConfigArgs),
    /// Show where products for a datescan are kept
    Paths(commands::paths::PathsArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Run(args) => commands::pipeline::run(args),
        Commands::Reduce(args) => commands::reduce::run(args),
        Commands::Residuals(args) => commands::residuals::run(args),
        Commands::Coadd(args) => commands::coadd::run(args),
        Commands::Convert(args) => commands::convert::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Paths(args) => commands::paths::run(args),
    }
}
