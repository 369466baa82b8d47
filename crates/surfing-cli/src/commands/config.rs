use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use surfing_core::datescan::parse_datescans;
use surfing_core::pipeline::config::PipelineConfig;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,

    /// Region to put in the template
    #[arg(long)]
    pub region: Option<String>,

    /// Comma-separated datescans to put in the template
    #[arg(long, value_delimiter = ',')]
    pub datescans: Option<Vec<String>>,
}

/// Print or save a starter surfing.toml built from the defaults.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let mut config = PipelineConfig::default();
    if let Some(ref region) = args.region {
        config.region = region.clone();
    }
    if let Some(ref values) = args.datescans {
        config.datescans = parse_datescans(values).context("Invalid --datescans")?;
    }
    config.validate().context("Invalid config template")?;
    let toml_str = toml::to_string_pretty(&config)?;

    match args.output {
        Some(ref path) => {
            if path.exists() && !args.force {
                bail!("{} already exists; pass --force to overwrite", path.display());
            }
            std::fs::write(path, &toml_str)
                .with_context(|| format!("Failed to write config to {}", path.display()))?;
            println!("Default config saved to {}", path.display());
        }
        None => print!("{}", toml_str),
    }

    Ok(())
}
