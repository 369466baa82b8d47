use anyhow::{Context, Result};
use clap::Args;
use surfing_core::datescan::Datescan;

use super::ConfigSource;
use crate::summary::print_paths;

#[derive(Args)]
pub struct PathsArgs {
    /// Datescan to resolve, e.g. 20220307_73. Defaults to every configured datescan.
    pub datescan: Option<String>,

    #[command(flatten)]
    pub source: ConfigSource,
}

pub fn run(args: &PathsArgs) -> Result<()> {
    let config = args.source.load()?;
    let layout = config.layout();

    let datescans = match args.datescan {
        Some(ref value) => vec![value
            .parse::<Datescan>()
            .with_context(|| format!("Invalid datescan '{value}'"))?],
        None => config.datescans.clone(),
    };
    for ds in &datescans {
        print_paths(&layout, &config, ds);
    }
    Ok(())
}
