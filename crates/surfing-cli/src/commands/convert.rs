use anyhow::{Context, Result};
use clap::Args;
use surfing_core::convert::convert_to_fits;

use super::{ConfigSource, Session};
use crate::progress::BarReporter;
use crate::summary::print_converted;

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub source: ConfigSource,
}

pub fn run(args: &ConvertArgs) -> Result<()> {
    let session = Session::open(&args.source)?;
    let reporter = BarReporter::new()?;

    let written = convert_to_fits(&session.workspace(), &session.config.datescans, &reporter)
        .context("FITS conversion failed")?;

    print_converted(&written);
    Ok(())
}
