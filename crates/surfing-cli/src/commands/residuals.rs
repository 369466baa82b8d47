use anyhow::{Context, Result};
use clap::Args;
use surfing_core::residuals::moment0_residuals;

use super::{ConfigSource, Session};
use crate::progress::BarReporter;
use crate::summary::print_residuals;

#[derive(Args)]
pub struct ResidualsArgs {
    #[command(flatten)]
    pub source: ConfigSource,
}

/// Needs the P0/ and P1/ reductions from `surfing reduce`.
pub fn run(args: &ResidualsArgs) -> Result<()> {
    let session = Session::open(&args.source)?;
    let reporter = BarReporter::new()?;

    let outcomes = moment0_residuals(
        &session.workspace(),
        &session.config.datescans,
        &session.config.molecules,
        &reporter,
    )
    .context("Moment 0 residuals failed")?;

    print_residuals(&outcomes);
    Ok(())
}
