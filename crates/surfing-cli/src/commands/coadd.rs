use anyhow::{Context, Result};
use clap::Args;
use surfing_core::coadd::coadd_results;

use super::{ConfigSource, Session};
use crate::progress::BarReporter;
use crate::summary::print_coadds;

#[derive(Args)]
pub struct CoaddArgs {
    #[command(flatten)]
    pub source: ConfigSource,
}

/// Each invocation merges the listed datescans again, even if an earlier run
/// already folded them in.
pub fn run(args: &CoaddArgs) -> Result<()> {
    let session = Session::open(&args.source)?;
    let reporter = BarReporter::new()?;

    let outcomes = coadd_results(
        &session.workspace(),
        &session.config.datescans,
        &session.config.molecules,
        &session.config.region,
        &reporter,
    )
    .context("Co-adding failed")?;

    print_coadds(&outcomes);
    Ok(())
}
