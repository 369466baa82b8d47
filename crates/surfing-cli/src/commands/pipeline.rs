use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use surfing_core::pipeline::run_pipeline_reported;

use super::{ConfigSource, Session};
use crate::progress::BarReporter;
use crate::summary::{print_banner, print_reduction_summary, print_report, print_run_plan};

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: ConfigSource,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let session = Session::open(&args.source)?;
    print_run_plan(&session.config);

    let reporter = Arc::new(BarReporter::new()?);
    let report = run_pipeline_reported(&session.config, &session.workspace(), reporter)
        .context("SURFING reduction failed")?;

    print_reduction_summary(&report.combined);
    print_report(&report);
    println!(
        "\nSummary written to {}",
        session.layout.summary_path().display()
    );
    print_banner();

    Ok(())
}
