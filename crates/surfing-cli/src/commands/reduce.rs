use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use surfing_core::reduce::{reduce_combined, reduce_individual};

use super::{ConfigSource, Session};
use crate::progress::BarReporter;
use crate::summary::{print_reduction_summary, print_reductions, print_run_plan};

#[derive(Clone, Copy, ValueEnum)]
pub enum ReduceMode {
    /// Both polarizations together; writes Summary.txt
    Combined,
    /// P0 and P1 separately, into P0/ and P1/
    Individual,
    /// Combined, then individual
    Both,
}

#[derive(Args)]
pub struct ReduceArgs {
    #[command(flatten)]
    pub source: ConfigSource,

    /// Which reductions to run
    #[arg(long, value_enum, default_value = "both")]
    pub mode: ReduceMode,
}

pub fn run(args: &ReduceArgs) -> Result<()> {
    let session = Session::open(&args.source)?;
    print_run_plan(&session.config);

    let ws = session.workspace();
    let reporter = BarReporter::new()?;
    let datescans = &session.config.datescans;
    let recipe = session.config.recipe_spec();

    if matches!(args.mode, ReduceMode::Combined | ReduceMode::Both) {
        let records = reduce_combined(&ws, datescans, recipe, &reporter)
            .context("Combined reduction failed")?;
        print_reduction_summary(&records);
        print_reductions(&records);
    }
    if matches!(args.mode, ReduceMode::Individual | ReduceMode::Both) {
        let records = reduce_individual(&ws, datescans, recipe, &reporter)
            .context("Per-detector reduction failed")?;
        print_reductions(&records);
    }

    Ok(())
}
