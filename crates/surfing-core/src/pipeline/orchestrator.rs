use std::sync::Arc;

use tracing::info;

use crate::coadd::coadd_results;
use crate::convert::convert_to_fits;
use crate::error::Result;
use crate::reduce::{reduce_combined, reduce_individual};
use crate::residuals::moment0_residuals;
use crate::workspace::Workspace;

use super::config::PipelineConfig;
use super::types::{NoOpReporter, PipelineReport, ProgressReporter};

/// Run every step in order with a progress reporter.
///
/// Steps share the product tree: each one reads what the previous one left on
/// disk, so a failure aborts the run with the tree as it stood at that point.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    ws: &Workspace,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineReport> {
    config.validate()?;
    let datescans = &config.datescans;
    let recipe = config.recipe_spec();
    info!(
        region = %config.region,
        datescans = datescans.len(),
        recipe = %config.recipe,
        "Starting SURFING reduction"
    );

    info!("Reducing P0 and P1 together");
    let combined = reduce_combined(ws, datescans, recipe, reporter.as_ref())?;

    info!("Reducing P0 and P1 separately");
    let individual = reduce_individual(ws, datescans, recipe, reporter.as_ref())?;

    info!("Subtracting P0 moment 0 maps from P1 moment 0 maps");
    let residuals = moment0_residuals(ws, datescans, &config.molecules, reporter.as_ref())?;

    info!("Co-adding the results with the main files");
    let coadds = coadd_results(
        ws,
        datescans,
        &config.molecules,
        &config.region,
        reporter.as_ref(),
    )?;

    info!("Converting SDF files to FITS");
    let converted = convert_to_fits(ws, datescans, reporter.as_ref())?;

    Ok(PipelineReport {
        combined,
        individual,
        residuals,
        coadds,
        converted,
    })
}

/// Run every step in order.
pub fn run_pipeline(config: &PipelineConfig, ws: &Workspace) -> Result<PipelineReport> {
    run_pipeline_reported(config, ws, Arc::new(NoOpReporter))
}
