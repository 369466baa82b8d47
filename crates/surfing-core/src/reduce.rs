//! ORAC-DR reductions, combined and per detector, and the housekeeping that
//! moves their products into the canonical tree.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::classify::{is_image, is_log, is_ndf};
use crate::datescan::Datescan;
use crate::detector::Polarization;
use crate::error::{Result, SurfingError};
use crate::pipeline::{PipelineStage, ProgressReporter};
use crate::services::{ReductionOutput, ReductionRequest};
use crate::summary::render_summary;
use crate::workspace::Workspace;

/// One ORAC-DR run and where its products were moved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReductionRecord {
    pub datescan: Datescan,
    /// `None` for a combined P0+P1 reduction.
    pub polarization: Option<Polarization>,
    pub output_dir: PathBuf,
    pub output: ReductionOutput,
}

/// Recipe and parameter file shared by every run of a batch.
#[derive(Clone, Copy, Debug)]
pub struct RecipeSpec<'a> {
    pub recipe: &'a str,
    pub parfile: Option<&'a Path>,
}

/// Check raw data is in place and create `reduced/<date>/<scan5>/` for each datescan.
///
/// A missing or empty raw directory is only warned about. Returns the datescans
/// without raw data.
pub fn setup_directories(ws: &Workspace, datescans: &[Datescan]) -> Result<Vec<Datescan>> {
    let mut missing = Vec::new();
    for ds in datescans {
        let raw_dir = ws.layout.raw_dir(ds);
        let has_raw = ws.store.is_dir(&raw_dir)
            && ws
                .store
                .list_files(&raw_dir)?
                .iter()
                .any(|p| is_ndf(p));
        if !has_raw {
            warn!(
                datescan = %ds,
                dir = %raw_dir.display(),
                "No raw data available; create and populate this directory with the raw SDF files to reduce"
            );
            missing.push(ds.clone());
        }
        ws.store.ensure_dir(&ws.layout.reduced_dir(ds))?;
    }
    Ok(missing)
}

/// Reduce P0 and P1 together, then write `Summary.txt`.
pub fn reduce_combined(
    ws: &Workspace,
    datescans: &[Datescan],
    recipe: RecipeSpec<'_>,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<ReductionRecord>> {
    setup_directories(ws, datescans)?;

    reporter.begin_stage(PipelineStage::ReducingCombined, Some(datescans.len()));
    let mut records = Vec::with_capacity(datescans.len());
    for (i, ds) in datescans.iter().enumerate() {
        reporter.set_message(&ds.to_string());
        let outpath = ws.layout.reduced_dir(ds);
        let record = reduce_one(ws, ds, None, &outpath, recipe)?;
        records.push(record);
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    let summary_path = ws.layout.summary_path();
    ws.store
        .write(&summary_path, render_summary(&records).as_bytes())?;
    info!(path = %summary_path.display(), "Summary written");

    Ok(records)
}

/// Reduce each polarization on its own by flagging the other chain's receptors bad.
pub fn reduce_individual(
    ws: &Workspace,
    datescans: &[Datescan],
    recipe: RecipeSpec<'_>,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<ReductionRecord>> {
    setup_directories(ws, datescans)?;

    let mut records = Vec::with_capacity(datescans.len() * Polarization::ALL.len());
    for pol in Polarization::ALL {
        let stage = match pol {
            Polarization::P0 => PipelineStage::ReducingP0,
            Polarization::P1 => PipelineStage::ReducingP1,
        };
        reporter.begin_stage(stage, Some(datescans.len()));
        for (i, ds) in datescans.iter().enumerate() {
            reporter.set_message(&format!("{ds} {pol}"));
            let outpath = ws.layout.detector_dir(ds, pol);
            ws.store.ensure_dir(&outpath)?;
            let record = reduce_one(ws, ds, Some(pol), &outpath, recipe)?;
            records.push(record);
            reporter.advance(i + 1);
        }
        reporter.finish_stage();
    }
    Ok(records)
}

/// Raw NDFs for a datescan, sorted.
pub fn collect_raw_files(ws: &Workspace, ds: &Datescan) -> Result<Vec<PathBuf>> {
    let raw_dir = ws.layout.raw_dir(ds);
    let no_data = || SurfingError::NoRawData {
        datescan: ds.to_string(),
        dir: raw_dir.clone(),
    };
    if !ws.store.is_dir(&raw_dir) {
        return Err(no_data());
    }
    let files: Vec<PathBuf> = ws
        .store
        .list_files(&raw_dir)?
        .into_iter()
        .filter(|p| is_ndf(p))
        .collect();
    if files.is_empty() {
        return Err(no_data());
    }
    Ok(files)
}

fn reduce_one(
    ws: &Workspace,
    ds: &Datescan,
    pol: Option<Polarization>,
    outpath: &Path,
    recipe: RecipeSpec<'_>,
) -> Result<ReductionRecord> {
    let raw_files = collect_raw_files(ws, ds)?;
    let request = ReductionRequest::new(outpath, recipe.recipe, raw_files)
        .with_recpars(recipe.parfile.map(Path::to_path_buf))
        .with_calib(pol.map(Polarization::bad_receptors_calib));

    info!(
        datescan = %ds,
        polarization = pol.map(|p| p.to_string()).unwrap_or_else(|| "P0+P1".into()),
        recipe = recipe.recipe,
        "Now running ORAC-DR"
    );
    let output = ws.services.reducer.reduce(&request)?;
    relocate_outputs(ws, &output.outdir, outpath)?;

    Ok(ReductionRecord {
        datescan: ds.clone(),
        polarization: pol,
        output_dir: outpath.to_path_buf(),
        output,
    })
}

/// Move a run's scratch directory into `dest`, then file logs and previews
/// into `logfiles/` and `imagefiles/`.
pub fn relocate_outputs(ws: &Workspace, outdir: &Path, dest: &Path) -> Result<()> {
    let moved = ws.store.move_contents(outdir, dest)?;
    debug!(count = moved.len(), from = %outdir.display(), to = %dest.display(), "Relocated products");
    ws.store.remove_dir_all(outdir)?;

    let logfiles = ws.layout.logfiles_dir(dest);
    ws.store.ensure_dir(&logfiles)?;
    let imagefiles = ws.layout.imagefiles_dir(dest);
    ws.store.ensure_dir(&imagefiles)?;

    for file in ws.store.list_files(dest)? {
        let Some(name) = file.file_name() else {
            continue;
        };
        if is_log(&file) {
            ws.store.rename(&file, &logfiles.join(name))?;
        } else if is_image(&file) {
            ws.store.rename(&file, &imagefiles.join(name))?;
        }
    }
    Ok(())
}
