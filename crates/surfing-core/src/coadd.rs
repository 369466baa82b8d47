//! Incremental co-adds per region and molecule.
//!
//! New cubes are first mosaicked into a single increment, which is then merged
//! pairwise into the official co-add. Running the same datescan twice merges
//! it twice; there is no record of which datescans a co-add already holds.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::classify::is_reduced_cube;
use crate::datescan::Datescan;
use crate::error::Result;
use crate::molecule::{Molecule, MoleculeTable};
use crate::pipeline::{PipelineStage, ProgressReporter};
use crate::workspace::Workspace;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoaddOutcome {
    /// None of the datescans produced a cube for this molecule.
    NoNewData { molecule: String },
    Updated {
        molecule: String,
        /// Reduced cubes folded into the co-add this run.
        inputs: Vec<PathBuf>,
        /// `false` when this run created the co-add.
        merged_with_existing: bool,
        sdf: PathBuf,
        fits: PathBuf,
    },
}

/// `ga*_<subband>_reduced0*.sdf` cubes for `molecule`, datescans in order.
pub fn collect_reduced_cubes(
    ws: &Workspace,
    datescans: &[Datescan],
    molecule: &Molecule,
) -> Result<Vec<PathBuf>> {
    let mut cubes = Vec::new();
    for ds in datescans {
        let dir = ws.layout.reduced_dir(ds);
        if !ws.store.is_dir(&dir) {
            continue;
        }
        cubes.extend(
            ws.store
                .list_files(&dir)?
                .into_iter()
                .filter(|p| is_reduced_cube(p, molecule.subband)),
        );
    }
    Ok(cubes)
}

pub fn coadd_results(
    ws: &Workspace,
    datescans: &[Datescan],
    molecules: &MoleculeTable,
    region: &str,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<CoaddOutcome>> {
    reporter.begin_stage(PipelineStage::CoAdding, Some(molecules.len()));
    let mut outcomes = Vec::with_capacity(molecules.len());
    for (i, molecule) in molecules.iter().enumerate() {
        reporter.set_message(&molecule.name);
        outcomes.push(coadd_molecule(ws, datescans, molecule, region)?);
        reporter.advance(i + 1);
    }
    reporter.finish_stage();
    Ok(outcomes)
}

/// Fold the new cubes for one molecule into `coadds/<region>_<molecule>_coadd.sdf`
/// and regenerate its FITS copy.
pub fn coadd_molecule(
    ws: &Workspace,
    datescans: &[Datescan],
    molecule: &Molecule,
    region: &str,
) -> Result<CoaddOutcome> {
    let cubes = collect_reduced_cubes(ws, datescans, molecule)?;
    if cubes.is_empty() {
        info!(
            molecule = %molecule.name,
            subband = molecule.subband,
            "No ga*_{}_reduced0*.sdf files to co-add; no new {} data in the listed datescans",
            molecule.subband,
            molecule.name
        );
        return Ok(CoaddOutcome::NoNewData {
            molecule: molecule.name.clone(),
        });
    }

    // Combine this run's cubes into a single increment.
    let temp_dir = ws.layout.coadd_temp_dir();
    ws.store.ensure_dir(&temp_dir)?;
    let increment = ws.layout.coadd_temp_path(region, molecule);
    if let [single] = cubes.as_slice() {
        ws.store.copy(single, &increment)?;
    } else {
        ws.services.kappa.wcsmosaic(&cubes, &cubes[0], &increment)?;
        ws.expect_output("kappa:wcsmosaic", &increment)?;
    }
    debug!(molecule = %molecule.name, inputs = cubes.len(), "Increment ready");

    // Merge the increment into the official co-add, or promote it.
    ws.store.ensure_dir(&ws.layout.coadds_dir())?;
    let official = ws.layout.coadd_sdf(region, molecule);
    let merged_with_existing = ws.store.exists(&official);
    if merged_with_existing {
        let merged = ws.layout.coadd_new_path(region, molecule);
        ws.services
            .kappa
            .wcsmosaic(&[increment.clone(), official.clone()], &official, &merged)?;
        ws.expect_output("kappa:wcsmosaic", &merged)?;
        ws.store.replace(&merged, &official)?;
        info!(molecule = %molecule.name, coadd = %official.display(), "Merged into existing co-add");
    } else {
        ws.store.rename(&increment, &official)?;
        info!(molecule = %molecule.name, coadd = %official.display(), "Created co-add");
    }
    ws.store.remove_dir_all(&temp_dir)?;

    let fits = ws.layout.coadd_fits(region, molecule);
    if ws.store.exists(&fits) {
        ws.store.remove_file(&fits)?;
    }
    ws.services.convert.ndf2fits(&official, &fits)?;
    ws.expect_output("convert:ndf2fits", &fits)?;

    Ok(CoaddOutcome::Updated {
        molecule: molecule.name.clone(),
        inputs: cubes,
        merged_with_existing,
        sdf: official,
        fits,
    })
}
