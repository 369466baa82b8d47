//! P1 minus P0 moment-0 maps, one per datescan and molecule.
//!
//! With two healthy detectors the residual is blank; structure in it points at
//! an artifact or sensitivity difference in one chain.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::classify::is_moment0;
use crate::datescan::Datescan;
use crate::detector::Polarization;
use crate::error::Result;
use crate::molecule::{Molecule, MoleculeTable};
use crate::pipeline::{PipelineStage, ProgressReporter};
use crate::workspace::Workspace;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResidualOutcome {
    Computed {
        datescan: Datescan,
        molecule: String,
        path: PathBuf,
    },
    /// At least one detector had no moment-0 map for this molecule.
    Skipped {
        datescan: Datescan,
        molecule: String,
        missing: Vec<Polarization>,
    },
}

impl ResidualOutcome {
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed { .. })
    }
}

/// Moment-0 map for `molecule` reduced from a single detector, if any.
///
/// When ORAC-DR left more than one, the last in name order wins.
pub fn find_moment0(
    ws: &Workspace,
    ds: &Datescan,
    pol: Polarization,
    molecule: &Molecule,
) -> Result<Option<PathBuf>> {
    let dir = ws.layout.detector_dir(ds, pol);
    if !ws.store.is_dir(&dir) {
        return Ok(None);
    }
    Ok(ws
        .store
        .list_files(&dir)?
        .into_iter()
        .filter(|p| is_moment0(p, molecule.subband))
        .next_back())
}

pub fn moment0_residuals(
    ws: &Workspace,
    datescans: &[Datescan],
    molecules: &MoleculeTable,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<ResidualOutcome>> {
    reporter.begin_stage(PipelineStage::Residuals, Some(datescans.len()));
    let mut outcomes = Vec::new();

    for (i, ds) in datescans.iter().enumerate() {
        reporter.set_message(&ds.to_string());
        ws.store.ensure_dir(&ws.layout.residuals_dir(ds))?;

        for molecule in molecules {
            let p0 = find_moment0(ws, ds, Polarization::P0, molecule)?;
            let p1 = find_moment0(ws, ds, Polarization::P1, molecule)?;

            match (p0, p1) {
                (Some(p0), Some(p1)) => {
                    let out = ws.layout.residual_path(ds, molecule);
                    ws.services.kappa.sub(&p1, &p0, &out)?;
                    ws.expect_output("kappa:sub", &out)?;
                    info!(datescan = %ds, molecule = %molecule.name, out = %out.display(), "Residual computed");
                    outcomes.push(ResidualOutcome::Computed {
                        datescan: ds.clone(),
                        molecule: molecule.name.clone(),
                        path: out,
                    });
                }
                (p0, p1) => {
                    let missing: Vec<Polarization> = [(Polarization::P0, p0), (Polarization::P1, p1)]
                        .into_iter()
                        .filter(|(_, map)| map.is_none())
                        .map(|(pol, _)| pol)
                        .collect();
                    warn!(
                        datescan = %ds,
                        molecule = %molecule.name,
                        missing = ?missing,
                        "No moment 0 map to subtract; skipping residual"
                    );
                    outcomes.push(ResidualOutcome::Skipped {
                        datescan: ds.clone(),
                        molecule: molecule.name.clone(),
                        missing,
                    });
                }
            }
        }
        reporter.advance(i + 1);
    }
    reporter.finish_stage();
    Ok(outcomes)
}
