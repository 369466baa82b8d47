use std::path::PathBuf;

use tracing::debug;

use crate::classify::is_ndf;
use crate::datescan::Datescan;
use crate::error::Result;
use crate::layout::fits_sibling;
use crate::pipeline::{PipelineStage, ProgressReporter};
use crate::workspace::Workspace;

/// Every NDF under a datescan's reduced directory: top level first, then one
/// directory down (`P0/`, `P1/`, `Moment0_residuals/`, ...), each part sorted.
pub fn list_ndf_products(ws: &Workspace, ds: &Datescan) -> Result<Vec<PathBuf>> {
    let reduced = ws.layout.reduced_dir(ds);
    if !ws.store.is_dir(&reduced) {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = ws
        .store
        .list_files(&reduced)?
        .into_iter()
        .filter(|p| is_ndf(p))
        .collect();
    for sub in ws.store.list_dirs(&reduced)? {
        files.extend(ws.store.list_files(&sub)?.into_iter().filter(|p| is_ndf(p)));
    }
    Ok(files)
}

/// Convert every reduced NDF to a FITS file beside it. Existing FITS files are
/// always regenerated. Returns the FITS paths written.
pub fn convert_to_fits(
    ws: &Workspace,
    datescans: &[Datescan],
    reporter: &dyn ProgressReporter,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for ds in datescans {
        let ndfs = list_ndf_products(ws, ds)?;
        let total = ndfs.len();
        reporter.begin_stage(PipelineStage::Converting, Some(total));
        for (i, ndf) in ndfs.iter().enumerate() {
            reporter.set_message(&format!("File {} of {}", i + 1, total));
            debug!(datescan = %ds, file = %ndf.display(), "File {} of {}", i + 1, total);
            let fits = fits_sibling(ndf);
            ws.services.convert.ndf2fits(ndf, &fits)?;
            ws.expect_output("convert:ndf2fits", &fits)?;
            written.push(fits);
            reporter.advance(i + 1);
        }
        reporter.finish_stage();
    }
    Ok(written)
}
