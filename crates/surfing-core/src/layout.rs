//! Canonical locations of every product in the SURFING directory tree.
//!
//! All resolvers are pure path joins under the product root. Nothing here
//! touches the filesystem; callers create directories before writing.

use std::path::{Path, PathBuf};

use crate::consts::{
    COADDS_DIR, COADD_TEMP_DIR, FITS_EXTENSION, IMAGEFILES_DIR, LOGFILES_DIR, NDF_EXTENSION,
    RAW_DIR, REDUCED_DIR, RESIDUALS_DIR, SUMMARY_FILE,
};
use crate::datescan::Datescan;
use crate::detector::Polarization;
use crate::molecule::Molecule;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductLayout {
    root: PathBuf,
}

impl ProductLayout {
    /// A root of `.` is kept implicit so paths read `reduced/...` rather than `./reduced/...`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if root == Path::new(".") {
            Self {
                root: PathBuf::new(),
            }
        } else {
            Self { root }
        }
    }

    pub fn root(&self) -> &Path {
        if self.root.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.root
        }
    }

    /// `raw/<date>/<scan5>/`
    pub fn raw_dir(&self, ds: &Datescan) -> PathBuf {
        self.root
            .join(RAW_DIR)
            .join(ds.date())
            .join(ds.scan_padded())
    }

    /// `reduced/<date>/<scan5>/`
    pub fn reduced_dir(&self, ds: &Datescan) -> PathBuf {
        self.root
            .join(REDUCED_DIR)
            .join(ds.date())
            .join(ds.scan_padded())
    }

    /// `reduced/<date>/<scan5>/<P>/`
    pub fn detector_dir(&self, ds: &Datescan, pol: Polarization) -> PathBuf {
        self.reduced_dir(ds).join(pol.to_string())
    }

    pub fn residuals_dir(&self, ds: &Datescan) -> PathBuf {
        self.reduced_dir(ds).join(RESIDUALS_DIR)
    }

    /// `Moment0_residuals/<molecule>_P1_minus_P0_integ.sdf`
    pub fn residual_path(&self, ds: &Datescan, molecule: &Molecule) -> PathBuf {
        self.residuals_dir(ds).join(format!(
            "{}_{}_minus_{}_integ.{NDF_EXTENSION}",
            molecule.name,
            Polarization::P1,
            Polarization::P0
        ))
    }

    pub fn logfiles_dir(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(LOGFILES_DIR)
    }

    pub fn imagefiles_dir(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(IMAGEFILES_DIR)
    }

    pub fn coadd_temp_dir(&self) -> PathBuf {
        self.root.join(COADD_TEMP_DIR)
    }

    /// `coadd_temp/<region>_<molecule>_temp_coadd.sdf`
    pub fn coadd_temp_path(&self, region: &str, molecule: &Molecule) -> PathBuf {
        self.coadd_temp_dir().join(format!(
            "{region}_{}_temp_coadd.{NDF_EXTENSION}",
            molecule.name
        ))
    }

    pub fn coadds_dir(&self) -> PathBuf {
        self.root.join(COADDS_DIR)
    }

    /// `coadds/<region>_<molecule>_coadd.<ext>`
    pub fn coadd_path(&self, region: &str, molecule: &Molecule, ext: &str) -> PathBuf {
        self.coadds_dir()
            .join(format!("{region}_{}_coadd.{ext}", molecule.name))
    }

    pub fn coadd_sdf(&self, region: &str, molecule: &Molecule) -> PathBuf {
        self.coadd_path(region, molecule, NDF_EXTENSION)
    }

    pub fn coadd_fits(&self, region: &str, molecule: &Molecule) -> PathBuf {
        self.coadd_path(region, molecule, FITS_EXTENSION)
    }

    /// Scratch name the merged co-add is written to before replacing the official one.
    pub fn coadd_new_path(&self, region: &str, molecule: &Molecule) -> PathBuf {
        self.coadds_dir().join(format!(
            "{region}_{}_coadd_new.{NDF_EXTENSION}",
            molecule.name
        ))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join(SUMMARY_FILE)
    }
}

impl Default for ProductLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Sibling path with the portable extension and the same basename.
pub fn fits_sibling(ndf: &Path) -> PathBuf {
    ndf.with_extension(FITS_EXTENSION)
}
