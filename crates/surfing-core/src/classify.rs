//! Typed classification of ORAC-DR output file names.
//!
//! ACSIS group products are named `ga<date>_<scan>_<subband>_<suffix>.sdf`;
//! the subband token selects the molecule.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::consts::{NDF_EXTENSION, ORAC_WORKING_PREFIX, PNG_EXTENSION};

static REDUCED_CUBE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ga.*_(\d+)_reduced0.*\.sdf$").expect("valid regex"));

static MOMENT0_MAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^g.*_(\d+)_integ\.sdf$").expect("valid regex"));

static WORKING_DIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{ORAC_WORKING_PREFIX}\w+/")).expect("valid regex")
});

/// What a file in a reduced directory is, as far as the pipeline cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductKind {
    /// Group spectral cube (`ga*_<sb>_reduced0*.sdf`), input to co-adds.
    ReducedCube { subband: u8 },
    /// Integrated-intensity map (`g*_<sb>_integ.sdf`), input to residuals.
    Moment0 { subband: u8 },
    /// Any other NDF product.
    Ndf,
    /// Anything with `log` in its name.
    Log,
    /// PNG preview.
    Image,
    Other,
}

impl ProductKind {
    pub fn subband(&self) -> Option<u8> {
        match self {
            Self::ReducedCube { subband } | Self::Moment0 { subband } => Some(*subband),
            _ => None,
        }
    }
}

/// Classify a file by its name alone.
pub fn classify_product(path: &Path) -> ProductKind {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return ProductKind::Other;
    };

    if let Some(subband) = capture_subband(&REDUCED_CUBE, name) {
        return ProductKind::ReducedCube { subband };
    }
    if let Some(subband) = capture_subband(&MOMENT0_MAP, name) {
        return ProductKind::Moment0 { subband };
    }
    if name.contains("log") {
        return ProductKind::Log;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(NDF_EXTENSION) => ProductKind::Ndf,
        Some(PNG_EXTENSION) => ProductKind::Image,
        _ => ProductKind::Other,
    }
}

/// Whether `path` is a reduced cube for `subband`.
pub fn is_reduced_cube(path: &Path, subband: u8) -> bool {
    classify_product(path) == ProductKind::ReducedCube { subband }
}

/// Whether `path` is a moment-0 map for `subband`.
pub fn is_moment0(path: &Path, subband: u8) -> bool {
    classify_product(path) == ProductKind::Moment0 { subband }
}

/// Whether `path` is a Starlink NDF by extension.
pub fn is_ndf(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(NDF_EXTENSION)
}

/// Files moved into `logfiles/` after a reduction.
pub fn is_log(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains("log"))
}

/// Files moved into `imagefiles/` after a reduction.
pub fn is_image(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(PNG_EXTENSION)
}

/// Drop `ORACworking*/` components from a displayed path.
pub fn strip_working_dir(path: &str) -> String {
    WORKING_DIR.replace_all(path, "").into_owned()
}

/// Point a run-log path at the `logfiles/` directory it is moved into.
pub fn relocate_working_dir(path: &str, replacement: &str) -> String {
    WORKING_DIR.replace_all(path, replacement).into_owned()
}

fn capture_subband(re: &Regex, name: &str) -> Option<u8> {
    re.captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
