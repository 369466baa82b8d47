//! External collaborators: the ORAC-DR reduction pipeline and the KAPPA /
//! CONVERT tasks. The pipeline only ever talks to them through these traits.

pub mod starlink;

use std::path::{Path, PathBuf};

use crate::consts::{ORAC_INSTRUMENT, ORAC_LOOP_MODE};
use crate::error::Result;

pub use starlink::{StarlinkConfig, StarlinkTools};

/// Everything ORAC-DR needs for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReductionRequest {
    /// Pipeline mode, e.g. `ACSIS`.
    pub instrument: String,
    /// Loop mode, e.g. `file`.
    pub loop_mode: String,
    /// Directory the run's products end up in.
    pub dataout: PathBuf,
    pub recipe: String,
    pub raw_files: Vec<PathBuf>,
    /// Recipe parameter file (`-recpars`).
    pub recpars: Option<PathBuf>,
    /// Calibration override (`-calib`), e.g. `bad_receptors=NU1L:NU1U`.
    pub calib: Option<String>,
}

impl ReductionRequest {
    pub fn new(dataout: impl Into<PathBuf>, recipe: &str, raw_files: Vec<PathBuf>) -> Self {
        Self {
            instrument: ORAC_INSTRUMENT.to_string(),
            loop_mode: ORAC_LOOP_MODE.to_string(),
            dataout: dataout.into(),
            recipe: recipe.to_string(),
            raw_files,
            recpars: None,
            calib: None,
        }
    }

    pub fn with_recpars(mut self, recpars: Option<PathBuf>) -> Self {
        self.recpars = recpars;
        self
    }

    pub fn with_calib(mut self, calib: Option<String>) -> Self {
        self.calib = calib;
        self
    }
}

/// What a reduction run left behind in its working directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReductionOutput {
    /// Scratch directory (`ORACworking*`) holding the products.
    pub outdir: PathBuf,
    pub runlog: PathBuf,
    pub datafiles: Vec<PathBuf>,
    pub imagefiles: Vec<PathBuf>,
    pub logfiles: Vec<PathBuf>,
}

pub trait ReductionService {
    fn reduce(&self, request: &ReductionRequest) -> Result<ReductionOutput>;
}

pub trait ImageArithmetic {
    /// `out = in1 - in2`
    fn sub(&self, in1: &Path, in2: &Path, out: &Path) -> Result<()>;

    /// Mosaic `inputs` onto the pixel grid of `reference`.
    fn wcsmosaic(&self, inputs: &[PathBuf], reference: &Path, out: &Path) -> Result<()>;
}

pub trait FormatConverter {
    fn ndf2fits(&self, input: &Path, output: &Path) -> Result<()>;
}

/// The three collaborators a full run needs.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub reducer: &'a dyn ReductionService,
    pub kappa: &'a dyn ImageArithmetic,
    pub convert: &'a dyn FormatConverter,
}

impl<'a> Services<'a> {
    /// Use one implementation for every collaborator.
    pub fn from_toolkit<T>(toolkit: &'a T) -> Self
    where
        T: ReductionService + ImageArithmetic + FormatConverter,
    {
        Self {
            reducer: toolkit,
            kappa: toolkit,
            convert: toolkit,
        }
    }
}
