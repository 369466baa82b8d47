/// Directory holding raw observations, laid out as `raw/<date>/<scan5>/`.
pub const RAW_DIR: &str = "raw";

/// Directory holding reduced products, laid out as `reduced/<date>/<scan5>/`.
pub const REDUCED_DIR: &str = "reduced";

/// Scratch directory for the per-run increment of a co-add.
pub const COADD_TEMP_DIR: &str = "coadd_temp";

/// Directory holding the official co-adds.
pub const COADDS_DIR: &str = "coadds";

/// Per-datescan directory for P1 minus P0 moment-0 maps.
pub const RESIDUALS_DIR: &str = "Moment0_residuals";

/// Subdirectory receiving log files after a reduction.
pub const LOGFILES_DIR: &str = "logfiles";

/// Subdirectory receiving PNG previews after a reduction.
pub const IMAGEFILES_DIR: &str = "imagefiles";

/// Run summary written at the product root by the combined reduction.
pub const SUMMARY_FILE: &str = "Summary.txt";

/// Width the scan number is zero-padded to in directory names.
pub const SCAN_PAD_WIDTH: usize = 5;

/// Starlink native (NDF) file extension.
pub const NDF_EXTENSION: &str = "sdf";

/// Portable output file extension.
pub const FITS_EXTENSION: &str = "fits";

/// Preview image extension moved into `imagefiles/`.
pub const PNG_EXTENSION: &str = "png";

/// Prefix of the scratch directory ORAC-DR writes into.
pub const ORAC_WORKING_PREFIX: &str = "ORACworking";

/// ORAC-DR instrument for heterodyne data.
pub const ORAC_INSTRUMENT: &str = "ACSIS";

/// ORAC-DR loop mode used for every run.
pub const ORAC_LOOP_MODE: &str = "file";

/// Name of the captured ORAC-DR console log inside the working directory.
pub const ORAC_RUN_LOG: &str = "oracdr_run.log";

/// Default ORAC-DR recipe for SURFING.
pub const DEFAULT_RECIPE: &str = "REDUCE_SCIENCE_NARROWLINE";

/// Default Starlink installation.
pub const DEFAULT_STARLINK_DIR: &str = "/star";

/// Highest ACSIS subband index (signal bands 1-3, image bands 4-6).
pub const MAX_SUBBAND: u8 = 6;
