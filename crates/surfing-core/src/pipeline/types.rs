use std::path::PathBuf;

use crate::coadd::CoaddOutcome;
use crate::reduce::ReductionRecord;
use crate::residuals::ResidualOutcome;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    ReducingCombined,
    ReducingP0,
    ReducingP1,
    Residuals,
    CoAdding,
    Converting,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReducingCombined => write!(f, "Reducing P0+P1"),
            Self::ReducingP0 => write!(f, "Reducing P0"),
            Self::ReducingP1 => write!(f, "Reducing P1"),
            Self::Residuals => write!(f, "Moment 0 residuals"),
            Self::CoAdding => write!(f, "Co-adding"),
            Self::Converting => write!(f, "Converting to FITS"),
        }
    }
}

/// Everything a full run produced, in the order it was produced.
#[derive(Clone, Debug, Default)]
pub struct PipelineReport {
    pub combined: Vec<ReductionRecord>,
    pub individual: Vec<ReductionRecord>,
    pub residuals: Vec<ResidualOutcome>,
    pub coadds: Vec<CoaddOutcome>,
    pub converted: Vec<PathBuf>,
}

/// Progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (datescans, molecules or files), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// Describe the item currently being worked on.
    fn set_message(&self, _message: &str) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
