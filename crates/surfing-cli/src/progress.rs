use std::sync::Mutex;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use surfing_core::pipeline::{PipelineStage, ProgressReporter};

/// Drives one indicatif bar per pipeline stage.
pub struct BarReporter {
    style: ProgressStyle,
    bar: Mutex<Option<ProgressBar>>,
}

impl BarReporter {
    pub fn new() -> Result<Self> {
        let style = ProgressStyle::default_bar()
            .template("{prefix:20} [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> ");
        Ok(Self {
            style,
            bar: Mutex::new(None),
        })
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(ref bar) = *guard {
                f(bar);
            }
        }
    }
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        let pb = ProgressBar::new(total_items.unwrap_or(0) as u64);
        pb.set_style(self.style.clone());
        pb.set_prefix(stage.to_string());
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(previous) = guard.replace(pb) {
                previous.finish();
            }
        }
    }

    fn advance(&self, items_done: usize) {
        self.with_bar(|pb| pb.set_position(items_done as u64));
    }

    fn set_message(&self, message: &str) {
        let message = message.to_string();
        self.with_bar(|pb| pb.set_message(message));
    }

    fn finish_stage(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_with_message("done");
            }
        }
    }
}
