//! Plain-text run summary written to `Summary.txt`.

use std::path::{Path, PathBuf};

use crate::classify::{relocate_working_dir, strip_working_dir};
use crate::consts::LOGFILES_DIR;
use crate::reduce::ReductionRecord;

/// Summary block for one datescan.
pub fn render_entry(record: &ReductionRecord) -> String {
    let ds = &record.datescan;
    let out = &record.output;
    let runlog = relocate_working_dir(
        &out.runlog.to_string_lossy(),
        &format!("{LOGFILES_DIR}/"),
    );

    let mut s = String::new();
    s.push_str(&format!("~~~{ds}~~~\n#######\n"));
    s.push_str(&format!("\nThe run log for {ds} can be found here {runlog}"));
    s.push_str("\n\nThe datafiles are listed below:\n");
    s.push_str(&display_list(&out.datafiles));
    s.push_str("\n\nThe image files are listed below:\n");
    s.push_str(&display_list(&out.imagefiles));
    s.push_str("\n\nThe additional logs are listed below:\n");
    s.push_str(&display_list(&out.logfiles));
    s.push('\n');
    s
}

/// Full summary, one entry per record in order.
pub fn render_summary(records: &[ReductionRecord]) -> String {
    records.iter().map(render_entry).collect()
}

fn display_list(paths: &[PathBuf]) -> String {
    let joined = paths
        .iter()
        .map(|p| p.to_string_lossy())
        .collect::<Vec<_>>()
        .join("\n");
    strip_working_dir(&joined)
}

/// A path as shown to the user, without the scratch directory component.
pub fn display_path(path: &Path) -> String {
    strip_working_dir(&path.to_string_lossy())
}
