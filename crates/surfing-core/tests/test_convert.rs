#[allow(dead_code)]
mod common;

use std::path::PathBuf;
use std::sync::Mutex;

use common::{ds, read_string, workspace, FakeStarlink};
use surfing_core::convert::{convert_to_fits, list_ndf_products};
use surfing_core::layout::ProductLayout;
use surfing_core::pipeline::{NoOpReporter, PipelineStage, ProgressReporter};
use surfing_core::store::{MemoryStore, ProductStore};

/// Records every progress message.
#[derive(Default)]
struct MessageLog {
    stages: Mutex<Vec<(PipelineStage, Option<usize>)>>,
    messages: Mutex<Vec<String>>,
}

impl ProgressReporter for MessageLog {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.stages.lock().unwrap().push((stage, total_items));
    }

    fn set_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

fn seed_products(store: &MemoryStore, layout: &ProductLayout) -> PathBuf {
    let dir = layout.reduced_dir(&ds("20220307_73"));
    store.seed(&dir.join("ga20220307_73_1_reduced001.sdf"), b"cube").unwrap();
    store.seed(&dir.join("ga20220307_73_1_integ.sdf"), b"integ").unwrap();
    store.seed(&dir.join("logfiles/log.group"), b"log").unwrap();
    store.seed(&dir.join("P0/ga20220307_73_1_integ.sdf"), b"p0").unwrap();
    store.seed(&dir.join("P1/ga20220307_73_1_integ.sdf"), b"p1").unwrap();
    store
        .seed(&dir.join("Moment0_residuals/C18O_P1_minus_P0_integ.sdf"), b"res")
        .unwrap();
    store.seed(&dir.join("P0/logfiles/deep.sdf"), b"too deep").unwrap();
    dir
}

#[test]
fn test_lists_top_level_then_one_directory_down() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let fake = FakeStarlink::new(store.clone());
    let ws = workspace(&store, &layout, &fake);
    let dir = seed_products(&store, &layout);

    let ndfs = list_ndf_products(&ws, &ds("20220307_73")).unwrap();
    assert_eq!(
        ndfs,
        vec![
            dir.join("ga20220307_73_1_integ.sdf"),
            dir.join("ga20220307_73_1_reduced001.sdf"),
            dir.join("Moment0_residuals/C18O_P1_minus_P0_integ.sdf"),
            dir.join("P0/ga20220307_73_1_integ.sdf"),
            dir.join("P1/ga20220307_73_1_integ.sdf"),
        ]
    );
}

#[test]
fn test_every_ndf_gets_a_fits_sibling() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let fake = FakeStarlink::new(store.clone());
    let ws = workspace(&store, &layout, &fake);
    let dir = seed_products(&store, &layout);

    let written = convert_to_fits(&ws, &[ds("20220307_73")], &NoOpReporter).unwrap();
    assert_eq!(written.len(), 5);
    for fits in &written {
        assert_eq!(fits.extension().unwrap(), "fits");
        assert!(store.exists(&fits.with_extension("sdf")));
    }
    assert_eq!(
        read_string(&store, &dir.join("P1/ga20220307_73_1_integ.fits")),
        "SIMPLE  =                    T\np1"
    );
    assert!(!store.exists(&dir.join("P0/logfiles/deep.fits")));
}

#[test]
fn test_existing_fits_are_reconverted() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let fake = FakeStarlink::new(store.clone());
    let ws = workspace(&store, &layout, &fake);
    let dir = seed_products(&store, &layout);

    let datescans = [ds("20220307_73")];
    convert_to_fits(&ws, &datescans, &NoOpReporter).unwrap();
    store.write(&dir.join("ga20220307_73_1_integ.sdf"), b"updated").unwrap();
    convert_to_fits(&ws, &datescans, &NoOpReporter).unwrap();

    // Earlier FITS outputs are not NDFs, so they are never converted themselves.
    assert_eq!(fake.calls().len(), 10);
    assert_eq!(
        read_string(&store, &dir.join("ga20220307_73_1_integ.fits")),
        "SIMPLE  =                    T\nupdated"
    );
}

#[test]
fn test_progress_counts_files() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let fake = FakeStarlink::new(store.clone());
    let ws = workspace(&store, &layout, &fake);
    seed_products(&store, &layout);

    let log = MessageLog::default();
    convert_to_fits(&ws, &[ds("20220307_73"), ds("20220308_5")], &log).unwrap();

    assert_eq!(
        *log.stages.lock().unwrap(),
        vec![
            (PipelineStage::Converting, Some(5)),
            (PipelineStage::Converting, Some(0)),
        ]
    );
    let messages = log.messages.lock().unwrap();
    assert_eq!(messages.first().map(String::as_str), Some("File 1 of 5"));
    assert_eq!(messages.last().map(String::as_str), Some("File 5 of 5"));
}

#[test]
fn test_missing_reduced_dir_converts_nothing() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let fake = FakeStarlink::new(store.clone());
    let ws = workspace(&store, &layout, &fake);

    let written = convert_to_fits(&ws, &[ds("20220307_73")], &NoOpReporter).unwrap();
    assert!(written.is_empty());
    assert!(fake.calls().is_empty());
}
