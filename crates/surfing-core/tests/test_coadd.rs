#[allow(dead_code)]
mod common;

use common::{ds, read_string, seed_raw, workspace, FakeStarlink};
use surfing_core::coadd::{coadd_molecule, coadd_results, collect_reduced_cubes, CoaddOutcome};
use surfing_core::datescan::Datescan;
use surfing_core::layout::ProductLayout;
use surfing_core::molecule::{Molecule, MoleculeTable};
use surfing_core::pipeline::NoOpReporter;
use surfing_core::reduce::{reduce_combined, RecipeSpec};
use surfing_core::store::{MemoryStore, ProductStore};
use surfing_core::workspace::Workspace;

const REGION: &str = "SERPENS_SOUTH";
const RECIPE: RecipeSpec<'static> = RecipeSpec {
    recipe: "REDUCE_SCIENCE_NARROWLINE",
    parfile: None,
};

fn c18o() -> Molecule {
    Molecule::new("C18O", 1)
}

fn reduce(ws: &Workspace, store: &MemoryStore, layout: &ProductLayout, datescans: &[Datescan]) {
    for d in datescans {
        seed_raw(store, layout, d, 1);
    }
    reduce_combined(ws, datescans, RECIPE, &NoOpReporter).unwrap();
}

#[test]
fn test_first_coadd_is_created() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let fake = FakeStarlink::new(store.clone());
    let ws = workspace(&store, &layout, &fake);

    let a = ds("20220307_73");
    reduce(&ws, &store, &layout, &[a.clone()]);

    let outcome = coadd_molecule(&ws, &[a], &c18o(), REGION).unwrap();
    let CoaddOutcome::Updated {
        inputs,
        merged_with_existing,
        sdf,
        fits,
        ..
    } = outcome
    else {
        panic!("expected an update");
    };
    assert_eq!(inputs.len(), 1);
    assert!(!merged_with_existing);
    assert_eq!(sdf, layout.coadd_sdf(REGION, &c18o()));
    assert_eq!(read_string(&store, &sdf), "20220307_73");
    assert!(read_string(&store, &fits).starts_with("SIMPLE"));

    // A lone cube is copied, not mosaicked.
    assert!(!fake.calls().contains(&"wcsmosaic".to_string()));
    assert!(!store.exists(&layout.coadd_temp_dir()));
}

#[test]
fn test_coadd_merges_into_existing() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let fake = FakeStarlink::new(store.clone());
    let ws = workspace(&store, &layout, &fake);

    let a = ds("20220307_73");
    let b = ds("20220308_5");
    reduce(&ws, &store, &layout, &[a.clone(), b.clone()]);

    coadd_molecule(&ws, &[a], &c18o(), REGION).unwrap();
    let outcome = coadd_molecule(&ws, &[b], &c18o(), REGION).unwrap();
    assert!(matches!(
        outcome,
        CoaddOutcome::Updated {
            merged_with_existing: true,
            ..
        }
    ));

    let official = layout.coadd_sdf(REGION, &c18o());
    assert_eq!(read_string(&store, &official), "20220307_73\n20220308_5");
    assert!(!store.exists(&layout.coadd_new_path(REGION, &c18o())));
    assert!(!store.exists(&layout.coadd_temp_dir()));
    assert_eq!(
        read_string(&store, &layout.coadd_fits(REGION, &c18o())),
        "SIMPLE  =                    T\n20220307_73\n20220308_5"
    );
}

#[test]
fn test_incremental_matches_single_batch() {
    let incremental = {
        let store = MemoryStore::new();
        let layout = ProductLayout::default();
        let fake = FakeStarlink::new(store.clone());
        let ws = workspace(&store, &layout, &fake);
        let (a, b) = (ds("20220307_73"), ds("20220308_5"));
        reduce(&ws, &store, &layout, &[a.clone(), b.clone()]);
        coadd_molecule(&ws, &[a], &c18o(), REGION).unwrap();
        coadd_molecule(&ws, &[b], &c18o(), REGION).unwrap();
        read_string(&store, &layout.coadd_sdf(REGION, &c18o()))
    };
    let batch = {
        let store = MemoryStore::new();
        let layout = ProductLayout::default();
        let fake = FakeStarlink::new(store.clone());
        let ws = workspace(&store, &layout, &fake);
        let both = [ds("20220307_73"), ds("20220308_5")];
        reduce(&ws, &store, &layout, &both);
        coadd_molecule(&ws, &both, &c18o(), REGION).unwrap();
        assert_eq!(fake.calls().iter().filter(|c| *c == "wcsmosaic").count(), 1);
        read_string(&store, &layout.coadd_sdf(REGION, &c18o()))
    };
    assert_eq!(incremental, batch);
}

#[test]
fn test_rerun_merges_datescan_twice() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let fake = FakeStarlink::new(store.clone());
    let ws = workspace(&store, &layout, &fake);

    let a = ds("20220307_73");
    reduce(&ws, &store, &layout, &[a.clone()]);
    coadd_molecule(&ws, &[a.clone()], &c18o(), REGION).unwrap();
    coadd_molecule(&ws, &[a], &c18o(), REGION).unwrap();

    assert_eq!(
        read_string(&store, &layout.coadd_sdf(REGION, &c18o())),
        "20220307_73\n20220307_73"
    );
}

#[test]
fn test_no_new_data_leaves_coadd_alone() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let fake = FakeStarlink::new(store.clone());
    let ws = workspace(&store, &layout, &fake);

    let official = layout.coadd_sdf(REGION, &c18o());
    store.seed(&official, b"previous").unwrap();

    let outcome = coadd_molecule(&ws, &[ds("20220307_73")], &c18o(), REGION).unwrap();
    assert_eq!(
        outcome,
        CoaddOutcome::NoNewData {
            molecule: "C18O".into()
        }
    );
    assert_eq!(read_string(&store, &official), "previous");
    assert!(fake.calls().is_empty());
    assert!(!store.exists(&layout.coadd_temp_dir()));
}

#[test]
fn test_stale_fits_is_regenerated() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let fake = FakeStarlink::new(store.clone());
    let ws = workspace(&store, &layout, &fake);

    let a = ds("20220307_73");
    reduce(&ws, &store, &layout, &[a.clone()]);
    let fits = layout.coadd_fits(REGION, &c18o());
    store.seed(&fits, b"stale").unwrap();

    coadd_molecule(&ws, &[a], &c18o(), REGION).unwrap();
    assert_eq!(
        read_string(&store, &fits),
        "SIMPLE  =                    T\n20220307_73"
    );
}

#[test]
fn test_cube_selection_by_subband() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let fake = FakeStarlink::new(store.clone());
    let ws = workspace(&store, &layout, &fake);

    let a = ds("20220307_73");
    let dir = layout.reduced_dir(&a);
    store.seed(&dir.join("ga20220307_73_3_reduced001.sdf"), b"x").unwrap();
    store.seed(&dir.join("ga20220307_73_3_reduced002.sdf"), b"x").unwrap();
    store.seed(&dir.join("ga20220307_73_3_integ.sdf"), b"x").unwrap();
    store.seed(&dir.join("a20220307_00073_3_reduced001.sdf"), b"x").unwrap();
    store.seed(&dir.join("P0/ga20220307_73_3_reduced001.sdf"), b"x").unwrap();

    let cubes = collect_reduced_cubes(&ws, &[a, ds("20220308_5")], &Molecule::new("CO", 3)).unwrap();
    assert_eq!(
        cubes,
        vec![
            dir.join("ga20220307_73_3_reduced001.sdf"),
            dir.join("ga20220307_73_3_reduced002.sdf"),
        ]
    );
}

#[test]
fn test_coadd_results_covers_every_molecule() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let mut fake = FakeStarlink::new(store.clone());
    fake.subbands = vec![1, 3];
    let ws = workspace(&store, &layout, &fake);

    let a = ds("20220307_73");
    reduce(&ws, &store, &layout, &[a.clone()]);

    let outcomes =
        coadd_results(&ws, &[a], &MoleculeTable::default(), REGION, &NoOpReporter).unwrap();
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], CoaddOutcome::Updated { .. }));
    assert_eq!(
        outcomes[1],
        CoaddOutcome::NoNewData {
            molecule: "13CO".into()
        }
    );
    assert!(matches!(outcomes[2], CoaddOutcome::Updated { .. }));
    assert!(store.exists(&layout.coadd_sdf(REGION, &Molecule::new("CO", 3))));
    assert!(!store.exists(&layout.coadd_sdf(REGION, &Molecule::new("13CO", 2))));
}

#[test]
fn test_merge_failure_propagates() {
    let store = MemoryStore::new();
    let layout = ProductLayout::default();
    let mut fake = FakeStarlink::new(store.clone());
    fake.fail_task = Some("wcsmosaic");
    let ws = workspace(&store, &layout, &fake);

    let a = ds("20220307_73");
    reduce(&ws, &store, &layout, &[a.clone()]);
    let official = layout.coadd_sdf(REGION, &c18o());
    store.seed(&official, b"previous").unwrap();

    assert!(coadd_molecule(&ws, &[a], &c18o(), REGION).is_err());
    assert_eq!(read_string(&store, &official), "previous");
}
