use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use surfing_core::datescan::Datescan;
use surfing_core::detector::Polarization;
use surfing_core::error::{Result, SurfingError};
use surfing_core::layout::ProductLayout;
use surfing_core::services::{
    FormatConverter, ImageArithmetic, ReductionOutput, ReductionRequest, ReductionService,
    Services,
};
use surfing_core::store::{MemoryStore, ProductStore};
use surfing_core::workspace::Workspace;

/// Stand-in for ORAC-DR, KAPPA and CONVERT that writes into a product store.
///
/// Cube contents are the datescan they came from, one per line. A mosaic
/// writes the sorted union of its inputs' lines, so a co-add's contents list
/// every datescan merged into it, repeats included.
pub struct FakeStarlink<S: ProductStore> {
    pub store: S,
    /// Subbands every reduction produces products for.
    pub subbands: Vec<u8>,
    /// (detector, subband) pairs whose moment-0 map a single-detector run omits.
    pub missing_integ: Vec<(Polarization, u8)>,
    /// Task name that fails with a non-zero status.
    pub fail_task: Option<&'static str>,
    pub requests: Mutex<Vec<ReductionRequest>>,
    pub calls: Mutex<Vec<String>>,
    runs: AtomicUsize,
}

impl<S: ProductStore> FakeStarlink<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            subbands: vec![1, 2, 3],
            missing_integ: Vec::new(),
            fail_task: None,
            requests: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            runs: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<ReductionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn check(&self, task: &str) -> Result<()> {
        self.calls.lock().unwrap().push(task.to_string());
        if self.fail_task == Some(task) {
            return Err(SurfingError::TaskFailed {
                task: task.to_string(),
                code: Some(1),
                stderr: "!! simulated failure".into(),
            });
        }
        Ok(())
    }
}

/// Which detector a request reduces, judging by the excluded receptors.
pub fn request_polarization(request: &ReductionRequest) -> Option<Polarization> {
    let calib = request.calib.as_deref()?;
    if calib.contains("NU1L") {
        Some(Polarization::P0)
    } else if calib.contains("NU0L") {
        Some(Polarization::P1)
    } else {
        None
    }
}

/// `<date>_<scan>` recovered from `raw/<date>/<scan5>/<file>`.
fn observation_id(raw: &Path) -> String {
    let scan_dir = raw.parent().expect("raw file has a scan directory");
    let date_dir = scan_dir.parent().expect("scan directory has a date directory");
    let scan: u32 = scan_dir
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.parse().ok())
        .expect("scan directory is numeric");
    let date = date_dir.file_name().and_then(|n| n.to_str()).unwrap();
    format!("{date}_{scan}")
}

impl<S: ProductStore> ReductionService for FakeStarlink<S> {
    fn reduce(&self, request: &ReductionRequest) -> Result<ReductionOutput> {
        self.requests.lock().unwrap().push(request.clone());
        self.check("oracdr")?;

        let run = self.runs.fetch_add(1, Ordering::SeqCst);
        let outdir = request.dataout.join(format!("ORACworkingfake{run}"));
        self.store.ensure_dir(&outdir)?;

        let id = observation_id(&request.raw_files[0]);
        let pol = request_polarization(request);
        let mut output = ReductionOutput {
            outdir: outdir.clone(),
            runlog: outdir.join("oracdr_run.log"),
            ..Default::default()
        };
        self.store
            .write(&output.runlog, format!("recipe {}\n", request.recipe).as_bytes())?;

        for &sb in &self.subbands {
            let cube = outdir.join(format!("ga{id}_{sb}_reduced001.sdf"));
            self.store.write(&cube, id.as_bytes())?;
            output.datafiles.push(cube);

            let skip_integ = pol.is_some_and(|p| self.missing_integ.contains(&(p, sb)));
            if !skip_integ {
                let integ = outdir.join(format!("ga{id}_{sb}_integ.sdf"));
                let label = pol.map(|p| p.to_string()).unwrap_or_else(|| "P0+P1".into());
                self.store.write(&integ, label.as_bytes())?;
                output.datafiles.push(integ);
            }

            let png = outdir.join(format!("ga{id}_{sb}_rimg.png"));
            self.store.write(&png, b"PNG")?;
            output.imagefiles.push(png);
        }

        let group_log = outdir.join("log.group");
        self.store.write(&group_log, b"group")?;
        output.logfiles.push(group_log);

        Ok(output)
    }
}

impl<S: ProductStore> ImageArithmetic for FakeStarlink<S> {
    fn sub(&self, in1: &Path, in2: &Path, out: &Path) -> Result<()> {
        self.check("sub")?;
        let a = String::from_utf8_lossy(&self.store.read(in1)?).into_owned();
        let b = String::from_utf8_lossy(&self.store.read(in2)?).into_owned();
        self.store.write(out, format!("{a}-{b}").as_bytes())
    }

    fn wcsmosaic(&self, inputs: &[PathBuf], reference: &Path, out: &Path) -> Result<()> {
        self.check("wcsmosaic")?;
        assert!(
            self.store.exists(reference),
            "mosaic reference {} missing",
            reference.display()
        );
        let mut lines = Vec::new();
        for input in inputs {
            let text = String::from_utf8_lossy(&self.store.read(input)?).into_owned();
            lines.extend(text.lines().map(str::to_string));
        }
        lines.sort();
        self.store.write(out, lines.join("\n").as_bytes())
    }
}

impl<S: ProductStore> FormatConverter for FakeStarlink<S> {
    fn ndf2fits(&self, input: &Path, output: &Path) -> Result<()> {
        self.check("ndf2fits")?;
        let data = self.store.read(input)?;
        let mut fits = b"SIMPLE  =                    T\n".to_vec();
        fits.extend_from_slice(&data);
        self.store.write(output, &fits)
    }
}

pub fn ds(s: &str) -> Datescan {
    s.parse().unwrap()
}

/// Lay down `count` raw NDFs for a datescan.
pub fn seed_raw(store: &dyn ProductStore, layout: &ProductLayout, datescan: &Datescan, count: usize) {
    let dir = layout.raw_dir(datescan);
    store.ensure_dir(&dir).unwrap();
    for i in 1..=count {
        let name = format!(
            "a{}_{}_01_{:04}.sdf",
            datescan.date(),
            datescan.scan_padded(),
            i
        );
        store.write(&dir.join(name), b"raw").unwrap();
    }
}

pub fn workspace<'a>(
    store: &'a MemoryStore,
    layout: &'a ProductLayout,
    fake: &'a FakeStarlink<MemoryStore>,
) -> Workspace<'a> {
    Workspace::new(store, layout, Services::from_toolkit(fake))
}

pub fn read_string(store: &dyn ProductStore, path: &Path) -> String {
    String::from_utf8_lossy(&store.read(path).unwrap()).into_owned()
}
