//! Starlink-backed implementations of the external services.
//!
//! Each call spawns the corresponding Starlink binary and blocks until it
//! exits. A non-zero exit is reported as [`SurfingError::TaskFailed`].

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::classify::{is_image, is_log, is_ndf};
use crate::consts::{DEFAULT_STARLINK_DIR, ORAC_RUN_LOG, ORAC_WORKING_PREFIX};
use crate::error::{Result, SurfingError};

use super::{FormatConverter, ImageArithmetic, ReductionOutput, ReductionRequest, ReductionService};

/// Only this much of a failing task's stderr is kept in the error.
const STDERR_TAIL_LINES: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarlinkConfig {
    /// Root of the Starlink installation (`$STARLINK_DIR`).
    pub star_dir: PathBuf,
}

impl Default for StarlinkConfig {
    fn default() -> Self {
        Self {
            star_dir: PathBuf::from(DEFAULT_STARLINK_DIR),
        }
    }
}

impl StarlinkConfig {
    pub fn oracdr_dir(&self) -> PathBuf {
        self.star_dir.join("bin").join("oracdr").join("src")
    }

    pub fn oracdr_bin(&self) -> PathBuf {
        self.oracdr_dir().join("bin").join("oracdr")
    }

    pub fn kappa_task(&self, task: &str) -> PathBuf {
        self.star_dir.join("bin").join("kappa").join(task)
    }

    pub fn convert_task(&self, task: &str) -> PathBuf {
        self.star_dir.join("bin").join("convert").join(task)
    }
}

pub struct StarlinkTools {
    config: StarlinkConfig,
    /// Private ADAM parameter directory so tasks never prompt or share state.
    adam_user: TempDir,
}

impl StarlinkTools {
    pub fn new(config: StarlinkConfig) -> Result<Self> {
        let adam_user = tempfile::Builder::new().prefix("surfing-adam").tempdir()?;
        Ok(Self { config, adam_user })
    }

    pub fn config(&self) -> &StarlinkConfig {
        &self.config
    }

    fn command(&self, program: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.env("STARLINK_DIR", &self.config.star_dir)
            .env("ADAM_USER", self.adam_user.path())
            .env("ADAM_NOPROMPT", "1");
        cmd
    }

    fn spawn(&self, task: &str, mut cmd: Command) -> Result<Output> {
        debug!(task, command = ?cmd, "Spawning Starlink task");
        cmd.output().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SurfingError::TaskFailed {
                task: task.to_string(),
                code: None,
                stderr: format!("{} not found", cmd.get_program().to_string_lossy()),
            },
            _ => SurfingError::Io(e),
        })
    }

    fn run(&self, task: &str, cmd: Command) -> Result<Output> {
        let output = self.spawn(task, cmd)?;
        check_status(task, &output)?;
        Ok(output)
    }

    fn adam_task(&self, task: &str, program: PathBuf, params: &[(&str, OsString)]) -> Result<()> {
        let mut cmd = self.command(&program);
        for (name, value) in params {
            let mut arg = OsString::from(format!("{name}="));
            arg.push(value);
            cmd.arg(arg);
        }
        cmd.arg("accept");
        self.run(task, cmd)?;
        Ok(())
    }
}

impl ReductionService for StarlinkTools {
    fn reduce(&self, request: &ReductionRequest) -> Result<ReductionOutput> {
        let scratch = tempfile::Builder::new()
            .prefix(ORAC_WORKING_PREFIX)
            .tempdir_in(&request.dataout)
            .map_err(|e| SurfingError::path_io("create_dir", &request.dataout, e))?
            .keep();
        let scratch = std::path::absolute(&scratch)?;
        // Report products under `dataout` as given; a relative root stays relative.
        let workdir = match scratch.file_name() {
            Some(name) => request.dataout.join(name),
            None => scratch.clone(),
        };

        let mut file_list = String::new();
        for raw in &request.raw_files {
            let raw = std::path::absolute(raw)?;
            file_list.push_str(&raw.to_string_lossy());
            file_list.push('\n');
        }
        let list_path = scratch.join("surfing_rawfiles.lis");
        fs::write(&list_path, file_list)
            .map_err(|e| SurfingError::path_io("write", &list_path, e))?;

        let data_in = request
            .raw_files
            .first()
            .and_then(|f| f.parent())
            .map(std::path::absolute)
            .transpose()?
            .unwrap_or_else(|| scratch.clone());

        let mut cmd = self.command(&self.config.oracdr_bin());
        cmd.env("ORAC_DIR", self.config.oracdr_dir())
            .env("ORAC_CAL_ROOT", self.config.star_dir.join("bin/oracdr/cal"))
            .env("ORAC_PERL5LIB", self.config.oracdr_dir().join("lib/perl5"))
            .env("ORAC_INSTRUMENT", &request.instrument)
            .env("ORAC_DATA_IN", &data_in)
            .env("ORAC_DATA_OUT", &scratch)
            .current_dir(&scratch)
            .args(["-loop", request.loop_mode.as_str()])
            .arg("-files")
            .arg(&list_path)
            .args(["-nodisplay", "-log", "sf", "-verbose", "-debug"]);
        if let Some(ref recpars) = request.recpars {
            cmd.arg("-recpars").arg(std::path::absolute(recpars)?);
        }
        if let Some(ref calib) = request.calib {
            cmd.args(["-calib", calib.as_str()]);
        }
        cmd.arg(&request.recipe);

        info!(
            recipe = %request.recipe,
            files = request.raw_files.len(),
            workdir = %workdir.display(),
            "Running ORAC-DR"
        );
        let result = self.spawn("oracdr", cmd)?;

        // Kept on failure too; ORAC-DR reports recipe errors on stdout.
        let runlog = workdir.join(ORAC_RUN_LOG);
        let mut log =
            fs::File::create(&runlog).map_err(|e| SurfingError::path_io("write", &runlog, e))?;
        log.write_all(&result.stdout)?;
        log.write_all(&result.stderr)?;
        check_status("oracdr", &result)?;
        fs::remove_file(&list_path).map_err(|e| SurfingError::path_io("remove_file", &list_path, e))?;

        let mut output = ReductionOutput {
            outdir: workdir.clone(),
            runlog: runlog.clone(),
            ..Default::default()
        };
        let mut entries: Vec<PathBuf> = fs::read_dir(&workdir)
            .map_err(|e| SurfingError::path_io("read_dir", &workdir, e))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        entries.sort();
        for path in entries {
            if path == runlog {
                continue;
            }
            if is_log(&path) {
                output.logfiles.push(path);
            } else if is_image(&path) {
                output.imagefiles.push(path);
            } else if is_ndf(&path) {
                output.datafiles.push(path);
            }
        }
        Ok(output)
    }
}

impl ImageArithmetic for StarlinkTools {
    fn sub(&self, in1: &Path, in2: &Path, out: &Path) -> Result<()> {
        self.adam_task(
            "kappa:sub",
            self.config.kappa_task("sub"),
            &[
                ("in1", in1.into()),
                ("in2", in2.into()),
                ("out", out.into()),
            ],
        )
    }

    fn wcsmosaic(&self, inputs: &[PathBuf], reference: &Path, out: &Path) -> Result<()> {
        // Group expressions get unwieldy on the command line; use a ^list file.
        let mut list = tempfile::Builder::new()
            .prefix("surfing-mosaic")
            .suffix(".lis")
            .tempfile()?;
        for input in inputs {
            writeln!(list, "{}", input.display())?;
        }
        list.flush()?;
        let mut group = OsString::from("^");
        group.push(list.path());

        self.adam_task(
            "kappa:wcsmosaic",
            self.config.kappa_task("wcsmosaic"),
            &[
                ("in", group),
                ("ref", reference.into()),
                ("out", out.into()),
            ],
        )
    }
}

impl FormatConverter for StarlinkTools {
    fn ndf2fits(&self, input: &Path, output: &Path) -> Result<()> {
        self.adam_task(
            "convert:ndf2fits",
            self.config.convert_task("ndf2fits"),
            &[("in", input.into()), ("out", output.into())],
        )
    }
}

fn check_status(task: &str, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(SurfingError::TaskFailed {
        task: task.to_string(),
        code: output.status.code(),
        stderr: stderr_tail(output),
    })
}

fn stderr_tail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
