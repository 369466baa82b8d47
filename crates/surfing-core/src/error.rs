use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurfingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{op} failed for {}: {source}", path.display())]
    PathIo {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid datescan '{value}': {reason}")]
    InvalidDatescan { value: String, reason: String },

    #[error("Invalid receptor code '{0}'")]
    InvalidReceptor(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No raw data for datescan {datescan} in {}", dir.display())]
    NoRawData { datescan: String, dir: PathBuf },

    #[error("{task} exited with status {code:?}: {stderr}")]
    TaskFailed {
        task: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{task} did not produce {}", path.display())]
    MissingOutput { task: String, path: PathBuf },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl SurfingError {
    /// Attach the failing operation and path to an I/O error.
    pub fn path_io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PathIo {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SurfingError>;
