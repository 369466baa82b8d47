pub mod coadd;
pub mod config;
pub mod convert;
pub mod paths;
pub mod pipeline;
pub mod reduce;
pub mod residuals;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use surfing_core::datescan::parse_datescans;
use surfing_core::layout::ProductLayout;
use surfing_core::pipeline::config::PipelineConfig;
use surfing_core::services::{Services, StarlinkTools};
use surfing_core::store::DiskStore;
use surfing_core::workspace::Workspace;
use tracing::debug;

/// Where a command's configuration comes from.
#[derive(Args)]
pub struct ConfigSource {
    /// Pipeline config file (TOML)
    #[arg(short, long, default_value = "surfing.toml")]
    pub config: PathBuf,

    /// Comma-separated datescans overriding the config, e.g. 20220307_73,20220308_5
    #[arg(long, value_delimiter = ',')]
    pub datescans: Option<Vec<String>>,
}

impl ConfigSource {
    pub fn load(&self) -> Result<PipelineConfig> {
        let contents = std::fs::read_to_string(&self.config)
            .with_context(|| format!("Failed to read config {}", self.config.display()))?;
        let mut config = PipelineConfig::from_toml(&contents)
            .with_context(|| format!("Invalid pipeline config {}", self.config.display()))?;

        if let Some(ref values) = self.datescans {
            config.datescans = parse_datescans(values).context("Invalid --datescans")?;
            config.validate().context("Invalid --datescans")?;
        }
        debug!(
            path = %self.config.display(),
            region = %config.region,
            datescans = config.datescans.len(),
            "Loaded config"
        );
        Ok(config)
    }
}

/// A loaded config together with the on-disk tree and Starlink tasks it runs against.
pub struct Session {
    pub config: PipelineConfig,
    pub layout: ProductLayout,
    store: DiskStore,
    tools: StarlinkTools,
}

impl Session {
    pub fn open(source: &ConfigSource) -> Result<Self> {
        let config = source.load()?;
        let layout = config.layout();
        let tools = StarlinkTools::new(config.starlink.clone())
            .context("Failed to prepare the Starlink environment")?;
        Ok(Self {
            config,
            layout,
            store: DiskStore::new(),
            tools,
        })
    }

    pub fn workspace(&self) -> Workspace<'_> {
        Workspace::new(&self.store, &self.layout, Services::from_toolkit(&self.tools))
    }
}
