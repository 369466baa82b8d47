use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_RECIPE;
use crate::datescan::Datescan;
use crate::error::{Result, SurfingError};
use crate::layout::ProductLayout;
use crate::molecule::MoleculeTable;
use crate::reduce::RecipeSpec;
use crate::services::StarlinkConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Region the datescans belong to. Must match the name of existing
    /// co-adds for them to be merged into.
    pub region: String,
    /// Datescans reduced in this batch, individually, then co-added.
    pub datescans: Vec<Datescan>,
    /// ORAC-DR recipe parameter file. Empty or absent means recipe defaults.
    #[serde(default)]
    pub parfile: Option<PathBuf>,
    #[serde(default = "default_recipe")]
    pub recipe: String,
    /// Directory holding `raw/`, `reduced/`, `coadds/` and `Summary.txt`.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Molecule to subband table, confirmed against the heterodyne setup.
    #[serde(default)]
    pub molecules: MoleculeTable,
    #[serde(default)]
    pub starlink: StarlinkConfig,
}

fn default_recipe() -> String {
    DEFAULT_RECIPE.to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            region: "SERPENS_SOUTH".to_string(),
            datescans: vec![Datescan::new("20220307", 73).expect("valid datescan")],
            parfile: Some(PathBuf::from("config/SURFING.ini")),
            recipe: default_recipe(),
            root: default_root(),
            molecules: MoleculeTable::default(),
            starlink: StarlinkConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML config.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.region.is_empty()
            || self.region.contains('/')
            || self.region.chars().any(char::is_whitespace)
        {
            return Err(SurfingError::InvalidConfig(format!(
                "region '{}' cannot be used in file names",
                self.region
            )));
        }
        if self.datescans.is_empty() {
            return Err(SurfingError::InvalidConfig("no datescans listed".into()));
        }
        if self.recipe.trim().is_empty() {
            return Err(SurfingError::InvalidConfig("recipe is empty".into()));
        }
        Ok(())
    }

    /// Parameter file to hand to ORAC-DR, if one is configured.
    pub fn recpars(&self) -> Option<&Path> {
        self.parfile
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    pub fn recipe_spec(&self) -> RecipeSpec<'_> {
        RecipeSpec {
            recipe: &self.recipe,
            parfile: self.recpars(),
        }
    }

    pub fn layout(&self) -> ProductLayout {
        ProductLayout::new(&self.root)
    }
}
