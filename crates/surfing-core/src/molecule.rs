use serde::{Deserialize, Serialize};

use crate::consts::MAX_SUBBAND;
use crate::error::{Result, SurfingError};

/// A spectral line and the ACSIS subband its signal lands in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Molecule {
    pub name: String,
    pub subband: u8,
}

impl Molecule {
    pub fn new(name: impl Into<String>, subband: u8) -> Self {
        Self {
            name: name.into(),
            subband,
        }
    }
}

impl std::fmt::Display for Molecule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (subband {})", self.name, self.subband)
    }
}

/// Validated, ordered molecule-to-subband table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Molecule>", into = "Vec<Molecule>")]
pub struct MoleculeTable(Vec<Molecule>);

impl MoleculeTable {
    pub fn new(molecules: Vec<Molecule>) -> Result<Self> {
        if molecules.is_empty() {
            return Err(SurfingError::InvalidConfig(
                "molecule table is empty".into(),
            ));
        }
        for (i, mol) in molecules.iter().enumerate() {
            if mol.name.is_empty()
                || mol.name.contains('/')
                || mol.name.chars().any(char::is_whitespace)
            {
                return Err(SurfingError::InvalidConfig(format!(
                    "molecule name '{}' cannot be used in file names",
                    mol.name
                )));
            }
            if mol.subband == 0 || mol.subband > MAX_SUBBAND {
                return Err(SurfingError::InvalidConfig(format!(
                    "{}: subband {} outside 1..={MAX_SUBBAND}",
                    mol.name, mol.subband
                )));
            }
            if let Some(prev) = molecules[..i].iter().find(|m| m.name == mol.name) {
                return Err(SurfingError::InvalidConfig(format!(
                    "molecule {} listed twice",
                    prev.name
                )));
            }
            if let Some(prev) = molecules[..i].iter().find(|m| m.subband == mol.subband) {
                return Err(SurfingError::InvalidConfig(format!(
                    "{} and {} both map to subband {}",
                    prev.name, mol.name, mol.subband
                )));
            }
        }
        Ok(Self(molecules))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Molecule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Molecule> {
        self.0.iter().find(|m| m.name == name)
    }
}

/// The SURFING setup: C18O, 13CO and 12CO signal bands.
impl Default for MoleculeTable {
    fn default() -> Self {
        Self(vec![
            Molecule::new("C18O", 1),
            Molecule::new("13CO", 2),
            Molecule::new("CO", 3),
        ])
    }
}

impl TryFrom<Vec<Molecule>> for MoleculeTable {
    type Error = SurfingError;

    fn try_from(value: Vec<Molecule>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MoleculeTable> for Vec<Molecule> {
    fn from(value: MoleculeTable) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a MoleculeTable {
    type Item = &'a Molecule;
    type IntoIter = std::slice::Iter<'a, Molecule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
