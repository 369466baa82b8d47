use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SurfingError};

/// One of the two redundant receiver chains of the Namakanui inserts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarization {
    P0,
    P1,
}

impl Polarization {
    pub const ALL: [Polarization; 2] = [Polarization::P0, Polarization::P1];

    pub fn index(self) -> u8 {
        match self {
            Self::P0 => 0,
            Self::P1 => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::P0 => Self::P1,
            Self::P1 => Self::P0,
        }
    }

    /// Receptors to exclude so that only this polarization is reduced:
    /// every receptor of the other chain, both sidebands of every insert.
    pub fn excluded_receptors(self) -> Vec<Receptor> {
        let other = self.other();
        Insert::ALL
            .iter()
            .flat_map(|&insert| {
                Sideband::ALL.iter().map(move |&sideband| Receptor {
                    insert,
                    polarization: other,
                    sideband,
                })
            })
            .collect()
    }

    /// ORAC-DR calibration override for a single-polarization run.
    pub fn bad_receptors_calib(self) -> String {
        let codes: Vec<String> = self
            .excluded_receptors()
            .iter()
            .map(Receptor::to_string)
            .collect();
        format!("bad_receptors={}", codes.join(":"))
    }
}

impl std::fmt::Display for Polarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.index())
    }
}

/// Namakanui insert: Uu, Aweoweo or Alaihi.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Insert {
    Uu,
    Aweoweo,
    Alaihi,
}

impl Insert {
    pub const ALL: [Insert; 3] = [Insert::Uu, Insert::Aweoweo, Insert::Alaihi];

    fn code(self) -> char {
        match self {
            Self::Uu => 'U',
            Self::Aweoweo => 'W',
            Self::Alaihi => 'A',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sideband {
    Lower,
    Upper,
}

impl Sideband {
    pub const ALL: [Sideband; 2] = [Sideband::Lower, Sideband::Upper];

    fn code(self) -> char {
        match self {
            Self::Lower => 'L',
            Self::Upper => 'U',
        }
    }
}

/// A receptor code such as `NU1L`: Namakanui, insert, polarization, sideband.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Receptor {
    pub insert: Insert,
    pub polarization: Polarization,
    pub sideband: Sideband,
}

impl FromStr for Receptor {
    type Err = SurfingError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || SurfingError::InvalidReceptor(s.to_string());
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 4 || chars[0] != 'N' {
            return Err(bad());
        }
        let insert = match chars[1] {
            'U' => Insert::Uu,
            'W' => Insert::Aweoweo,
            'A' => Insert::Alaihi,
            _ => return Err(bad()),
        };
        let polarization = match chars[2] {
            '0' => Polarization::P0,
            '1' => Polarization::P1,
            _ => return Err(bad()),
        };
        let sideband = match chars[3] {
            'L' => Sideband::Lower,
            'U' => Sideband::Upper,
            _ => return Err(bad()),
        };
        Ok(Self {
            insert,
            polarization,
            sideband,
        })
    }
}

impl std::fmt::Display for Receptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "N{}{}{}",
            self.insert.code(),
            self.polarization.index(),
            self.sideband.code()
        )
    }
}
