pub mod errors;

pub use errors::{SrimError, SrimErrorCategory, SrimResult};

use crate::common::constants::KEV_TO_EV;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Projectile recovered from an output header.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ion {
    pub symbol: String,
    /// Kinetic energy in eV.
    pub energy_ev: f64,
}

impl Ion {
    pub fn new(symbol: impl Into<String>, energy_ev: f64) -> Self {
        Self {
            symbol: symbol.into(),
            energy_ev,
        }
    }

    pub fn from_kev(symbol: impl Into<String>, energy_kev: f64) -> Self {
        Self::new(symbol, energy_kev * KEV_TO_EV)
    }
}

impl Display for Ion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} eV)", self.symbol, self.energy_ev)
    }
}

/// The depth-profile output files written after a TRIM run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileKind {
    Ionization,
    Vacancy,
    NoVacancy,
    EnergyToRecoils,
    Phonons,
    Range,
}

impl FileKind {
    pub const ALL: [FileKind; 6] = [
        Self::Ionization,
        Self::Vacancy,
        Self::NoVacancy,
        Self::EnergyToRecoils,
        Self::Phonons,
        Self::Range,
    ];

    pub const fn default_file_name(self) -> &'static str {
        match self {
            Self::Ionization => "IONIZ.txt",
            Self::Vacancy => "VACANCY.txt",
            Self::NoVacancy => "NOVAC.txt",
            Self::EnergyToRecoils => "E2RECOIL.txt",
            Self::Phonons => "PHONON.txt",
            Self::Range => "RANGE.txt",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ionization => "ioniz",
            Self::Vacancy => "vacancy",
            Self::NoVacancy => "novac",
            Self::EnergyToRecoils => "e2recoil",
            Self::Phonons => "phonon",
            Self::Range => "range",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }
}

impl Display for FileKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}
