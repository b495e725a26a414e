//! File naming for a results directory, optionally loaded from JSON.

use crate::domain::{FileKind, SrimError, SrimResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TRANSMIT_FILE: &str = "TRANSMIT.txt";
pub const DEFAULT_TRANSMIT_SUBDIR: &str = "SRIM Outputs";
pub const DEFAULT_COLLISION_FILE: &str = "COLLISON.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ResultsLayout {
    pub ionization: String,
    pub vacancy: String,
    pub no_vacancy: String,
    pub energy_to_recoils: String,
    pub phonons: String,
    pub range: String,
    pub transmitted: String,
    pub transmitted_subdir: String,
    pub collision: String,
}

impl Default for ResultsLayout {
    fn default() -> Self {
        Self {
            ionization: FileKind::Ionization.default_file_name().to_string(),
            vacancy: FileKind::Vacancy.default_file_name().to_string(),
            no_vacancy: FileKind::NoVacancy.default_file_name().to_string(),
            energy_to_recoils: FileKind::EnergyToRecoils.default_file_name().to_string(),
            phonons: FileKind::Phonons.default_file_name().to_string(),
            range: FileKind::Range.default_file_name().to_string(),
            transmitted: DEFAULT_TRANSMIT_FILE.to_string(),
            transmitted_subdir: DEFAULT_TRANSMIT_SUBDIR.to_string(),
            collision: DEFAULT_COLLISION_FILE.to_string(),
        }
    }
}

impl ResultsLayout {
    pub fn file_name(&self, kind: FileKind) -> &str {
        match kind {
            FileKind::Ionization => &self.ionization,
            FileKind::Vacancy => &self.vacancy,
            FileKind::NoVacancy => &self.no_vacancy,
            FileKind::EnergyToRecoils => &self.energy_to_recoils,
            FileKind::Phonons => &self.phonons,
            FileKind::Range => &self.range,
        }
    }

    pub fn path_for(&self, directory: &Path, kind: FileKind) -> PathBuf {
        directory.join(self.file_name(kind))
    }

    pub fn collision_path(&self, directory: &Path) -> PathBuf {
        directory.join(&self.collision)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResultsLayoutError {
    #[error("failed to read results layout '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse results layout '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<ResultsLayoutError> for SrimError {
    fn from(error: ResultsLayoutError) -> Self {
        match &error {
            ResultsLayoutError::Read { path, source } => {
                let mapped = SrimError::from_io("IO.LAYOUT_READ", path, source);
                SrimError::new(mapped.category(), "IO.LAYOUT_READ", error.to_string())
            }
            ResultsLayoutError::Parse { .. } => {
                SrimError::input_validation("INPUT.LAYOUT", error.to_string())
            }
        }
    }
}

pub fn load_results_layout(layout_path: impl AsRef<Path>) -> SrimResult<ResultsLayout> {
    let layout_path = layout_path.as_ref();
    let source = fs::read_to_string(layout_path).map_err(|source| ResultsLayoutError::Read {
        path: layout_path.to_path_buf(),
        source,
    })?;
    let layout = serde_json::from_str(&source).map_err(|source| ResultsLayoutError::Parse {
        path: layout_path.to_path_buf(),
        source,
    })?;
    Ok(layout)
}
