//! Loads every depth-profile output of one TRIM run directory.

use crate::common::layout::ResultsLayout;
use crate::domain::{FileKind, SrimResult};
use crate::modules::tabular::{OutputRecord, RecordSummary, read_output};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SrimResults {
    pub ionization: OutputRecord,
    pub vacancy: OutputRecord,
    /// `None` when the run used Kinchin-Pease damage estimates.
    pub no_vacancy: Option<OutputRecord>,
    pub energy_to_recoils: OutputRecord,
    pub phonons: OutputRecord,
    pub range: OutputRecord,
}

impl SrimResults {
    pub fn from_directory(directory: impl AsRef<Path>) -> SrimResult<Self> {
        Self::from_directory_with_layout(directory, &ResultsLayout::default())
    }

    pub fn from_directory_with_layout(
        directory: impl AsRef<Path>,
        layout: &ResultsLayout,
    ) -> SrimResult<Self> {
        let directory = directory.as_ref();
        let read = |kind: FileKind| read_output(kind, &layout.path_for(directory, kind));

        let ionization = read(FileKind::Ionization)?;
        let vacancy = read(FileKind::Vacancy)?;
        let no_vacancy = match read(FileKind::NoVacancy) {
            Ok(record) => Some(record),
            Err(error) if error.is_unsupported_mode() => {
                warn!(
                    directory = %directory.display(),
                    reason = %error.message(),
                    "skipping no-vacancy output"
                );
                None
            }
            Err(error) => return Err(error),
        };
        let energy_to_recoils = read(FileKind::EnergyToRecoils)?;
        let phonons = read(FileKind::Phonons)?;
        let range = read(FileKind::Range)?;

        debug!(directory = %directory.display(), "loaded results directory");
        Ok(Self {
            ionization,
            vacancy,
            no_vacancy,
            energy_to_recoils,
            phonons,
            range,
        })
    }

    pub fn record(&self, kind: FileKind) -> Option<&OutputRecord> {
        match kind {
            FileKind::Ionization => Some(&self.ionization),
            FileKind::Vacancy => Some(&self.vacancy),
            FileKind::NoVacancy => self.no_vacancy.as_ref(),
            FileKind::EnergyToRecoils => Some(&self.energy_to_recoils),
            FileKind::Phonons => Some(&self.phonons),
            FileKind::Range => Some(&self.range),
        }
    }

    /// One summary per loaded kind, in [`FileKind::ALL`] order.
    pub fn summaries(&self) -> Vec<(FileKind, RecordSummary)> {
        FileKind::ALL
            .into_iter()
            .filter_map(|kind| self.record(kind).map(|record| (kind, record.summary())))
            .collect()
    }
}
