use crate::domain::{FileKind, Ion};
use serde::Serialize;

/// Which raw columns a channel takes from every data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnSlice {
    Single(usize),
    /// Every column from this index to the end of the row.
    From(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub name: &'static str,
    pub unit: &'static str,
    pub slice: ColumnSlice,
}

const fn single(name: &'static str, unit: &'static str, index: usize) -> ColumnSpec {
    ColumnSpec {
        name,
        unit,
        slice: ColumnSlice::Single(index),
    }
}

const fn trailing(name: &'static str, unit: &'static str, index: usize) -> ColumnSpec {
    ColumnSpec {
        name,
        unit,
        slice: ColumnSlice::From(index),
    }
}

const ENERGY_UNIT: &str = "eV/(Angstrom-Ion)";

const IONIZATION_COLUMNS: [ColumnSpec; 2] = [
    single("ions", ENERGY_UNIT, 1),
    single("recoils", ENERGY_UNIT, 2),
];
const VACANCY_COLUMNS: [ColumnSpec; 2] = [
    single("knock_ons", "Vacancies/(Angstrom-Ion)", 1),
    trailing("vacancies", "Vacancies/(Angstrom-Ion)", 2),
];
const NO_VACANCY_COLUMNS: [ColumnSpec; 1] = [single("replacements", "Number/(Angstrom-Ion)", 1)];
const ENERGY_TO_RECOILS_COLUMNS: [ColumnSpec; 2] = [
    single("ions", ENERGY_UNIT, 1),
    trailing("absorbed", ENERGY_UNIT, 2),
];
const PHONON_COLUMNS: [ColumnSpec; 2] = [
    single("ions", "Phonons/(Angstrom-Ion)", 1),
    single("recoils", "Phonons/(Angstrom-Ion)", 2),
];
const RANGE_COLUMNS: [ColumnSpec; 2] = [
    single("ions", "(Atoms/cm3)/(Atoms/cm2)", 1),
    trailing("elements", "(Atoms/cm3)/(Atoms/cm2)", 2),
];

/// Channel layout of each file kind; column 0 is always depth.
pub fn column_schema(kind: FileKind) -> &'static [ColumnSpec] {
    match kind {
        FileKind::Ionization => &IONIZATION_COLUMNS,
        FileKind::Vacancy => &VACANCY_COLUMNS,
        FileKind::NoVacancy => &NO_VACANCY_COLUMNS,
        FileKind::EnergyToRecoils => &ENERGY_TO_RECOILS_COLUMNS,
        FileKind::Phonons => &PHONON_COLUMNS,
        FileKind::Range => &RANGE_COLUMNS,
    }
}

/// Smallest row width that satisfies every channel of `schema`.
pub fn required_width(schema: &[ColumnSpec]) -> usize {
    schema
        .iter()
        .map(|spec| match spec.slice {
            ColumnSlice::Single(index) | ColumnSlice::From(index) => index + 1,
        })
        .max()
        .unwrap_or(1)
        .max(1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", content = "values", rename_all = "snake_case")]
pub enum ChannelData {
    Single(Vec<f64>),
    /// One vector per source column, each with one value per row.
    Columns(Vec<Vec<f64>>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub name: &'static str,
    pub unit: &'static str,
    pub data: ChannelData,
}

/// Depth-indexed table; depth in Angstrom.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthTable {
    depth: Vec<f64>,
    channels: Vec<Channel>,
}

impl DepthTable {
    pub(super) fn from_rows(rows: &[Vec<f64>], schema: &[ColumnSpec]) -> Self {
        let width = rows.first().map_or(0, Vec::len);
        let depth = rows.iter().map(|row| row[0]).collect();
        let channels = schema
            .iter()
            .map(|spec| {
                let data = match spec.slice {
                    ColumnSlice::Single(index) => {
                        ChannelData::Single(rows.iter().map(|row| row[index]).collect())
                    }
                    ColumnSlice::From(start) => ChannelData::Columns(
                        (start..width)
                            .map(|column| rows.iter().map(|row| row[column]).collect())
                            .collect(),
                    ),
                };
                Channel {
                    name: spec.name,
                    unit: spec.unit,
                    data,
                }
            })
            .collect();

        Self { depth, channels }
    }

    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|channel| channel.name == name)
    }

    pub fn single(&self, name: &str) -> Option<&[f64]> {
        match &self.channel(name)?.data {
            ChannelData::Single(values) => Some(values),
            ChannelData::Columns(_) => None,
        }
    }

    pub fn columns(&self, name: &str) -> Option<&[Vec<f64>]> {
        match &self.channel(name)?.data {
            ChannelData::Columns(columns) => Some(columns),
            ChannelData::Single(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub kind: FileKind,
    pub ion: Ion,
    pub num_ions: u64,
    pub table: DepthTable,
}

impl OutputRecord {
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            ion: self.ion.clone(),
            num_ions: self.num_ions,
            rows: self.table.len(),
            channels: self
                .table
                .channels()
                .iter()
                .map(|channel| channel.name)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub ion: Ion,
    pub num_ions: u64,
    pub rows: usize,
    pub channels: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerElement {
    pub symbol: String,
    pub atomic_percent: f64,
    pub mass_percent: f64,
}

/// One target layer echoed in an output header.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetLayer {
    pub index: u32,
    pub name: String,
    pub width_angstrom: f64,
    /// atoms/cm3
    pub atomic_density: f64,
    /// g/cm3
    pub mass_density: f64,
    pub elements: Vec<LayerElement>,
}
