use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParticleType {
    Sputtered,
    Backscattered,
    Transmitted,
}

impl ParticleType {
    pub const ALL: [Self; 3] = [Self::Sputtered, Self::Backscattered, Self::Transmitted];

    /// Maps the first-column letter (`S`, `B`, `T`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::Sputtered),
            "B" => Some(Self::Backscattered),
            "T" => Some(Self::Transmitted),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sputtered => "sputtered",
            Self::Backscattered => "backscattered",
            Self::Transmitted => "transmitted",
        }
    }
}

impl Display for ParticleType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value with the unit string the simulator printed next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub projectile: String,
    pub beam_energy: Measure,
    pub layer_name: String,
    pub layer_thickness: Measure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmittedEvent {
    pub particle_type: ParticleType,
    pub ion_number: u64,
    pub atomic_number: u32,
    pub energy_ev: f64,
    /// Depth followed by the two transverse axes, in Angstrom.
    pub position: [f64; 3],
    pub direction_cosines: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmittedRun {
    pub metadata: RunMetadata,
    pub events: Vec<TransmittedEvent>,
}

impl TransmittedRun {
    pub fn count(&self, kind: ParticleType) -> usize {
        self.events
            .iter()
            .filter(|event| event.particle_type == kind)
            .count()
    }

    pub fn counts(&self) -> Vec<(ParticleType, usize)> {
        ParticleType::ALL
            .into_iter()
            .map(|kind| (kind, self.count(kind)))
            .collect()
    }
}
