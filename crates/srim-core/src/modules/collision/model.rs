use serde::Serialize;

/// Target damage tallies attributed to one collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageTally {
    pub displacements: f64,
    pub vacancies: f64,
    pub replacements: f64,
    pub interstitials: f64,
}

impl DamageTally {
    /// Kinchin-Pease records only carry displacements.
    pub const fn displacements_only(displacements: f64) -> Self {
        Self {
            displacements,
            vacancies: 0.0,
            replacements: 0.0,
            interstitials: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeRecoil {
    pub recoil: u32,
    pub atom: u32,
    pub recoil_energy: f64,
    pub position: [f64; 3],
    pub vacancies: u32,
    pub replacements: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CollisionDetail {
    /// Kinchin-Pease estimate: one displacement tally on the record itself.
    Flat { displacements: f64 },
    /// Full cascade; `summary` is absent when the cascade block ends without one.
    Cascaded {
        recoils: Vec<CascadeRecoil>,
        summary: Option<DamageTally>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollisionRecord {
    pub ion_number: u64,
    pub kinetic_energy: f64,
    pub depth: f64,
    pub lateral_y: f64,
    pub lateral_z: f64,
    pub stopping_energy: f64,
    pub atom: String,
    pub recoil_energy: f64,
    pub detail: CollisionDetail,
}

impl CollisionRecord {
    pub fn damage(&self) -> Option<DamageTally> {
        match &self.detail {
            CollisionDetail::Flat { displacements } => {
                Some(DamageTally::displacements_only(*displacements))
            }
            CollisionDetail::Cascaded { summary, .. } => *summary,
        }
    }

    pub fn recoils(&self) -> &[CascadeRecoil] {
        match &self.detail {
            CollisionDetail::Flat { .. } => &[],
            CollisionDetail::Cascaded { recoils, .. } => recoils,
        }
    }
}

/// Per-ion totals printed after the collision table, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IonSummary {
    pub displacements: f64,
    pub avg_displacements: f64,
    pub replacements: f64,
    pub avg_replacements: f64,
    pub vacancies: f64,
    pub avg_vacancies: f64,
    pub interstitials: f64,
    pub avg_interstitials: f64,
    pub sputtered_atoms: f64,
    pub avg_sputtered_atoms: f64,
    pub transmitted_atoms: f64,
    pub avg_transmitted_atoms: f64,
}

impl IonSummary {
    pub(super) fn from_values(values: &[f64; 12]) -> Self {
        Self {
            displacements: values[0],
            avg_displacements: values[1],
            replacements: values[2],
            avg_replacements: values[3],
            vacancies: values[4],
            avg_vacancies: values[5],
            interstitials: values[6],
            avg_interstitials: values[7],
            sputtered_atoms: values[8],
            avg_sputtered_atoms: values[9],
            transmitted_atoms: values[10],
            avg_transmitted_atoms: values[11],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IonCollisionReport {
    pub ion_number: u64,
    pub summary: IonSummary,
    pub collisions: Vec<CollisionRecord>,
}
