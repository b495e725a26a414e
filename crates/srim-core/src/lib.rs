//! Readers for the text outputs written by the SRIM/TRIM ion-transport
//! simulator: depth profiles, transmitted-particle events and the collision
//! log.

pub mod common;
pub mod domain;
pub mod modules;

pub use common::layout::{ResultsLayout, load_results_layout};
pub use domain::{FileKind, Ion, SrimError, SrimErrorCategory, SrimResult};
