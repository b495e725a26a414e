use super::model::{Measure, ParticleType, RunMetadata, TransmittedEvent};
use crate::common::constants::{TRANSMIT_COLUMN_HEADER, TRIM_CALC_MARKER};
use crate::common::text::parse_numeric_token;
use crate::domain::{SrimError, SrimResult};

const EVENT_FIELDS: usize = 10;

/// Parses `Sym(value unit) ==> layers( value unit)` after the calc marker.
pub fn parse_metadata_line(line: &str) -> Option<RunMetadata> {
    let (_, rest) = line.split_once(TRIM_CALC_MARKER)?;
    let (projectile_part, target_part) = rest.split_once("==>")?;

    let (projectile, beam_energy) = split_measured(projectile_part.trim())?;
    if projectile.is_empty() || !projectile.bytes().all(|byte| byte.is_ascii_alphabetic()) {
        return None;
    }
    let (layer_name, layer_thickness) = split_measured(target_part.trim())?;
    if layer_name.is_empty() {
        return None;
    }

    Some(RunMetadata {
        projectile: projectile.to_string(),
        beam_energy,
        layer_name: layer_name.to_string(),
        layer_thickness,
    })
}

/// Splits `name(value unit)` on the first parenthesised group that holds a
/// measure, returning the trimmed name before it.
fn split_measured(text: &str) -> Option<(&str, Measure)> {
    text.match_indices('(').find_map(|(open, _)| {
        let inner = &text[open + 1..];
        let close = inner.find(')')?;
        let measure = parse_measure(&inner[..close])?;
        Some((text[..open].trim(), measure))
    })
}

fn parse_measure(text: &str) -> Option<Measure> {
    let text = text.trim();
    let split = text.find(|ch: char| ch.is_ascii_alphabetic())?;
    let value_token = text[..split].trim();
    let unit = text[split..].trim();
    if value_token.is_empty() || !unit.bytes().all(|byte| byte.is_ascii_alphabetic()) {
        return None;
    }
    if !value_token
        .bytes()
        .all(|byte| byte.is_ascii_digit() || byte == b'.')
    {
        return None;
    }
    Some(Measure {
        value: value_token.parse().ok()?,
        unit: unit.to_string(),
    })
}

pub(super) fn find_metadata(text: &str) -> SrimResult<RunMetadata> {
    text.lines()
        .filter(|line| line.contains(TRIM_CALC_MARKER))
        .find_map(parse_metadata_line)
        .ok_or_else(|| {
            SrimError::missing_section(
                "PARSE.TRANSMIT_METADATA",
                "no 'TRIM Calc.=' metadata line with projectile and layer thickness",
            )
        })
}

pub fn is_column_header(line: &str) -> bool {
    line.split_whitespace().eq(TRANSMIT_COLUMN_HEADER)
}

pub(super) fn extract_events(text: &str) -> SrimResult<Vec<TransmittedEvent>> {
    let lines: Vec<&str> = text.lines().collect();
    let header = lines
        .iter()
        .rposition(|line| is_column_header(line))
        .ok_or_else(|| {
            SrimError::missing_section(
                "PARSE.TRANSMIT_COLUMNS",
                "no 'Numb Numb (eV) X(A) Y(A) Z(A) Cos(X) Cos(Y) Cos(Z)' column header",
            )
        })?;

    lines
        .iter()
        .enumerate()
        .skip(header + 1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_event_line(line).ok_or_else(|| {
                SrimError::malformed_record(
                    "PARSE.TRANSMIT_EVENT",
                    format!("line {}: not a transmitted-particle record: '{}'", index + 1, line.trim()),
                )
            })
        })
        .collect()
}

/// Parses one event row. A type letter glued to the ion number (`T1234`) is
/// split off first.
pub fn parse_event_line(line: &str) -> Option<TransmittedEvent> {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    let first = *tokens.first()?;
    if first.len() > 1 && first.as_bytes()[0].is_ascii_alphabetic() {
        let (code, number) = first.split_at(1);
        tokens[0] = code;
        tokens.insert(1, number);
    }
    if tokens.len() != EVENT_FIELDS {
        return None;
    }

    let number = |index: usize| parse_numeric_token(tokens[index]);
    Some(TransmittedEvent {
        particle_type: ParticleType::from_code(tokens[0])?,
        ion_number: tokens[1].parse().ok()?,
        atomic_number: tokens[2].parse().ok()?,
        energy_ev: number(3)?,
        position: [number(4)?, number(5)?, number(6)?],
        direction_cosines: [number(7)?, number(8)?, number(9)?],
    })
}
