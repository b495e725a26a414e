use super::model::{ColumnSpec, DepthTable, LayerElement, TargetLayer, required_width};
use crate::common::constants::{KINCHIN_PEASE_MARKER, MAX_TABLE_ROWS};
use crate::common::text::{is_element_symbol, parse_numeric_row, parse_numeric_token};
use crate::domain::{Ion, SrimError, SrimResult};

const ION_COUNT_LABEL: &str = "Total Ions calculated";

/// Parses an `Ion = <Sym> Energy = <keV> keV` line.
pub fn parse_ion_line(line: &str) -> Option<Ion> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    tokens.windows(7).find_map(|window| match window {
        ["Ion", "=", symbol, "Energy", "=", energy, "keV"] if is_element_symbol(symbol) => {
            parse_numeric_token(energy).map(|energy_kev| Ion::from_kev(*symbol, energy_kev))
        }
        _ => None,
    })
}

pub(super) fn find_ion(text: &str) -> SrimResult<Ion> {
    text.lines().find_map(parse_ion_line).ok_or_else(|| {
        SrimError::missing_section(
            "PARSE.ION_HEADER",
            "unable to extract ion: no 'Ion = <symbol> Energy = <value> keV' line",
        )
    })
}

/// Normalizes the raw `Total Ions calculated` value to a whole ion count.
///
/// Thousands separators, quotes and stray letters are dropped; the remaining
/// decimal is truncated toward zero.
pub fn normalize_ion_count(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .chars()
        .filter(|character| character.is_ascii_digit() || *character == '.')
        .collect();
    let value = cleaned.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value.floor() as u64)
}

fn ion_count_token(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(ION_COUNT_LABEL)?;
    let rest = rest.trim_start().strip_prefix('=')?;
    rest.split_whitespace().next()
}

pub(super) fn find_ion_count(text: &str) -> SrimResult<u64> {
    text.lines()
        .filter_map(ion_count_token)
        .find_map(normalize_ion_count)
        .ok_or_else(|| {
            SrimError::missing_section(
                "PARSE.ION_COUNT",
                "unable to extract total ions: no 'Total Ions calculated = <count>' line",
            )
        })
}

/// True for the rule separating the table header from its data, e.g.
/// `-----------  ---------  ----------`.
pub fn is_table_boundary(line: &str) -> bool {
    let mut groups = 0;
    for token in line.split_whitespace() {
        if !token.bytes().all(|byte| byte == b'-') {
            return false;
        }
        groups += 1;
    }
    groups >= 2
}

/// Parses one whitespace-delimited numeric table row.
pub fn parse_data_row(line: &str) -> Option<Vec<f64>> {
    parse_numeric_row(line).filter(|row| !row.is_empty())
}

pub(super) fn extract_table(text: &str, schema: &[ColumnSpec]) -> SrimResult<DepthTable> {
    let lines: Vec<&str> = text.lines().collect();
    let boundary = lines
        .iter()
        .rposition(|line| is_table_boundary(line))
        .ok_or_else(|| {
            SrimError::missing_section(
                "PARSE.TABLE_BOUNDARY",
                "unable to extract table: no dashed header rule found",
            )
        })?;

    let minimum_width = required_width(schema);
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (line_index, line) in lines.iter().enumerate().skip(boundary + 1) {
        if rows.len() == MAX_TABLE_ROWS {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let Some(row) = parse_data_row(line) else {
            break;
        };

        let line_number = line_index + 1;
        if row.len() < minimum_width {
            return Err(SrimError::malformed_record(
                "PARSE.TABLE_ROW",
                format!(
                    "table row at line {} has {} columns, expected at least {}",
                    line_number,
                    row.len(),
                    minimum_width
                ),
            ));
        }
        match rows.first() {
            Some(first) if first.len() != row.len() => {
                return Err(SrimError::malformed_record(
                    "PARSE.TABLE_ROW",
                    format!(
                        "table row at line {} has {} columns, previous rows have {}",
                        line_number,
                        row.len(),
                        first.len()
                    ),
                ));
            }
            _ => {}
        }
        if let Some(previous) = rows.last().map(|last| last[0]).filter(|depth| row[0] < *depth) {
            return Err(SrimError::malformed_record(
                "PARSE.TABLE_ROW",
                format!(
                    "table row at line {} has depth {} below the previous depth {}",
                    line_number, row[0], previous
                ),
            ));
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(SrimError::missing_section(
            "PARSE.TABLE_EMPTY",
            "unable to extract table: no numeric rows after the header rule",
        ));
    }

    Ok(DepthTable::from_rows(&rows, schema))
}

pub(super) fn has_kinchin_pease_marker(text: &str) -> bool {
    text.contains(KINCHIN_PEASE_MARKER)
}

#[derive(Debug, Default)]
struct LayerBuilder {
    index: u32,
    name: String,
    width_angstrom: Option<f64>,
    densities: Option<(f64, f64)>,
    elements: Vec<LayerElement>,
}

impl LayerBuilder {
    fn build(self) -> SrimResult<TargetLayer> {
        let incomplete = |field: &str| {
            SrimError::malformed_record(
                "PARSE.TARGET_LAYERS",
                format!("layer {} ('{}') is missing its {}", self.index, self.name, field),
            )
        };
        let width_angstrom = self.width_angstrom.ok_or_else(|| incomplete("width"))?;
        let (atomic_density, mass_density) = self.densities.ok_or_else(|| incomplete("density"))?;
        Ok(TargetLayer {
            index: self.index,
            name: self.name,
            width_angstrom,
            atomic_density,
            mass_density,
            elements: self.elements,
        })
    }
}

enum LayerLine<'a> {
    Title { index: u32, name: &'a str },
    Width(f64),
    Density { atomic: f64, mass: f64 },
    Element(LayerElement),
}

fn classify_layer_line(line: &str) -> Option<LayerLine<'_>> {
    let trimmed = line.trim();
    let rest = trimmed.strip_prefix("Layer")?;
    let tokens: Vec<&str> = rest.split_whitespace().collect();

    match tokens.as_slice() {
        ["Width", "=", width, ..] => parse_numeric_token(width).map(LayerLine::Width),
        ["#", ..] => {
            let (_, body) = rest.trim_start().strip_prefix('#')?.split_once('-')?;
            let body: Vec<&str> = body.split_whitespace().collect();
            match body.as_slice() {
                ["Density", "=", atomic, _, "=", mass, ..] => Some(LayerLine::Density {
                    atomic: parse_numeric_token(atomic)?,
                    mass: parse_numeric_token(mass)?,
                }),
                [symbol, "=", atomic, "Atomic", "Percent", "=", mass, "Mass", "Percent", ..]
                    if is_element_symbol(symbol) =>
                {
                    Some(LayerLine::Element(LayerElement {
                        symbol: (*symbol).to_string(),
                        atomic_percent: parse_numeric_token(atomic)?,
                        mass_percent: parse_numeric_token(mass)?,
                    }))
                }
                _ => None,
            }
        }
        [index, ":", ..] => {
            let index = index.parse::<u32>().ok()?;
            let (_, name) = rest.split_once(':')?;
            Some(LayerLine::Title {
                index,
                name: name.trim(),
            })
        }
        _ => None,
    }
}

/// Recovers the target layer stack echoed in an output file header.
pub fn parse_target_layers(bytes: &[u8]) -> SrimResult<Vec<TargetLayer>> {
    let text = crate::common::text::decode_latin1(bytes);
    let mut layers = Vec::new();
    let mut current: Option<LayerBuilder> = None;

    for line in text.lines() {
        match classify_layer_line(line) {
            Some(LayerLine::Title { index, name }) => {
                if let Some(done) = current.take() {
                    layers.push(done.build()?);
                }
                current = Some(LayerBuilder {
                    index,
                    name: name.to_string(),
                    ..LayerBuilder::default()
                });
            }
            Some(LayerLine::Width(width)) => {
                if let Some(layer) = current.as_mut() {
                    layer.width_angstrom = Some(width);
                }
            }
            Some(LayerLine::Density { atomic, mass }) => {
                if let Some(layer) = current.as_mut() {
                    layer.densities = Some((atomic, mass));
                }
            }
            Some(LayerLine::Element(element)) => {
                if let Some(layer) = current.as_mut() {
                    layer.elements.push(element);
                }
            }
            None => {}
        }
    }
    if let Some(done) = current.take() {
        layers.push(done.build()?);
    }

    if layers.is_empty() {
        return Err(SrimError::missing_section(
            "PARSE.TARGET_LAYERS",
            "unable to extract target: no 'Layer N : <name>' block found",
        ));
    }
    Ok(layers)
}
