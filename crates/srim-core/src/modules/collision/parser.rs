//! Per-ion state machine over one block of the collision log.
//!
//! Stages run in order over a shared [`LineCursor`]: header skip, collision
//! table (with optional cascade sub-blocks), then the ion footer.

use super::model::{
    CascadeRecoil, CollisionDetail, CollisionRecord, DamageTally, IonCollisionReport, IonSummary,
};
use crate::common::constants::{
    CASCADE_HEADER_PREFIX, CASCADE_START_MARKER, ION_FOOTER_STATISTICS, LONG_CASCADE_TERMINATOR,
};
use crate::common::text::{
    first_element_symbol, first_integer, is_dash_rule, is_equals_rule, parse_numeric_token,
    scan_numbers, separator_segments,
};

/// Separated columns on a collision line: eight fields plus the damage or
/// cascade-marker column.
const COLLISION_COLUMNS: usize = 9;
const RECOIL_FIELDS: usize = 8;
const SUMMARY_COLUMNS: usize = 6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CollisionParseError {
    #[error("ion header has no dashed rule")]
    MissingHeaderRule,
    #[error("record ended inside the {0}")]
    UnexpectedEnd(&'static str),
    #[error("line {line}: expected at least {expected} separated columns, found {found}")]
    TooFewColumns {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: invalid {field} '{token}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        token: String,
    },
    #[error("line {line}: atom column has no element symbol")]
    MissingAtom { line: usize },
    #[error("line {line}: cascade start is not followed by an equals rule")]
    MissingCascadeRule { line: usize },
    #[error("line {line}: unexpected cascade column header")]
    MissingCascadeHeader { line: usize },
    #[error("line {line}: cascade recoil has {found} fields, expected 8")]
    MalformedRecoil { line: usize, found: usize },
    #[error("line {line}: ion footer has no ion number")]
    MissingIonNumber { line: usize },
    #[error("ion footer holds {found} statistics, expected 12")]
    FooterStatistics { found: usize },
    #[error("collision belongs to ion {collision} but the footer names ion {footer}")]
    IonNumberMismatch { collision: u64, footer: u64 },
}

type ParseResult<T> = Result<T, CollisionParseError>;

/// Forward-only position over the lines of one ion block.
#[derive(Debug)]
pub(super) struct LineCursor<'a> {
    lines: Vec<&'a str>,
    position: usize,
}

impl<'a> LineCursor<'a> {
    pub(super) fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            position: 0,
        }
    }

    /// Next line with its 1-based number inside the block.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = *self.lines.get(self.position)?;
        self.position += 1;
        Some((self.position, line))
    }

    fn expect_line(&mut self, stage: &'static str) -> ParseResult<(usize, &'a str)> {
        self.next_line()
            .ok_or(CollisionParseError::UnexpectedEnd(stage))
    }
}

pub fn parse_ion_record(text: &str) -> ParseResult<IonCollisionReport> {
    let mut cursor = LineCursor::new(text);
    skip_header(&mut cursor)?;
    let collisions = read_collisions(&mut cursor)?;
    let (ion_number, summary) = read_footer(&mut cursor)?;

    if let Some(stray) = collisions
        .iter()
        .find(|collision| collision.ion_number != ion_number)
    {
        return Err(CollisionParseError::IonNumberMismatch {
            collision: stray.ion_number,
            footer: ion_number,
        });
    }

    Ok(IonCollisionReport {
        ion_number,
        summary,
        collisions,
    })
}

fn skip_header(cursor: &mut LineCursor<'_>) -> ParseResult<()> {
    while let Some((_, line)) = cursor.next_line() {
        if is_dash_rule(line) {
            return Ok(());
        }
    }
    Err(CollisionParseError::MissingHeaderRule)
}

fn read_collisions(cursor: &mut LineCursor<'_>) -> ParseResult<Vec<CollisionRecord>> {
    let mut collisions = Vec::new();

    loop {
        let (line_number, line) = cursor.expect_line("collision table")?;
        if is_equals_rule(line) {
            break;
        }

        let segments = separator_segments(line);
        if segments.len() < COLLISION_COLUMNS {
            return Err(CollisionParseError::TooFewColumns {
                line: line_number,
                expected: COLLISION_COLUMNS,
                found: segments.len(),
            });
        }

        let starts_cascade = segments
            .last()
            .is_some_and(|segment| is_cascade_marker(segment));
        let (detail, table_ended) = if starts_cascade {
            let (recoils, summary) = read_cascade(cursor)?;
            let table_ended = summary.is_none();
            (CollisionDetail::Cascaded { recoils, summary }, table_ended)
        } else {
            let displacements = number(line_number, "displacement tally", segments[8])?;
            (CollisionDetail::Flat { displacements }, false)
        };

        collisions.push(collision_record(line_number, &segments, detail)?);
        if table_ended {
            break;
        }
    }

    Ok(collisions)
}

fn is_cascade_marker(segment: &str) -> bool {
    segment.trim_start().starts_with(CASCADE_START_MARKER)
}

fn collision_record(
    line: usize,
    segments: &[&str],
    detail: CollisionDetail,
) -> ParseResult<CollisionRecord> {
    let ion_token = segments[0].trim();
    let ion_number = ion_token
        .parse::<u64>()
        .map_err(|_| invalid(line, "ion number", ion_token))?;
    let atom = first_element_symbol(segments[6])
        .ok_or(CollisionParseError::MissingAtom { line })?
        .to_string();

    Ok(CollisionRecord {
        ion_number,
        kinetic_energy: number(line, "kinetic energy", segments[1])?,
        depth: number(line, "depth", segments[2])?,
        lateral_y: number(line, "lateral y distance", segments[3])?,
        lateral_z: number(line, "lateral z distance", segments[4])?,
        stopping_energy: number(line, "stopping energy", segments[5])?,
        atom,
        recoil_energy: number(line, "recoil energy", segments[7])?,
        detail,
    })
}

/// Reads a cascade sub-block. A `None` summary means the block closed
/// without one, which also closes the collision table.
fn read_cascade(
    cursor: &mut LineCursor<'_>,
) -> ParseResult<(Vec<CascadeRecoil>, Option<DamageTally>)> {
    let (line_number, rule) = cursor.expect_line("cascade")?;
    if !is_equals_rule(rule) {
        return Err(CollisionParseError::MissingCascadeRule { line: line_number });
    }

    let (line_number, header) = cursor.expect_line("cascade")?;
    let normalized = header.split_whitespace().collect::<Vec<_>>().join(" ");
    if !normalized.starts_with(CASCADE_HEADER_PREFIX) {
        return Err(CollisionParseError::MissingCascadeHeader { line: line_number });
    }

    let mut recoils = Vec::new();
    let terminator = loop {
        let (line_number, line) = cursor.expect_line("cascade")?;
        if is_equals_rule(line) {
            break line;
        }
        recoils.push(parse_recoil(line_number, line)?);
    };

    if terminator.trim().len() > LONG_CASCADE_TERMINATOR {
        return Ok((recoils, None));
    }

    let (line_number, line) = cursor.expect_line("cascade summary")?;
    let segments = separator_segments(line);
    if segments.is_empty() {
        return Ok((recoils, None));
    }
    if segments.len() < SUMMARY_COLUMNS {
        return Err(CollisionParseError::TooFewColumns {
            line: line_number,
            expected: SUMMARY_COLUMNS,
            found: segments.len(),
        });
    }

    let summary = DamageTally {
        displacements: number(line_number, "cascade displacements", segments[2])?,
        vacancies: number(line_number, "cascade vacancies", segments[3])?,
        replacements: number(line_number, "cascade replacements", segments[4])?,
        interstitials: number(line_number, "cascade interstitials", segments[5])?,
    };
    Ok((recoils, Some(summary)))
}

fn parse_recoil(line: usize, text: &str) -> ParseResult<CascadeRecoil> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let fields = if tokens.len() >= 2 {
        &tokens[1..tokens.len() - 1]
    } else {
        &[][..]
    };
    if fields.len() < RECOIL_FIELDS {
        return Err(CollisionParseError::MalformedRecoil {
            line,
            found: fields.len(),
        });
    }

    Ok(CascadeRecoil {
        recoil: integer(line, "recoil index", fields[0])?,
        atom: integer(line, "recoil atom", fields[1])?,
        recoil_energy: number(line, "recoil energy", fields[2])?,
        position: [
            number(line, "recoil x", fields[3])?,
            number(line, "recoil y", fields[4])?,
            number(line, "recoil z", fields[5])?,
        ],
        vacancies: integer(line, "recoil vacancies", fields[6])?,
        replacements: integer(line, "recoil replacements", fields[7])?,
    })
}

fn read_footer(cursor: &mut LineCursor<'_>) -> ParseResult<(u64, IonSummary)> {
    let (line_number, line) = cursor.expect_line("ion footer")?;
    let ion_number = first_integer(line)
        .and_then(|value| u64::try_from(value).ok())
        .ok_or(CollisionParseError::MissingIonNumber { line: line_number })?;

    let mut footer = String::new();
    while let Some((_, line)) = cursor.next_line() {
        if is_equals_rule(line) {
            break;
        }
        footer.push_str(line);
        footer.push('\n');
    }

    let values = scan_numbers(&footer);
    let statistics: [f64; ION_FOOTER_STATISTICS] = values
        .get(..ION_FOOTER_STATISTICS)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(CollisionParseError::FooterStatistics {
            found: values.len(),
        })?;

    Ok((ion_number, IonSummary::from_values(&statistics)))
}

fn invalid(line: usize, field: &'static str, token: &str) -> CollisionParseError {
    CollisionParseError::InvalidField {
        line,
        field,
        token: token.trim().to_string(),
    }
}

fn number(line: usize, field: &'static str, token: &str) -> ParseResult<f64> {
    parse_numeric_token(token).ok_or_else(|| invalid(line, field, token))
}

fn integer(line: usize, field: &'static str, token: &str) -> ParseResult<u32> {
    token
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid(line, field, token))
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Builders for synthetic collision-log blocks.

    const SEP: char = '\u{00B3}';

    /// Encodes fixture text the way the simulator writes it (one byte per char).
    pub(crate) fn encode_latin1(text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
            .collect()
    }

    pub(crate) fn separated(fields: &[&str]) -> String {
        let mut line = String::new();
        line.push(SEP);
        for field in fields {
            line.push_str(field);
            line.push(SEP);
        }
        line
    }

    pub(crate) fn header(ion: u64) -> String {
        format!(
            "  Ion    Energy     Depth   Lateral-Distance   Stopping  Atom  Recoil  Target\r\n\
             {}\r\n\
             -------------------------------------------------------------------------\r\n",
            separated(&[&format!(" Numb {ion}"), " (keV) ", " X(A) "])
        )
    }

    pub(crate) fn flat_collision(ion: u64, depth: f64, displacements: f64) -> String {
        separated(&[
            &format!("{ion:05}"),
            "1.000E+03",
            &format!("{depth:.3E}"),
            "-1.5E+00",
            "2.0E-01",
            " 5.00E+01 ",
            " Ni ",
            "2.50E+02",
            &format!("  {displacements}  "),
        ])
    }

    pub(crate) fn cascade_collision(ion: u64, depth: f64) -> String {
        separated(&[
            &format!("{ion:05}"),
            "9.000E+02",
            &format!("{depth:.3E}"),
            "0.0E+00",
            "0.0E+00",
            " 4.00E+01 ",
            " O  ",
            "3.00E+01",
            "  <== Start of New Cascade  ",
        ])
    }

    pub(crate) fn cascade_block(recoils: usize, summary: Option<[u32; 4]>) -> String {
        let rule = if summary.is_some() { 60 } else { 120 };
        let mut block = format!(
            "{}\r\n  Recoil Atom Energy(eV)   X (A)      Y (A)      Z (A)   Vac Repl Ion Numb 1=\r\n",
            "=".repeat(60)
        );
        for recoil in 1..=recoils {
            block.push_str(&format!(
                "\u{00DB} {recoil:04}  8  3.0E+01  1.2E+01  1.0E+00 -2.0E+00    1   0 \u{00DB}\r\n"
            ));
        }
        block.push_str(&"=".repeat(rule));
        block.push_str("\r\n");
        if let Some([disp, vac, repl, inter]) = summary {
            block.push_str(&separated(&[
                " Cascade ",
                " Sum ",
                &disp.to_string(),
                &vac.to_string(),
                &repl.to_string(),
                &inter.to_string(),
            ]));
            block.push_str("\r\n");
        }
        block
    }

    pub(crate) fn footer(ion: u64) -> String {
        format!(
            "{rule}\r\n Summary of Ion {ion}\r\n\
             Displacements = 5 Avg = 5.0\r\n\
             Replacements = 1 Avg = 1.0\r\n\
             Vacancies = 4 Avg = 4.0\r\n\
             Interstitials = 3 Avg = 3.0\r\n\
             Sputtered = 0 Avg = 0.0\r\n\
             Transmitted = 2 Avg = 2.0\r\n\
             {rule}\r\n",
            rule = "=".repeat(60)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{cascade_block, cascade_collision, flat_collision, footer, header};
    use super::{CollisionParseError, parse_ion_record};
    use crate::modules::collision::model::{CollisionDetail, DamageTally};

    #[test]
    fn kinchin_pease_block_reads_flat_tallies() {
        let text = format!(
            "{}{}\r\n{}\r\n{}",
            header(1),
            flat_collision(1, 10.0, 7.0),
            flat_collision(1, 20.0, 2.0),
            footer(1)
        );
        let report = parse_ion_record(&text).expect("KP block parses");

        assert_eq!(report.ion_number, 1);
        assert_eq!(report.collisions.len(), 2);
        let first = &report.collisions[0];
        assert_eq!(first.atom, "Ni");
        assert_eq!(first.depth, 10.0);
        assert_eq!(first.damage(), Some(DamageTally::displacements_only(7.0)));
        assert_eq!(report.summary.displacements, 5.0);
        assert_eq!(report.summary.avg_transmitted_atoms, 2.0);
    }

    #[test]
    fn cascade_block_takes_tallies_from_summary_line() {
        let text = format!(
            "{}{}\r\n{}{}\r\n{}",
            header(3),
            cascade_collision(3, 15.0),
            cascade_block(2, Some([9, 4, 2, 3])),
            flat_collision(3, 30.0, 1.0),
            footer(3)
        );
        let report = parse_ion_record(&text).expect("cascade block parses");

        assert_eq!(report.collisions.len(), 2);
        let cascade = &report.collisions[0];
        assert_eq!(cascade.atom, "O");
        assert_eq!(cascade.recoils().len(), 2);
        assert_eq!(cascade.recoils()[1].recoil, 2);
        assert_eq!(cascade.recoils()[0].position, [12.0, 1.0, -2.0]);
        assert_eq!(
            cascade.damage(),
            Some(DamageTally {
                displacements: 9.0,
                vacancies: 4.0,
                replacements: 2.0,
                interstitials: 3.0,
            })
        );
        assert!(matches!(
            report.collisions[1].detail,
            CollisionDetail::Flat { displacements } if displacements == 1.0
        ));
    }

    #[test]
    fn long_cascade_terminator_closes_the_table_without_summary() {
        let text = format!(
            "{}{}\r\n{}{}",
            header(2),
            cascade_collision(2, 5.0),
            cascade_block(1, None),
            footer(2).split_once("\r\n").map(|(_, rest)| rest).unwrap_or_default()
        );
        let report = parse_ion_record(&text).expect("long terminator block parses");

        assert_eq!(report.ion_number, 2);
        assert_eq!(report.collisions.len(), 1);
        assert!(report.collisions[0].damage().is_none());
        assert_eq!(report.collisions[0].recoils().len(), 1);
    }

    #[test]
    fn missing_header_rule_fails() {
        let error = parse_ion_record("  Ion    Energy\r\nno rule\r\n").expect_err("no rule");
        assert_eq!(error, CollisionParseError::MissingHeaderRule);
    }

    #[test]
    fn short_collision_line_fails_with_its_line_number() {
        let text = format!("{}\u{00B3}00001\u{00B3}1.0\u{00B3}\r\n{}", header(1), footer(1));
        let error = parse_ion_record(&text).expect_err("short line");
        assert_eq!(
            error,
            CollisionParseError::TooFewColumns {
                line: 4,
                expected: 9,
                found: 2,
            }
        );
    }

    #[test]
    fn footer_ion_number_must_match_collisions() {
        let text = format!("{}{}\r\n{}", header(1), flat_collision(1, 1.0, 1.0), footer(4));
        let error = parse_ion_record(&text).expect_err("mismatch");
        assert_eq!(
            error,
            CollisionParseError::IonNumberMismatch {
                collision: 1,
                footer: 4,
            }
        );
    }

    #[test]
    fn footer_needs_twelve_statistics() {
        let text = format!(
            "{}{}\r\n{}\r\n Ion 1\r\n Displacements = 5\r\n",
            header(1),
            flat_collision(1, 1.0, 1.0),
            "=".repeat(40)
        );
        let error = parse_ion_record(&text).expect_err("short footer");
        assert_eq!(error, CollisionParseError::FooterStatistics { found: 1 });
    }
}
