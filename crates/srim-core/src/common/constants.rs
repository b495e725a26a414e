//! Fixed markers and limits of the SRIM/TRIM text output formats.
//!
//! The external simulator does not vary these at runtime; parsers reference
//! them by name instead of repeating literals.

/// Rows kept per depth-profile table. Downstream displays are sized for it.
pub const MAX_TABLE_ROWS: usize = 100;

/// Bytes read per indexer pass over the collision log.
pub const INDEX_CHUNK_SIZE: usize = 4096;

/// A cascade terminator rule longer than this carries no summary line.
///
/// Observed on SRIM-2013 collision logs; older format revisions may differ.
pub const LONG_CASCADE_TERMINATOR: usize = 100;

/// Column separator byte of the collision log (decimal 179).
pub const COLUMN_SEPARATOR: u8 = 0xB3;

/// Column separator after Latin-1 decoding.
pub const COLUMN_SEPARATOR_CHAR: char = '\u{00B3}';

/// Bytes opening every ion block of the collision log.
pub const ION_BLOCK_MARKER: &[u8] = b"  Ion    Energy";

pub const KINCHIN_PEASE_MARKER: &str =
    "Recoil/Damage Calculations made with Kinchin-Pease Estimates";

pub const CASCADE_START_MARKER: &str = "<== Start of New Cascade";

pub const CASCADE_HEADER_PREFIX: &str =
    "Recoil Atom Energy(eV) X (A) Y (A) Z (A) Vac Repl Ion Numb";

pub const TRIM_CALC_MARKER: &str = "TRIM Calc.=";

pub const TRANSMIT_COLUMN_HEADER: [&str; 9] = [
    "Numb", "Numb", "(eV)", "X(A)", "Y(A)", "Z(A)", "Cos(X)", "Cos(Y)", "Cos(Z)",
];

/// Summary statistics closing each ion block of the collision log.
pub const ION_FOOTER_STATISTICS: usize = 12;

/// Scanned at most this far for the collision log free-text header.
pub const HEADER_SCAN_LIMIT: u64 = 64 * 1024;

pub const KEV_TO_EV: f64 = 1000.0;
