//! Readers for the depth-profile family of TRIM outputs
//! (`IONIZ`, `VACANCY`, `NOVAC`, `E2RECOIL`, `PHONON`, `RANGE`).
//!
//! All six share one header/table layout; a [`FileKind`] only decides how the
//! raw columns are sliced into named channels.

mod model;
mod parser;

pub use model::{
    Channel, ChannelData, ColumnSlice, ColumnSpec, DepthTable, LayerElement, OutputRecord,
    RecordSummary, TargetLayer, column_schema,
};
pub use parser::{
    is_table_boundary, normalize_ion_count, parse_data_row, parse_ion_line, parse_target_layers,
};

use crate::common::text::decode_latin1;
use crate::domain::{FileKind, SrimError, SrimResult};
use parser::{extract_table, find_ion, find_ion_count, has_kinchin_pease_marker};
use std::fs;
use std::path::Path;
use tracing::debug;

pub fn parse_output(kind: FileKind, bytes: &[u8]) -> SrimResult<OutputRecord> {
    let text = decode_latin1(bytes);

    if kind == FileKind::NoVacancy && has_kinchin_pease_marker(&text) {
        return Err(SrimError::unsupported_mode(
            "MODE.KINCHIN_PEASE",
            "NOVAC has no data for Kinchin-Pease damage calculations",
        ));
    }

    let ion = find_ion(&text)?;
    let num_ions = find_ion_count(&text)?;
    let table = extract_table(&text, column_schema(kind))?;

    Ok(OutputRecord {
        kind,
        ion,
        num_ions,
        table,
    })
}

pub fn read_output(kind: FileKind, path: &Path) -> SrimResult<OutputRecord> {
    let bytes = read_output_bytes(path)?;
    debug!(kind = %kind, path = %path.display(), bytes = bytes.len(), "parsing depth-profile output");
    parse_output(kind, &bytes)
}

pub(crate) fn read_output_bytes(path: &Path) -> SrimResult<Vec<u8>> {
    fs::read(path).map_err(|source| SrimError::from_io("IO.OUTPUT_READ", path, &source))
}

#[cfg(test)]
mod tests {
    use super::{parse_output, read_output};
    use crate::domain::{FileKind, SrimErrorCategory};
    use tempfile::TempDir;

    const IONIZ_FIXTURE: &str = "\
 ==========================================================\r
       Ion = He   Energy = 1000 keV\r
 ==========================================================\r
 Total Ions calculated =1,000.00\r
   TARGET     IONIZ.     IONIZ.\r
   DEPTH     by IONS  by RECOILS\r
   (Ang.)  (eV/Ang.)  (eV/Ang.)\r
 -----------  ---------  ----------\r
 100.00E+00  1.25E+01  3.00E-01\r
 200.00E+00  1.30E+01  3.50E-01\r
";

    #[test]
    fn ionization_output_maps_columns_to_channels() {
        let record =
            parse_output(FileKind::Ionization, IONIZ_FIXTURE.as_bytes()).expect("IONIZ parses");

        assert_eq!(record.ion.symbol, "He");
        assert_eq!(record.num_ions, 1000);
        assert_eq!(record.table.depth(), &[100.0, 200.0]);
        assert_eq!(record.table.single("ions"), Some(&[12.5, 13.0][..]));
        assert_eq!(record.table.single("recoils"), Some(&[0.3, 0.35][..]));
        assert!(record.table.columns("ions").is_none());
    }

    #[test]
    fn missing_ion_header_names_the_stage() {
        let source = IONIZ_FIXTURE.replace("Ion = He", "Projectile = He");
        let error = parse_output(FileKind::Ionization, source.as_bytes()).expect_err("no ion");
        assert_eq!(error.category(), SrimErrorCategory::MissingSection);
        assert_eq!(error.placeholder(), "PARSE.ION_HEADER");
    }

    #[test]
    fn missing_ion_count_names_the_stage() {
        let source = IONIZ_FIXTURE.replace("Total Ions calculated", "Ions");
        let error = parse_output(FileKind::Ionization, source.as_bytes()).expect_err("no count");
        assert_eq!(error.placeholder(), "PARSE.ION_COUNT");
    }

    #[test]
    fn kinchin_pease_novac_is_unsupported_mode() {
        let source = format!(
            "Recoil/Damage Calculations made with Kinchin-Pease Estimates\r\n{}",
            IONIZ_FIXTURE
        );
        let error =
            parse_output(FileKind::NoVacancy, source.as_bytes()).expect_err("KP NOVAC fails");
        assert_eq!(error.category(), SrimErrorCategory::UnsupportedMode);
        assert!(error.is_unsupported_mode());
    }

    #[test]
    fn missing_file_is_resource_not_found() {
        let temp = TempDir::new().expect("tempdir should be created");
        let error = read_output(FileKind::Range, &temp.path().join("RANGE.txt"))
            .expect_err("missing file");
        assert_eq!(error.category(), SrimErrorCategory::ResourceNotFound);
    }
}
