//! Random-access reader over the TRIM collision log (`COLLISON.txt`).
//!
//! Opening a log indexes every ion-block marker once; [`CollisionReader::get`]
//! then seeks straight to a block and parses it in isolation.

mod model;
mod parser;

pub use model::{
    CascadeRecoil, CollisionDetail, CollisionRecord, DamageTally, IonCollisionReport, IonSummary,
};
pub use parser::{CollisionParseError, parse_ion_record};

use crate::common::constants::{HEADER_SCAN_LIMIT, ION_BLOCK_MARKER};
use crate::common::text::decode_latin1;
use crate::domain::{SrimError, SrimResult};
use crate::modules::indexer::index_file;
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CollisionReader {
    path: PathBuf,
    offsets: Vec<u64>,
    file_size: u64,
    header: Vec<String>,
}

impl CollisionReader {
    pub fn open(path: impl AsRef<Path>) -> SrimResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file_size = fs::metadata(&path)
            .map_err(|source| SrimError::from_io("IO.COLLISION_OPEN", &path, &source))?
            .len();
        let offsets = index_file(&path, ION_BLOCK_MARKER, 0)?;

        let header_end = offsets
            .first()
            .copied()
            .unwrap_or(file_size)
            .min(HEADER_SCAN_LIMIT);
        let header = read_header(&path, header_end)?;

        debug!(
            path = %path.display(),
            ion_blocks = offsets.len(),
            header_lines = header.len(),
            "opened collision log"
        );
        Ok(Self {
            path,
            offsets,
            file_size,
            header,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of ion blocks followed by another marker. The final block is
    /// still reachable through [`Self::get`] at index `len()`.
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Preamble lines up to the first single-space line.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn get(&self, index: usize) -> SrimResult<IonCollisionReport> {
        let start = *self.offsets.get(index).ok_or_else(|| {
            SrimError::input_validation(
                "INPUT.ION_INDEX",
                format!(
                    "ion index {} is out of range for '{}' ({} ion blocks)",
                    index,
                    self.path.display(),
                    self.offsets.len()
                ),
            )
        })?;
        let end = self
            .offsets
            .get(index + 1)
            .copied()
            .unwrap_or(self.file_size);

        let bytes = read_span(&self.path, start, end)?;
        let text = decode_latin1(&bytes);
        parse_ion_record(&text).map_err(|error| {
            SrimError::malformed_record(
                "PARSE.COLLISION_RECORD",
                format!(
                    "ion block {} at byte {} of '{}': {}",
                    index,
                    start,
                    self.path.display(),
                    error
                ),
            )
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = SrimResult<IonCollisionReport>> + '_ {
        (0..self.len()).map(move |index| self.get(index))
    }
}

fn read_span(path: &Path, start: u64, end: u64) -> SrimResult<Vec<u8>> {
    let mut file =
        File::open(path).map_err(|source| SrimError::from_io("IO.COLLISION_OPEN", path, &source))?;
    file.seek(SeekFrom::Start(start))
        .map_err(|source| SrimError::from_io("IO.COLLISION_SEEK", path, &source))?;

    let mut bytes = Vec::new();
    file.take(end.saturating_sub(start))
        .read_to_end(&mut bytes)
        .map_err(|source| SrimError::from_io("IO.COLLISION_READ", path, &source))?;
    Ok(bytes)
}

fn read_header(path: &Path, end: u64) -> SrimResult<Vec<String>> {
    let bytes = read_span(path, 0, end)?;
    let text = decode_latin1(&bytes);
    Ok(text
        .lines()
        .take_while(|line| *line != " ")
        .map(str::to_string)
        .collect())
}
