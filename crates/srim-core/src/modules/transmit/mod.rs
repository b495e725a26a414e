//! Reader for `TRANSMIT.txt`, the per-event table of particles leaving the
//! target.

mod model;
mod parser;

pub use model::{Measure, ParticleType, RunMetadata, TransmittedEvent, TransmittedRun};
pub use parser::{is_column_header, parse_event_line, parse_metadata_line};

use crate::common::text::decode_latin1;
use crate::domain::{SrimError, SrimResult};
use parser::{extract_events, find_metadata};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

pub fn parse_transmitted(bytes: &[u8]) -> SrimResult<TransmittedRun> {
    let text = decode_latin1(bytes);
    let metadata = find_metadata(&text)?;
    let events = extract_events(&text)?;
    Ok(TransmittedRun { metadata, events })
}

/// Reads `directory/file_name`, retrying once under `fallback_subdir` when
/// the file is absent.
pub fn read_transmitted(
    directory: &Path,
    file_name: &str,
    fallback_subdir: &str,
) -> SrimResult<TransmittedRun> {
    let primary = directory.join(file_name);
    let (path, bytes) = match fs::read(&primary) {
        Ok(bytes) => (primary, bytes),
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            let fallback = directory.join(fallback_subdir).join(file_name);
            warn!(
                missing = %primary.display(),
                retry = %fallback.display(),
                "transmitted-events file not found, retrying under fallback subfolder"
            );
            let bytes = fs::read(&fallback)
                .map_err(|source| SrimError::from_io("IO.TRANSMIT_READ", &fallback, &source))?;
            (fallback, bytes)
        }
        Err(source) => return Err(SrimError::from_io("IO.TRANSMIT_READ", &primary, &source)),
    };

    let run = parse_transmitted(&bytes)?;
    debug!(path = %path.display(), events = run.events.len(), "parsed transmitted events");
    Ok(run)
}
