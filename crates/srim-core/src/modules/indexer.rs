//! Streaming search for every offset of a marker in a file too large to load.

use crate::common::constants::INDEX_CHUNK_SIZE;
use crate::domain::{SrimError, SrimResult};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("marker must not be empty")]
    EmptyMarker,
    #[error("read failed after {scanned} bytes: {source}")]
    Read { scanned: u64, source: io::Error },
}

/// Offsets (absolute, ascending) of every occurrence of `marker` in `reader`.
///
/// The reader is consumed in [`INDEX_CHUNK_SIZE`] chunks. The last
/// `marker.len() - 1` bytes already scanned are kept as the prefix of the next
/// chunk, so matches straddling a chunk boundary are found exactly once.
/// `base_offset` is the absolute position of the reader's first byte.
pub fn find_marker_offsets<R: Read>(
    reader: R,
    marker: &[u8],
    base_offset: u64,
) -> Result<Vec<u64>, IndexError> {
    find_marker_offsets_with_chunk(reader, marker, base_offset, INDEX_CHUNK_SIZE)
}

fn find_marker_offsets_with_chunk<R: Read>(
    mut reader: R,
    marker: &[u8],
    base_offset: u64,
    chunk_size: usize,
) -> Result<Vec<u64>, IndexError> {
    if marker.is_empty() {
        return Err(IndexError::EmptyMarker);
    }

    let overlap = marker.len() - 1;
    let mut window: Vec<u8> = Vec::with_capacity(overlap + chunk_size);
    let mut chunk = vec![0_u8; chunk_size];
    // Absolute offset of window[0].
    let mut window_start = base_offset;
    let mut scanned = 0_u64;
    let mut positions = Vec::new();

    loop {
        let filled = read_chunk(&mut reader, &mut chunk)
            .map_err(|source| IndexError::Read { scanned, source })?;
        if filled == 0 {
            return Ok(positions);
        }
        scanned += filled as u64;
        window.extend_from_slice(&chunk[..filled]);

        positions.extend(
            window
                .windows(marker.len())
                .enumerate()
                .filter(|(_, candidate)| *candidate == marker)
                .map(|(position, _)| window_start + position as u64),
        );

        let keep = overlap.min(window.len());
        let drained = window.len() - keep;
        window.drain(..drained);
        window_start += drained as u64;
    }
}

/// Fills `chunk` unless the reader reaches end of input first.
fn read_chunk<R: Read>(reader: &mut R, chunk: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < chunk.len() {
        match reader.read(&mut chunk[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}

/// Indexes `marker` in the file at `path`, skipping the first `start` bytes.
pub fn index_file(path: &Path, marker: &[u8], start: u64) -> SrimResult<Vec<u64>> {
    if marker.is_empty() {
        return Err(SrimError::input_validation(
            "INPUT.INDEX_MARKER",
            "index marker must not be empty",
        ));
    }

    let mut file =
        File::open(path).map_err(|source| SrimError::from_io("IO.INDEX_OPEN", path, &source))?;
    if start > 0 {
        file.seek(SeekFrom::Start(start))
            .map_err(|source| SrimError::from_io("IO.INDEX_SEEK", path, &source))?;
    }

    let offsets = find_marker_offsets(&mut file, marker, start).map_err(|error| {
        SrimError::io_system(
            "IO.INDEX_READ",
            format!("failed to index '{}': {}", path.display(), error),
        )
    })?;
    debug!(path = %path.display(), offsets = offsets.len(), start, "built marker index");
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::{IndexError, find_marker_offsets, find_marker_offsets_with_chunk, index_file};
    use crate::domain::SrimErrorCategory;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn plant(size: usize, marker: &[u8], offsets: &[usize]) -> Vec<u8> {
        let mut bytes = vec![b'.'; size];
        for offset in offsets {
            bytes[*offset..*offset + marker.len()].copy_from_slice(marker);
        }
        bytes
    }

    #[test]
    fn matches_across_chunk_boundaries_are_found_once() {
        let marker = b"ABCDEFGH";
        let offsets = [0, 4090, 8188, 8200];
        let bytes = plant(9000, marker, &offsets);

        let found = find_marker_offsets(Cursor::new(bytes), marker, 0).expect("index builds");
        assert_eq!(found, vec![0, 4090, 8188, 8200]);
    }

    #[test]
    fn matches_at_and_just_before_a_boundary_are_found() {
        let marker = b"ABCDEFGH";
        let offsets = [4088, 4096, 4104];
        let bytes = plant(4200, marker, &offsets);

        let found = find_marker_offsets(Cursor::new(bytes), marker, 0).expect("index builds");
        assert_eq!(found, vec![4088, 4096, 4104]);
    }

    #[test]
    fn every_split_position_of_a_small_chunk_is_covered() {
        let marker = b"xyz";
        let bytes = plant(64, marker, &[0, 5, 11, 30, 61]);
        for chunk_size in 1..=9 {
            let found =
                find_marker_offsets_with_chunk(Cursor::new(bytes.clone()), marker, 0, chunk_size)
                    .expect("index builds");
            assert_eq!(found, vec![0, 5, 11, 30, 61], "chunk size {}", chunk_size);
        }
    }

    #[test]
    fn empty_input_and_missing_marker_yield_no_offsets() {
        let empty = find_marker_offsets(Cursor::new(Vec::new()), b"Ion", 0).expect("empty input");
        assert!(empty.is_empty());

        let absent =
            find_marker_offsets(Cursor::new(vec![b'.'; 10_000]), b"Ion", 0).expect("no match");
        assert!(absent.is_empty());
    }

    #[test]
    fn empty_marker_is_rejected() {
        let error = find_marker_offsets(Cursor::new(b"abc".to_vec()), b"", 0)
            .expect_err("empty marker");
        assert!(matches!(error, IndexError::EmptyMarker));
    }

    #[test]
    fn start_offset_skips_leading_content_and_keeps_absolute_offsets() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("COLLISON.txt");
        let marker = b"MARK";
        fs::write(&path, plant(6000, marker, &[10, 100, 5000])).expect("fixture written");

        let all = index_file(&path, marker, 0).expect("index builds");
        assert_eq!(all, vec![10, 100, 5000]);

        let skipped = index_file(&path, marker, 50).expect("index builds");
        assert_eq!(skipped, vec![100, 5000]);
    }

    #[test]
    fn missing_file_is_resource_not_found() {
        let temp = TempDir::new().expect("tempdir should be created");
        let error = index_file(&temp.path().join("absent.txt"), b"x", 0).expect_err("missing");
        assert_eq!(error.category(), SrimErrorCategory::ResourceNotFound);
    }
}
