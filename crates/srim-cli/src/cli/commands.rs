use super::CliError;
use super::helpers::{
    CollisionOverview, IndexReport, OutputSummary, ResultsOverview, TransmitOverview,
    load_layout, parse_file_kind, write_json,
};
use srim_core::domain::FileKind;
use srim_core::modules::collision::CollisionReader;
use srim_core::modules::indexer::index_file;
use srim_core::modules::results::SrimResults;
use srim_core::modules::tabular::read_output;
use srim_core::modules::transmit::read_transmitted;
use std::path::PathBuf;
use tracing::debug;

/// Same bytes as the collision log's ion-block marker.
const DEFAULT_MARKER: &str = "  Ion    Energy";

#[derive(clap::Args)]
pub(super) struct ResultsArgs {
    /// TRIM run directory holding IONIZ.txt, VACANCY.txt, ...
    directory: PathBuf,

    /// JSON file overriding output file names
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Print full depth tables instead of summaries
    #[arg(long)]
    full: bool,
}

#[derive(clap::Args)]
pub(super) struct TabularArgs {
    /// Depth-profile output file
    file: PathBuf,

    /// Output kind: ioniz, vacancy, novac, e2recoil, phonon, range
    #[arg(long, value_parser = parse_file_kind)]
    kind: FileKind,
}

#[derive(clap::Args)]
pub(super) struct TransmitArgs {
    /// TRIM run directory
    directory: PathBuf,

    /// JSON file overriding output file names
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Include every event row
    #[arg(long)]
    full: bool,
}

#[derive(clap::Args)]
pub(super) struct CollisionArgs {
    /// Collision log (COLLISON.txt)
    file: PathBuf,

    /// Zero-based ion block to decode
    #[arg(long)]
    ion: Option<usize>,
}

#[derive(clap::Args)]
pub(super) struct IndexArgs {
    /// File to scan
    file: PathBuf,

    /// Byte string to locate
    #[arg(long, default_value = DEFAULT_MARKER)]
    marker: String,

    /// Byte offset to start scanning from
    #[arg(long, default_value_t = 0)]
    start: u64,
}

pub(super) fn run_results_command(args: ResultsArgs) -> Result<i32, CliError> {
    let layout = load_layout(args.layout.as_deref())?;
    let results = SrimResults::from_directory_with_layout(&args.directory, &layout)
        .map_err(CliError::Compute)?;

    if args.full {
        write_json(&results)?;
        return Ok(0);
    }

    let summaries = results.summaries();
    let skipped = FileKind::ALL
        .into_iter()
        .filter(|kind| results.record(*kind).is_none())
        .collect();
    let overview = ResultsOverview {
        directory: args.directory,
        outputs: summaries
            .into_iter()
            .map(|(kind, summary)| OutputSummary::new(kind, layout.file_name(kind), summary))
            .collect(),
        skipped,
    };
    write_json(&overview)?;
    Ok(0)
}

pub(super) fn run_tabular_command(args: TabularArgs) -> Result<i32, CliError> {
    let record = read_output(args.kind, &args.file).map_err(CliError::Compute)?;
    write_json(&record)?;
    Ok(0)
}

pub(super) fn run_transmit_command(args: TransmitArgs) -> Result<i32, CliError> {
    let layout = load_layout(args.layout.as_deref())?;
    let run = read_transmitted(
        &args.directory,
        &layout.transmitted,
        &layout.transmitted_subdir,
    )
    .map_err(CliError::Compute)?;

    write_json(&TransmitOverview::new(&run, args.full))?;
    Ok(0)
}

pub(super) fn run_collision_command(args: CollisionArgs) -> Result<i32, CliError> {
    let reader = CollisionReader::open(&args.file).map_err(CliError::Compute)?;

    match args.ion {
        Some(index) => {
            debug!(index, "decoding ion block");
            let report = reader.get(index).map_err(CliError::Compute)?;
            write_json(&report)?;
        }
        None => write_json(&CollisionOverview {
            path: reader.path(),
            ions: reader.len(),
            header_lines: reader.header().len(),
            offsets: reader.offsets(),
        })?,
    }
    Ok(0)
}

pub(super) fn run_index_command(args: IndexArgs) -> Result<i32, CliError> {
    let offsets = index_file(&args.file, args.marker.as_bytes(), args.start)
        .map_err(CliError::Compute)?;

    write_json(&IndexReport {
        path: &args.file,
        marker: &args.marker,
        start: args.start,
        offsets,
    })?;
    Ok(0)
}
