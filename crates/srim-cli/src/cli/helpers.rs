use super::CliError;
use anyhow::Context;
use serde::Serialize;
use srim_core::common::layout::{ResultsLayout, load_results_layout};
use srim_core::domain::{FileKind, Ion};
use srim_core::modules::serialization::render_json;
use srim_core::modules::tabular::RecordSummary;
use srim_core::modules::transmit::{ParticleType, RunMetadata, TransmittedEvent, TransmittedRun};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

pub(super) fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = render_json(value).map_err(CliError::Compute)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write JSON to stdout")?;
    Ok(())
}

pub(super) fn load_layout(layout_path: Option<&Path>) -> Result<ResultsLayout, CliError> {
    match layout_path {
        Some(path) => load_results_layout(path).map_err(CliError::Compute),
        None => Ok(ResultsLayout::default()),
    }
}

pub(super) fn parse_file_kind(name: &str) -> Result<FileKind, String> {
    FileKind::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = FileKind::ALL.iter().map(|kind| kind.as_str()).collect();
        format!("unknown output kind '{}', expected one of: {}", name, known.join(", "))
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OutputSummary {
    pub(super) kind: FileKind,
    pub(super) file: String,
    pub(super) ion: Ion,
    pub(super) num_ions: u64,
    pub(super) rows: usize,
    pub(super) channels: Vec<&'static str>,
}

impl OutputSummary {
    pub(super) fn new(kind: FileKind, file: &str, summary: RecordSummary) -> Self {
        Self {
            kind,
            file: file.to_string(),
            ion: summary.ion,
            num_ions: summary.num_ions,
            rows: summary.rows,
            channels: summary.channels,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ResultsOverview {
    pub(super) directory: PathBuf,
    pub(super) outputs: Vec<OutputSummary>,
    pub(super) skipped: Vec<FileKind>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TransmitOverview<'a> {
    pub(super) metadata: &'a RunMetadata,
    pub(super) counts: BTreeMap<&'static str, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) events: Option<&'a [TransmittedEvent]>,
}

impl<'a> TransmitOverview<'a> {
    pub(super) fn new(run: &'a TransmittedRun, full: bool) -> Self {
        Self {
            metadata: &run.metadata,
            counts: ParticleType::ALL
                .into_iter()
                .map(|kind| (kind.as_str(), run.count(kind)))
                .collect(),
            events: full.then_some(run.events.as_slice()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CollisionOverview<'a> {
    pub(super) path: &'a Path,
    pub(super) ions: usize,
    pub(super) header_lines: usize,
    pub(super) offsets: &'a [u64],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IndexReport<'a> {
    pub(super) path: &'a Path,
    pub(super) marker: &'a str,
    pub(super) start: u64,
    pub(super) offsets: Vec<u64>,
}
