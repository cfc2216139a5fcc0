// Output artifacts: profile-formatted JSON, raw upstream JSON, CSV table.

use std::io::Write;
use std::path::{Path, PathBuf};

use patfolio_profile::PatentPayload;
use patfolio_recon::GrantDate;
use serde::Serialize;

use crate::CliError;

/// Abstracts longer than this are cut in the CSV.
const CSV_ABSTRACT_LIMIT: usize = 500;

pub const CSV_HEADER: [&str; 7] = [
    "Title",
    "Patent Number",
    "Issue Date",
    "Inventors",
    "Assignee",
    "Abstract",
    "Google Patents URL",
];

/// Example row at the top of a blank entry template.
const TEMPLATE_SAMPLE: [&str; 7] = [
    "Method and Apparatus for Dynamic CPU Frequency Scaling",
    "10123456",
    "2023-05-15",
    "Ashok Raj, John Smith, Jane Doe",
    "Intel Corporation",
    "A system and method for dynamically adjusting processor frequency based on workload demand...",
    "https://patents.google.com/patent/US10123456",
];

/// The three files a search writes, derived from `--output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub profile: PathBuf,
    pub raw: PathBuf,
    pub csv: PathBuf,
}

impl OutputPaths {
    /// `out/patents.json` → `out/patents.json`, `out/patents_raw.json`,
    /// `out/patents.csv`. A missing or non-json extension is replaced.
    pub fn derive(output: &Path) -> Self {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "patents".to_string());
        let dir = output.parent().unwrap_or_else(|| Path::new(""));

        Self {
            profile: dir.join(format!("{stem}.json")),
            raw: dir.join(format!("{stem}_raw.json")),
            csv: dir.join(format!("{stem}.csv")),
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("cannot serialize {}: {}", path.display(), e)))?;
    std::fs::write(path, json + "\n").map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e)))
}

/// Load a profile-formatted JSON file written by `patfolio search`.
pub fn read_payloads(path: &Path) -> Result<Vec<PatentPayload>, CliError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| CliError::args(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&contents).map_err(|e| {
        CliError::args(format!("{} is not a patent list: {}", path.display(), e))
            .with_hint("expected the profile-formatted JSON written by `patfolio search`")
    })
}

pub fn write_csv(path: &Path, payloads: &[PatentPayload]) -> Result<(), CliError> {
    let file = std::fs::File::create(path)
        .map_err(|e| CliError::io(format!("cannot create {}: {}", path.display(), e)))?;
    write_csv_to(std::io::BufWriter::new(file), payloads)
}

/// Header is written even with zero rows.
pub fn write_csv_to<W: Write>(writer: W, payloads: &[PatentPayload]) -> Result<(), CliError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer
        .write_record(CSV_HEADER)
        .map_err(|e| CliError::io(format!("CSV write error: {}", e)))?;

    for p in payloads {
        let inventors: Vec<&str> = p.inventors.iter().map(|n| n.name.as_str()).collect();
        let assignees: Vec<&str> = p.assignees.iter().map(|n| n.name.as_str()).collect();
        let date = issue_date(p.date);
        let inventors = inventors.join(", ");
        let assignees = assignees.join(", ");
        let summary = truncate_abstract(&p.summary);
        csv_writer
            .write_record([
                p.title.as_str(),
                p.number.as_str(),
                date.as_str(),
                inventors.as_str(),
                assignees.as_str(),
                summary.as_str(),
                p.url.as_str(),
            ])
            .map_err(|e| CliError::io(format!("CSV write error: {}", e)))?;
    }

    csv_writer
        .flush()
        .map_err(|e| CliError::io(format!("CSV flush error: {}", e)))
}

/// Blank entry template: the export header, one example row, `rows` empty rows.
pub fn write_template(path: &Path, rows: usize) -> Result<(), CliError> {
    let file = std::fs::File::create(path)
        .map_err(|e| CliError::io(format!("cannot create {}: {}", path.display(), e)))?;
    write_template_to(std::io::BufWriter::new(file), rows)
}

pub fn write_template_to<W: Write>(writer: W, rows: usize) -> Result<(), CliError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    let blank = [""; CSV_HEADER.len()];
    let records = [CSV_HEADER, TEMPLATE_SAMPLE].into_iter().chain(std::iter::repeat(blank).take(rows));
    for record in records {
        csv_writer
            .write_record(record)
            .map_err(|e| CliError::io(format!("CSV write error: {}", e)))?;
    }

    csv_writer
        .flush()
        .map_err(|e| CliError::io(format!("CSV flush error: {}", e)))
}

pub fn issue_date(date: Option<GrantDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

fn truncate_abstract(text: &str) -> String {
    if text.chars().count() > CSV_ABSTRACT_LIMIT {
        let cut: String = text.chars().take(CSV_ABSTRACT_LIMIT).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}
