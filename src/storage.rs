//! Flat CSV files are the only state passed between stages.

use crate::error::Result;
use crate::types::{ChemicalRecord, IdentifierRow, UseRow, UsesRow};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A row type with a fixed header, written by one stage.
pub trait StageRow: Serialize {
    const HEADERS: &'static [&'static str];
}

impl StageRow for IdentifierRow {
    const HEADERS: &'static [&'static str] = &["name", "cas_number", "product_url", "cas_status"];
}

impl StageRow for UsesRow {
    const HEADERS: &'static [&'static str] =
        &["name", "cas_number", "product_url", "uses", "uses_status"];
}

impl StageRow for UseRow {
    const HEADERS: &'static [&'static str] = &["name", "cas_number", "product_url", "use_phrase"];
}

/// Reads a stage file into records.
///
/// The header row is skipped and columns are taken by position
/// (name, CAS number, product URL, uses text). Missing or empty cells are
/// `None`; extra columns are ignored.
pub fn read_records(path: &Path) -> Result<Vec<ChemicalRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cell = |i: usize| row.get(i).filter(|v| !v.is_empty()).map(str::to_string);
        records.push(ChemicalRecord {
            name: row.get(0).unwrap_or_default().to_string(),
            cas_number: cell(1),
            product_url: cell(2),
            uses_text: cell(3),
        });
    }
    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Writes one stage's output. The header goes out on creation, so an empty
/// batch still produces a well-formed file.
pub struct TableWriter {
    inner: csv::Writer<File>,
    path: PathBuf,
    rows: usize,
}

impl TableWriter {
    pub fn create<R: StageRow>(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut inner = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        inner.write_record(R::HEADERS)?;
        Ok(Self {
            inner,
            path: path.to_path_buf(),
            rows: 0,
        })
    }

    pub fn write<R: StageRow>(&mut self, row: &R) -> Result<()> {
        self.inner.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(PathBuf, usize)> {
        self.inner.flush()?;
        Ok((self.path, self.rows))
    }
}
