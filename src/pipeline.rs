//! The three batch stages. Each reads the previous stage's file, handles one
//! chemical at a time, and writes a complete new file.

use crate::apis::{pubchem, urls};
use crate::app::ports::UsesRenderer;
use crate::app::resolve_use_case::IdentifierResolver;
use crate::constants::STATUS_OK;
use crate::error::Result;
use crate::segmenter::{clean_uses, split_uses};
use crate::storage::{read_records, TableWriter};
use crate::types::{IdentifierRow, Resolution, UseRow, UsesRow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, info_span, warn, Instrument};

/// Summary of one stage run.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub total: usize,
    pub succeeded: usize,
    /// Count per failure code.
    pub failures: BTreeMap<String, usize>,
    pub rows_written: usize,
    pub output_file: String,
    pub finished_at: DateTime<Utc>,
}

impl StageReport {
    fn new(stage: &str) -> Self {
        Self {
            stage: stage.to_string(),
            total: 0,
            succeeded: 0,
            failures: BTreeMap::new(),
            rows_written: 0,
            output_file: String::new(),
            finished_at: Utc::now(),
        }
    }

    fn record_failure(&mut self, code: &str) {
        *self.failures.entry(code.to_string()).or_insert(0) += 1;
    }

    pub fn failed(&self) -> usize {
        self.failures.values().sum()
    }

    fn finish(mut self, writer: TableWriter) -> Result<Self> {
        let (path, rows) = writer.finish()?;
        self.rows_written = rows;
        self.output_file = path.to_string_lossy().to_string();
        self.finished_at = Utc::now();
        info!(
            "✅ {} done: {} of {} succeeded, {} rows written to {}",
            self.stage, self.succeeded, self.total, self.rows_written, self.output_file
        );
        Ok(self)
    }
}

pub struct Pipeline;

impl Pipeline {
    /// Stage 1: chemical names -> CAS number and PubChem URL.
    pub async fn resolve_identifiers(
        resolver: &IdentifierResolver,
        input: &Path,
        output: &Path,
    ) -> Result<StageReport> {
        let span = info_span!("resolve_identifiers", input = %input.display());
        async move {
            let records = read_records(input)?;
            let mut writer = TableWriter::create::<IdentifierRow>(output)?;
            let mut report = StageReport::new("resolve_identifiers");

            for record in records {
                report.total += 1;
                info!("Scraping for: {}", record.name);
                let resolution = resolver.resolve(&record.name).await;
                let status = resolution.status();

                let row = match &resolution {
                    Resolution::Found(resolved) => {
                        info!("    Successful scrape for: CAS {}", resolved.cas);
                        report.succeeded += 1;
                        IdentifierRow {
                            product_url: Some(urls::pubchem_url(resolved.cas.as_str())),
                            cas_number: Some(resolved.cas.to_string()),
                            name: record.name,
                            cas_status: status,
                        }
                    }
                    Resolution::Missing(failures) => {
                        warn!("    Unsuccessful scrape for: {} ({})", record.name, status);
                        match failures.last() {
                            Some((_, failure)) => report.record_failure(failure.code()),
                            None => report.record_failure("not_found"),
                        }
                        IdentifierRow {
                            name: record.name,
                            cas_number: None,
                            product_url: None,
                            cas_status: status,
                        }
                    }
                };
                writer.write(&row)?;
            }

            report.finish(writer)
        }
        .instrument(span)
        .await
    }

    /// Stage 2: PubChem URL -> cleaned usage text.
    pub async fn write_uses(
        renderer: &dyn UsesRenderer,
        input: &Path,
        output: &Path,
    ) -> Result<StageReport> {
        let span = info_span!("write_uses", input = %input.display());
        async move {
            let records = read_records(input)?;
            let mut writer = TableWriter::create::<UsesRow>(output)?;
            let mut report = StageReport::new("write_uses");

            for record in records {
                report.total += 1;
                info!("Finding uses for: {}", record.name);
                let url = record.product_url.clone().unwrap_or_default();

                let (uses, uses_status) = match pubchem::fetch_uses(renderer, &url).await {
                    Ok(raw) => {
                        report.succeeded += 1;
                        (clean_uses(&raw), STATUS_OK.to_string())
                    }
                    Err(failure) => {
                        if url.is_empty() {
                            info!("    No URL provided.");
                        }
                        report.record_failure(failure.code());
                        (String::new(), failure.code().to_string())
                    }
                };

                writer.write(&UsesRow {
                    name: record.name,
                    cas_number: record.cas_number,
                    product_url: record.product_url,
                    uses,
                    uses_status,
                })?;
            }

            report.finish(writer)
        }
        .instrument(span)
        .await
    }

    /// Stage 3: one row per use phrase.
    pub fn make_rows_for_uses(input: &Path, output: &Path) -> Result<StageReport> {
        let _span = info_span!("make_rows_for_uses", input = %input.display()).entered();
        let records = read_records(input)?;
        let mut writer = TableWriter::create::<UseRow>(output)?;
        let mut report = StageReport::new("make_rows_for_uses");

        for record in records {
            report.total += 1;
            info!("Making rows for: {}", record.name);
            let phrases = record
                .uses_text
                .as_deref()
                .map(split_uses)
                .unwrap_or_default();

            if phrases.is_empty() {
                report.record_failure("no_uses");
                writer.write(&UseRow {
                    name: record.name,
                    cas_number: record.cas_number,
                    product_url: record.product_url,
                    use_phrase: String::new(),
                })?;
                continue;
            }

            report.succeeded += 1;
            for use_phrase in phrases {
                writer.write(&UseRow {
                    name: record.name.clone(),
                    cas_number: record.cas_number.clone(),
                    product_url: record.product_url.clone(),
                    use_phrase,
                })?;
            }
        }

        report.finish(writer)
    }
}
