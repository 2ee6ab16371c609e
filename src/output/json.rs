//! JSON worker summary
//!
//! One file per worker. The path may contain `{rank}`, which keeps concurrent
//! workers from writing the same file.

use crate::dispatcher::DispatchReport;
use crate::Result;
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Top-level JSON document
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    #[serde(flatten)]
    pub report: &'a DispatchReport,
}

impl<'a> JsonSummary<'a> {
    pub fn new(report: &'a DispatchReport) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            report,
        }
    }
}

/// Write the worker summary to `path`
pub fn write_summary(report: &DispatchReport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create summary file: {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &JsonSummary::new(report))
        .with_context(|| format!("Failed to write summary file: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write summary file: {}", path.display()))?;

    Ok(())
}
