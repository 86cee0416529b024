use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use walkshed_core::WalkTimeRecord;

use crate::pipeline::RunSummary;

fn create_parent(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Writes records as `origin_id,target_id,trip_time`
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn write_records(path: &Path, records: &[WalkTimeRecord]) -> Result<()> {
    create_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create '{}'", path.display()))?;

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(
        "Saved {} walk time records to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

/// Writes the run summary as pretty-printed JSON
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    create_parent(path)?;
    let file =
        File::create(path).with_context(|| format!("Failed to create '{}'", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)?;
    Ok(())
}
