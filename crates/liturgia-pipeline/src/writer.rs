use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use liturgia_core::Result;
use tracing::info;

use crate::sheet::MassSheet;

/// `messa_YYYYMMDD.json`
pub fn artifact_name(date: NaiveDate) -> String {
    format!("messa_{}.json", date.format("%Y%m%d"))
}

/// Write the sheet as pretty JSON into `dir`, creating it if needed.
///
/// Returns the path written. An existing file for the same date is replaced.
pub fn write_sheet(sheet: &MassSheet, date: NaiveDate, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(artifact_name(date));
    let json = serde_json::to_string_pretty(sheet)?;
    std::fs::write(&path, json)?;
    info!("Saved mass sheet to {}", path.display());
    Ok(path)
}
