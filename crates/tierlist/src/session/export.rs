//! Exporting the tier map as a standalone JSON document.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, TierlistError};
use crate::tier::TierMap;

/// File name used for exports when none is given.
pub const DEFAULT_EXPORT_FILE: &str = "ratingMap.json";

/// Pretty-printed `{"1": [...], ..., "5": [...]}` document.
pub fn export_snapshot(tiers: &TierMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(tiers)?)
}

/// Write the export document to `path`, creating parent directories.
pub fn write_export(tiers: &TierMap, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                TierlistError::Persistence(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(path).map_err(|e| {
        TierlistError::Persistence(format!("Failed to create file '{}': {}", path.display(), e))
    })?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, tiers).map_err(|e| {
        TierlistError::Persistence(format!("Failed to serialize tier map: {}", e))
    })?;
    writer.flush().map_err(|e| TierlistError::io(path, e))?;

    Ok(())
}
