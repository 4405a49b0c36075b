use std::fs;
use std::path::{Path, PathBuf};

use dryrun_constant::defaults::EXPORT_FILE_NAME;

use crate::error::Result;

/// Default report location inside `dir`.
pub fn default_export_path(dir: &Path) -> PathBuf {
    dir.join(EXPORT_FILE_NAME)
}

/// Writes the raw model response as a plain-text report, creating parent
/// directories as needed. Returns the number of bytes written.
pub fn write_report(path: &Path, raw_text: &str) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, raw_text)?;
    Ok(raw_text.len())
}
