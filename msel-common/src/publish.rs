//! Atomic report publishing
//!
//! The published report is always the latest one only. It is written to a
//! sibling temp file and renamed over the target, so readers never observe a
//! half-written report.

use crate::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Overwrite `target` with `contents` (temp file + rename)
pub fn write_atomic(target: &Path, contents: &str) -> Result<()> {
    let temp = temp_path(target)?;

    if let Err(e) = std::fs::write(&temp, contents) {
        let _ = std::fs::remove_file(&temp);
        return Err(e.into());
    }

    if let Err(e) = std::fs::rename(&temp, target) {
        let _ = std::fs::remove_file(&temp);
        return Err(e.into());
    }

    Ok(())
}

/// `<target>.tmp` next to the target
fn temp_path(target: &Path) -> Result<PathBuf> {
    let file_name = target
        .file_name()
        .ok_or_else(|| Error::InvalidInput(format!("Not a file path: {}", target.display())))?;

    let mut temp_name = OsString::from(file_name);
    temp_name.push(".tmp");
    Ok(target.with_file_name(temp_name))
}
