//! Atomic Writer.
//!
//! ## `atomic_write` protocol
//!
//! 1. Serialize the manifest (sorted keys, four-space indent).
//! 2. Create missing parent directories of the final path.
//! 3. Write to the sibling `<path>_tmp`, flush, and fsync it.
//! 4. On Windows only, remove an existing file at the final path.
//! 5. Rename `<path>_tmp` to `<path>`.
//!
//! A crash before step 5 leaves the final path untouched; the next run
//! truncates and rewrites the stale `_tmp` file.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use manifest_agent_core::Manifest;

use crate::error::{io_err, CycleError};

/// Suffix of the sibling file written before the rename.
pub const TMP_SUFFIX: &str = "_tmp";

/// Sibling temp path for `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

/// Durably install `manifest` at `path`.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), CycleError> {
    let content = manifest.to_json()?;
    atomic_write(path, &content)
}

/// Atomically replace `path` with `content`.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), CycleError> {
    atomic_write_with_tmp(path, content, &tmp_path(path))
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), CycleError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    write_synced(tmp, content)?;

    #[cfg(windows)]
    if path.is_file() {
        // Windows cannot rename over an existing file.
        std::fs::remove_file(path).map_err(|e| io_err(path, e))?;
    }

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(())
}

fn write_synced(tmp: &Path, content: &str) -> Result<(), CycleError> {
    let mut file = File::create(tmp).map_err(|e| io_err(tmp, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| io_err(tmp, e))?;
    file.flush().map_err(|e| io_err(tmp, e))?;
    file.sync_all().map_err(|e| io_err(tmp, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
