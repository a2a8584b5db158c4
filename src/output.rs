//! Writes build artifacts, replacing the previous version atomically.

use crate::error::{Error, Result};
use crate::filters::ListingSet;
use crate::render::RenderedPage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes `contents` to `path` through a sibling temp file and a rename.
///
/// Missing parent directories are created. On failure the previous file is left
/// as it was.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let tmp = temp_path(path);
    debug!("Writing {} bytes to {}", contents.len(), tmp.display());

    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(path, e));
    }

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        Error::io(path, e)
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

/// Writer for the rendered page.
pub struct PageWriter {
    path: PathBuf,
}

impl PageWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the page on disk.
    pub fn write(&self, page: &RenderedPage) -> Result<()> {
        write_atomic(&self.path, page.as_str().as_bytes())
    }
}

/// Writes the listing set as pretty-printed JSON.
pub fn write_json_snapshot(path: &Path, listings: &ListingSet) -> Result<()> {
    let json = serde_json::to_string_pretty(listings).map_err(|e| {
        Error::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    write_atomic(path, json.as_bytes())
}
