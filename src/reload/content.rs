use std::fs;
use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::errors::{ReloadError, ReloadResult};

/// Owner read/write, group and others read. The proxy runs as a different
/// user and only ever reads the file.
const CRL_FILE_MODE: u32 = 0o644;

/// One CRL payload on its way to the file the proxy reads.
#[derive(Debug, Clone)]
pub struct CrlContent {
    pub payload: Vec<u8>,
    pub path: PathBuf,
}

impl CrlContent {
    pub fn new(payload: Vec<u8>, path: impl Into<PathBuf>) -> Self {
        Self {
            payload,
            path: path.into(),
        }
    }

    /// Replace the destination with the payload.
    ///
    /// The payload goes to a temporary file in the destination directory
    /// first and is then renamed over the destination, so a concurrent
    /// reader observes either the old CRL or the new one, never a partial
    /// write. The temporary file is cleaned up on failure.
    pub fn write(&self) -> ReloadResult<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        self.write_in(parent)
            .map_err(|source| ReloadError::WriteFailed {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), bytes = self.payload.len(), "wrote CRL file");
        Ok(())
    }

    fn write_in(&self, parent: &Path) -> std::io::Result<()> {
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&self.payload)?;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(CRL_FILE_MODE))?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Pre-create an empty destination so the proxy can open the file before
/// the first rotation ever runs. Leaves an existing file untouched.
pub fn ensure_crl_file(path: &Path) -> ReloadResult<()> {
    if path.exists() {
        return Ok(());
    }
    CrlContent::new(Vec::new(), path).write()
}
