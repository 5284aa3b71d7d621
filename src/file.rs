//! File I/O helpers: atomic writes, scoped output cleanup, size query.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::warn;

use crate::types::SealError;

/// Atomically write data to a file using a temporary file.
///
/// The temp file is created in the target's directory, written, synced, and
/// renamed over the target, so the target path never holds partial data.
pub(crate) fn write_all_atomic(path: &Path, data: &[u8]) -> Result<(), SealError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| SealError::Io(e.error))?;
    Ok(())
}

/// Removes a freshly created output on failure paths.
///
/// The guard owns the output path from creation until [`disarm`]; dropping it
/// armed deletes the partial file. Removal failure is logged, not raised.
///
/// [`disarm`]: OutputGuard::disarm
pub(crate) struct OutputGuard {
    path: PathBuf,
    armed: bool,
}

impl OutputGuard {
    /// Truncate-or-create `path` and arm the guard.
    pub(crate) fn create(path: &Path) -> Result<(File, Self), SealError> {
        let file = File::create(path)?;
        Ok((
            file,
            Self {
                path: path.to_path_buf(),
                armed: true,
            },
        ))
    }

    /// Keep the output: the operation finished successfully.
    pub(crate) fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(?err, path = %self.path.display(), "failed to remove partial output");
        }
    }
}

/// Byte size of a file as reported by the filesystem.
pub fn file_size(path: &Path) -> Result<u64, SealError> {
    Ok(fs::metadata(path)?.len())
}
