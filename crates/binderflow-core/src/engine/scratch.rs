use super::error::PipelineError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A scratch copy of a stage's input directory.
///
/// The directory is removed again when the guard is dropped, whether the
/// stage succeeded or not. Removal failures are logged and never propagated.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Replaces whatever is at `scratch` with a recursive copy of `source`.
    pub fn stage(source: &Path, scratch: &Path) -> Result<Self, PipelineError> {
        if scratch.exists() {
            debug!("Removing stale scratch directory {:?}", scratch);
            fs::remove_dir_all(scratch).map_err(|source| PipelineError::Staging {
                path: scratch.to_path_buf(),
                source,
            })?;
        }

        // From here on the guard owns the directory, so a partial copy is
        // cleaned up as well.
        let guard = Self {
            path: scratch.to_path_buf(),
        };
        copy_dir_recursive(source, scratch).map_err(|e| PipelineError::Staging {
            path: source.to_path_buf(),
            source: e,
        })?;
        debug!("Staged {:?} into {:?}", source, scratch);
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("Removed scratch directory {:?}", self.path),
            Err(e) => warn!("Error removing scratch directory {:?}: {}", self.path, e),
        }
    }
}

fn copy_dir_recursive(source: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Removes a file, treating "already gone" as success. Other failures are
/// logged only.
pub fn remove_file_logged(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed {:?}", path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Error removing {:?}: {}", path, e),
    }
}
