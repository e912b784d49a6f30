use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use hexsession::{EditError, ProvisionedStore, StoreProvisioner};
use tracing::debug;
use uuid::Uuid;

use crate::error::ScratchStoreError;
use crate::paths::{default_scratch_root, working_copy_name};

#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Self {
        Self::new(default_scratch_root())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `path` lives directly under this scratch root.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        path.parent() == Some(self.root.as_path())
    }

    /// Writes `data` to a fresh working copy. The file appears under its final
    /// name only once its contents are complete and synced.
    pub fn create_working_copy(
        &self,
        name: &str,
        data: &[u8],
    ) -> Result<ProvisionedStore, ScratchStoreError> {
        fs::create_dir_all(&self.root)
            .map_err(|source| ScratchStoreError::io("creating scratch directory", &self.root, source))?;

        let path = self
            .root
            .join(working_copy_name(&Uuid::new_v4().to_string(), name));

        let mut staged = tempfile::NamedTempFile::new_in(&self.root)
            .map_err(|source| ScratchStoreError::io("creating staging file", &self.root, source))?;
        staged
            .write_all(data)
            .map_err(|source| ScratchStoreError::io("writing staging file", staged.path(), source))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|source| ScratchStoreError::io("syncing staging file", staged.path(), source))?;
        staged
            .persist_noclobber(&path)
            .map_err(|error| ScratchStoreError::Persist {
                path: path.clone(),
                source: error.error,
            })?;

        debug!(path = %path.display(), size = data.len(), "created working copy");
        Ok(ProvisionedStore {
            path,
            size: data.len() as u64,
        })
    }

    /// Deletes a working copy. Returns `false` for paths outside the scratch
    /// root or files that are already gone.
    pub fn remove_working_copy(&self, path: &Path) -> Result<bool, ScratchStoreError> {
        if !self.contains(path) {
            return Ok(false);
        }
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed working copy");
                Ok(true)
            }
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ScratchStoreError::io("removing working copy", path, source)),
        }
    }
}

impl StoreProvisioner for ScratchDir {
    fn materialize(&self, name: &str, data: &[u8]) -> Result<ProvisionedStore, EditError> {
        Ok(self.create_working_copy(name, data)?)
    }

    fn release(&self, path: &Path) -> Result<(), EditError> {
        self.remove_working_copy(path)?;
        Ok(())
    }
}
