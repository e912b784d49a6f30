use std::path::PathBuf;

use hexsession::EditError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScratchStoreError {
    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to persist working copy to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScratchStoreError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

impl From<ScratchStoreError> for EditError {
    fn from(error: ScratchStoreError) -> Self {
        match error {
            ScratchStoreError::Io {
                operation,
                path,
                source,
            } => EditError::io(operation, path, 0, 0, source),
            ScratchStoreError::Persist { path, source } => {
                EditError::io("persisting working copy", path, 0, 0, source)
            }
        }
    }
}
