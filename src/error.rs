use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("I/O error while {operation} {path} at offset {offset} (len {len}): {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        offset: u64,
        len: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid offset: {offset}")]
    InvalidOffset { offset: i64 },

    #[error("write of {len} bytes at offset {offset} exceeds store size {size}")]
    OutOfRange { offset: u64, len: usize, size: u64 },

    #[error("incomplete write at offset {offset}: wrote {written} of {expected} bytes")]
    IncompleteWrite {
        offset: u64,
        written: usize,
        expected: usize,
    },

    #[error("restore after failed write also failed: original error: {original}; restore error: {restore}")]
    RestoreFailure {
        original: Box<EditError>,
        restore: Box<EditError>,
    },

    #[error("bytes at offset {offset} no longer match the expected data")]
    StaleData { offset: u64 },

    #[error("invalid selection [{start}, {end}) for store of size {size}")]
    InvalidSelection { start: i64, end: i64, size: u64 },

    #[error("invalid page number {page}")]
    InvalidPage { page: usize },
}

/// Stable classification of [`EditError`] for result shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Io,
    InvalidOffset,
    OutOfRange,
    IncompleteWrite,
    RestoreFailure,
    StaleData,
    InvalidSelection,
    InvalidPage,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Io => "io_error",
            Self::InvalidOffset => "invalid_offset",
            Self::OutOfRange => "out_of_range",
            Self::IncompleteWrite => "incomplete_write",
            Self::RestoreFailure => "restore_failure",
            Self::StaleData => "stale_data",
            Self::InvalidSelection => "invalid_selection",
            Self::InvalidPage => "invalid_page",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EditError {
    #[must_use]
    pub fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        offset: u64,
        len: usize,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            offset,
            len,
            source,
        }
    }

    #[must_use]
    pub fn restore_failure(original: EditError, restore: EditError) -> Self {
        Self::RestoreFailure {
            original: Box::new(original),
            restore: Box::new(restore),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Io,
            Self::InvalidOffset { .. } => ErrorKind::InvalidOffset,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::IncompleteWrite { .. } => ErrorKind::IncompleteWrite,
            Self::RestoreFailure { .. } => ErrorKind::RestoreFailure,
            Self::StaleData { .. } => ErrorKind::StaleData,
            Self::InvalidSelection { .. } => ErrorKind::InvalidSelection,
            Self::InvalidPage { .. } => ErrorKind::InvalidPage,
        }
    }
}

/// Converts a signed caller offset into a store position.
pub(crate) fn checked_offset(offset: i64) -> Result<u64, EditError> {
    u64::try_from(offset).map_err(|_| EditError::InvalidOffset { offset })
}
