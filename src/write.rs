//! The write path.
//!
//! Every higher-level write bottoms out in [`Session::write_bytes`]: validate
//! against the recorded store size, write, sync, then patch the cached page.
//! The engine only overwrites; it never grows the store.

use tracing::{debug, error, warn};

use crate::error::{checked_offset, EditError};
use crate::history::Operation;
use crate::session::Session;
use crate::storage::Storage;

impl<S: Storage> Session<S> {
    /// Writes one byte with no check against the store size.
    pub fn write_byte(&mut self, offset: i64, value: u8) -> Result<(), EditError> {
        let offset = checked_offset(offset)?;
        let written = self.storage.write_at(offset, &[value])?;
        if written != 1 {
            return Err(EditError::IncompleteWrite {
                offset,
                written,
                expected: 1,
            });
        }
        self.modified = true;
        self.cache.refresh(offset, &[value]);
        Ok(())
    }

    /// Bounds-checked, synced overwrite of `[offset, offset + data.len())`.
    /// Empty data is a successful no-op.
    pub fn write_bytes(&mut self, offset: i64, data: &[u8]) -> Result<(), EditError> {
        let offset = checked_offset(offset)?;
        self.write_at_checked(offset, data)
    }

    /// Splits `data` into `write_chunk_size` pieces written in offset order.
    /// A failing chunk stops the sequence; earlier chunks stay committed.
    pub fn write_bytes_buffered(&mut self, offset: i64, data: &[u8]) -> Result<(), EditError> {
        let offset = checked_offset(offset)?;
        let chunk_size = self.config.write_chunk_size;

        let mut chunk_offset = offset;
        for chunk in data.chunks(chunk_size) {
            self.write_at_checked(chunk_offset, chunk).inspect_err(|error| {
                warn!(offset = chunk_offset, len = chunk.len(), %error, "chunked write stopped");
            })?;
            chunk_offset += chunk.len() as u64;
        }
        Ok(())
    }

    /// Transactional overwrite. On success the change is recorded for undo;
    /// on failure the previous bytes are written back. If that restore also
    /// fails, both errors are reported together.
    pub fn write_bytes_with_backup(&mut self, offset: i64, data: &[u8]) -> Result<(), EditError> {
        let offset = checked_offset(offset)?;
        if data.is_empty() {
            return Ok(());
        }
        // Rejected writes never touch the store, so there is nothing to restore.
        self.check_bounds(offset, data.len())?;

        let backup = self.backup(offset, data.len())?;
        match self.write_at_checked(offset, data) {
            Ok(()) => {
                self.log.record(Operation::new(offset, backup, data.to_vec()));
                Ok(())
            }
            Err(original) => {
                warn!(offset, len = data.len(), error = %original, "write failed, restoring backup");
                match self.write_at_checked(offset, &backup) {
                    Ok(()) => Err(original),
                    Err(restore) => {
                        error!(offset, len = data.len(), %restore, "restore failed");
                        Err(EditError::restore_failure(original, restore))
                    }
                }
            }
        }
    }

    /// Overwrite used by paste and replace: back up, write, and record the
    /// operation once the write has succeeded. No rollback on failure.
    pub fn paste_bytes(&mut self, offset: i64, data: &[u8]) -> Result<(), EditError> {
        let offset = checked_offset(offset)?;
        if data.is_empty() {
            return Ok(());
        }
        self.check_bounds(offset, data.len())?;

        let backup = self.backup(offset, data.len())?;
        self.write_at_checked(offset, data)?;
        self.log.record(Operation::new(offset, backup, data.to_vec()));
        Ok(())
    }

    pub(crate) fn write_at_checked(&mut self, offset: u64, data: &[u8]) -> Result<(), EditError> {
        if data.is_empty() {
            return Ok(());
        }
        self.check_bounds(offset, data.len())?;

        let written = self.storage.write_at(offset, data)?;
        if written != data.len() {
            return Err(EditError::IncompleteWrite {
                offset,
                written,
                expected: data.len(),
            });
        }

        self.modified = true;
        self.cache.refresh(offset, data);
        debug!(path = %self.storage.location().display(), offset, len = data.len(), "write committed");
        Ok(())
    }

    fn check_bounds(&self, offset: u64, len: usize) -> Result<(), EditError> {
        match offset.checked_add(len as u64) {
            Some(end) if end <= self.size => Ok(()),
            _ => Err(EditError::OutOfRange {
                offset,
                len,
                size: self.size,
            }),
        }
    }

    /// Current bytes of the range, zero-padded if the store came up short.
    fn backup(&self, offset: u64, len: usize) -> Result<Vec<u8>, EditError> {
        let mut backup = self.read_at(offset, len)?;
        backup.resize(len, 0);
        Ok(backup)
    }
}
