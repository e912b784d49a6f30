//! Selection range and clipboard operations.

use tracing::debug;

use crate::error::{checked_offset, EditError};
use crate::session::Session;
use crate::storage::Storage;

/// Half-open byte range `[start, end)`. `start == end` is an empty selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: u64,
    pub end: u64,
}

impl Selection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }
}

impl<S: Storage> Session<S> {
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Selects `[start, end)`. The range must lie within the store.
    pub fn set_selection(&mut self, start: i64, end: i64) -> Result<(), EditError> {
        let invalid = || EditError::InvalidSelection {
            start,
            end,
            size: self.size,
        };
        let (Ok(from), Ok(to)) = (u64::try_from(start), u64::try_from(end)) else {
            return Err(invalid());
        };
        if to < from || to > self.size {
            return Err(invalid());
        }
        self.selection = Selection { start: from, end: to };
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    /// Bytes under the selection; empty for an empty selection.
    pub fn copy_selection(&self) -> Result<Vec<u8>, EditError> {
        if self.selection.is_empty() {
            return Ok(Vec::new());
        }
        let len = usize::try_from(self.selection.len()).map_err(|_| EditError::InvalidSelection {
            start: self.selection.start as i64,
            end: self.selection.end as i64,
            size: self.size,
        })?;
        self.read_at(self.selection.start, len)
    }

    /// Overwrites `offset` with `new_data` as an undoable paste. `old_data` is
    /// only compared against the store when `verify_replace` is configured.
    pub fn replace(&mut self, offset: i64, old_data: &[u8], new_data: &[u8]) -> Result<(), EditError> {
        if self.config.verify_replace {
            return self.replace_checked(offset, old_data, new_data);
        }
        self.paste_bytes(offset, new_data)
    }

    /// Like [`Session::replace`] but fails with `StaleData` unless the store
    /// still holds `old_data` at `offset`.
    pub fn replace_checked(
        &mut self,
        offset: i64,
        old_data: &[u8],
        new_data: &[u8],
    ) -> Result<(), EditError> {
        let position = checked_offset(offset)?;
        let current = self.read_at(position, old_data.len())?;
        if current != old_data {
            debug!(offset = position, "replace rejected, store changed");
            return Err(EditError::StaleData { offset: position });
        }
        self.paste_bytes(offset, new_data)
    }
}
