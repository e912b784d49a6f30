//! Undo/redo log.
//!
//! Two strict LIFO stacks of [`Operation`]s. Recording a new operation clears
//! the redo stack. Replays go through the bounds-checked write path; a replay
//! that fails puts the operation back where it came from so it can be retried.

use tracing::{debug, warn};

use crate::error::EditError;
use crate::session::Session;
use crate::storage::Storage;

/// A committed overwrite: `old_data` was replaced by `new_data` at `offset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    offset: u64,
    old_data: Vec<u8>,
    new_data: Vec<u8>,
}

impl Operation {
    pub fn new(offset: u64, old_data: Vec<u8>, new_data: Vec<u8>) -> Self {
        Self {
            offset,
            old_data,
            new_data,
        }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub fn old_data(&self) -> &[u8] {
        &self.old_data
    }

    #[must_use]
    pub fn new_data(&self) -> &[u8] {
        &self.new_data
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperationLog {
    undo: Vec<Operation>,
    redo: Vec<Operation>,
}

impl OperationLog {
    /// Pushes a freshly committed operation and drops the redo history.
    pub fn record(&mut self, operation: Operation) {
        self.undo.push(operation);
        self.redo.clear();
    }

    #[must_use]
    pub fn undo_stack(&self) -> &[Operation] {
        &self.undo
    }

    #[must_use]
    pub fn redo_stack(&self) -> &[Operation] {
        &self.redo
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<S: Storage> Session<S> {
    #[must_use]
    pub fn history(&self) -> &OperationLog {
        &self.log
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.log.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.log.redo.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.log.undo_depth()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.log.redo_depth()
    }

    /// Writes back the old bytes of the most recent operation. No-op when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> Result<(), EditError> {
        let Some(operation) = self.log.undo.pop() else {
            return Ok(());
        };

        match self.write_at_checked(operation.offset, &operation.old_data) {
            Ok(()) => {
                debug!(offset = operation.offset, len = operation.old_data.len(), "undo");
                self.log.redo.push(operation);
                Ok(())
            }
            Err(error) => {
                warn!(offset = operation.offset, %error, "undo replay failed");
                self.log.undo.push(operation);
                Err(error)
            }
        }
    }

    /// Re-applies the most recently undone operation. No-op when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Result<(), EditError> {
        let Some(operation) = self.log.redo.pop() else {
            return Ok(());
        };

        match self.write_at_checked(operation.offset, &operation.new_data) {
            Ok(()) => {
                debug!(offset = operation.offset, len = operation.new_data.len(), "redo");
                self.log.undo.push(operation);
                Ok(())
            }
            Err(error) => {
                warn!(offset = operation.offset, %error, "redo replay failed");
                self.log.redo.push(operation);
                Err(error)
            }
        }
    }
}
