//! Byte-level editing engine for arbitrary binary files.
//!
//! A [`Session`] binds to one store and offers paged reads, bounds-checked
//! overwrites that are synced before they return, streaming pattern search,
//! selection copy/paste, and an in-memory undo/redo log.
//!
//! Invariant: every committed write satisfies `offset + len <= size`; the
//! engine overwrites in place and never grows the store. The only exception is
//! [`Session::write_byte`], which passes straight through to storage; whether
//! that can extend the store is up to the [`Storage`] implementation.
//!
//! # Public API Overview
//! - Open a store with [`Session::open`], or hand bytes to a
//!   [`StoreProvisioner`] through [`Session::import`].
//! - Write with [`Session::write_bytes`], [`Session::write_bytes_buffered`],
//!   [`Session::write_bytes_with_backup`] or [`Session::paste_bytes`].
//! - Undo and redo logged writes with [`Session::undo`] / [`Session::redo`].
//! - Search with [`Session::search`] and [`Session::find_next`].

pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod page;
pub mod provision;
pub mod search;
pub mod selection;
pub mod session;
pub mod storage;
mod write;

#[cfg(test)]
mod test_support;

pub use crate::config::EngineConfig;
pub use crate::error::{EditError, ErrorKind};
pub use crate::history::{Operation, OperationLog};
pub use crate::page::{read_page, Page};
pub use crate::provision::{ProvisionedStore, StoreProvisioner};
pub use crate::search::SearchOptions;
pub use crate::selection::Selection;
pub use crate::session::Session;
pub use crate::storage::{FailingStorage, FailurePolicy, FileStorage, MemoryStorage, Storage};
