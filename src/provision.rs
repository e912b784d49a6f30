//! Seam for materializing supplied bytes into a store a session can open.

use std::path::{Path, PathBuf};

use crate::error::EditError;

/// A working copy created by a [`StoreProvisioner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedStore {
    pub path: PathBuf,
    pub size: u64,
}

/// Creates and disposes of session-owned stores.
///
/// Hosts inject an implementation into [`Session::import`](crate::Session::import);
/// the engine itself never decides where scratch files live.
pub trait StoreProvisioner: Send + Sync {
    fn materialize(&self, name: &str, data: &[u8]) -> Result<ProvisionedStore, EditError>;

    /// Removes a store previously returned by `materialize`. Paths this
    /// provisioner did not create are left alone.
    fn release(&self, path: &Path) -> Result<(), EditError>;
}
