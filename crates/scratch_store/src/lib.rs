//! Scratch-directory provisioning for imported stores.
//!
//! Supplied bytes are written to a uniquely named working copy under one
//! scratch root. Only files under that root are ever removed.

mod error;
mod paths;
mod store;

pub use error::ScratchStoreError;
pub use paths::{default_scratch_root, sanitize_name, working_copy_name, SCRATCH_DIR_ENV};
pub use store::ScratchDir;
