use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{checked_offset, EditError};
use crate::history::OperationLog;
use crate::page::{read_page, PageCache};
use crate::provision::StoreProvisioner;
use crate::selection::Selection;
use crate::storage::{FileStorage, Storage};

/// Editing state bound to one open store.
///
/// A session owns its page cache and both history stacks. It is not meant to
/// be shared; callers serialize access themselves.
pub struct Session<S: Storage = FileStorage> {
    pub(crate) storage: S,
    pub(crate) config: EngineConfig,
    pub(crate) size: u64,
    pub(crate) modified: bool,
    pub(crate) cache: PageCache,
    pub(crate) selection: Selection,
    pub(crate) log: OperationLog,
    owner: Option<Arc<dyn StoreProvisioner>>,
}

impl Session<FileStorage> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EditError> {
        Self::open_with_config(path, EngineConfig::default())
    }

    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: EngineConfig,
    ) -> Result<Self, EditError> {
        let storage = FileStorage::open(path.as_ref())?;
        Self::with_storage(storage, config)
    }

    /// Materializes `data` through `provisioner` and opens the result. The
    /// session owns that store and releases it on [`Session::cleanup`].
    pub fn import(
        provisioner: Arc<dyn StoreProvisioner>,
        name: &str,
        data: &[u8],
        config: EngineConfig,
    ) -> Result<Self, EditError> {
        let store = provisioner.materialize(name, data)?;
        debug!(path = %store.path.display(), size = store.size, "materialized working copy");

        match Self::open_with_config(&store.path, config) {
            Ok(mut session) => {
                session.owner = Some(provisioner);
                Ok(session)
            }
            Err(error) => {
                if let Err(release_error) = provisioner.release(&store.path) {
                    warn!(path = %store.path.display(), error = %release_error, "failed to release working copy");
                }
                Err(error)
            }
        }
    }
}

impl<S: Storage> Session<S> {
    /// Binds a session to `storage`, recording its current size. Both history
    /// stacks start empty and the session starts clean.
    pub fn with_storage(storage: S, config: EngineConfig) -> Result<Self, EditError> {
        let config = config.normalized();
        let size = storage.size()?;
        debug!(path = %storage.location().display(), size, "opened store");

        Ok(Self {
            storage,
            cache: PageCache::new(config.page_size),
            config,
            size,
            modified: false,
            selection: Selection::default(),
            log: OperationLog::default(),
            owner: None,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.storage.location()
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Whether [`Session::cleanup`] will release the store.
    #[must_use]
    pub fn owns_store(&self) -> bool {
        self.owner.is_some()
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.cache.page_size()
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.cache.current_page()
    }

    #[must_use]
    pub fn page_buffer(&self) -> &[u8] {
        self.cache.buffer()
    }

    #[must_use]
    pub fn page_count(&self) -> u64 {
        self.size.div_ceil(self.cache.page_size() as u64)
    }

    pub fn read_page(&self, page_num: usize) -> Result<Vec<u8>, EditError> {
        read_page(&self.storage, page_num, self.cache.page_size()).map(|page| page.data)
    }

    /// Reads page `page_num` and makes it the cached page.
    pub fn load_page(&mut self, page_num: usize) -> Result<&[u8], EditError> {
        let page = read_page(&self.storage, page_num, self.cache.page_size())?;
        self.cache.replace(page);
        Ok(self.cache.buffer())
    }

    /// Reads up to `len` bytes from `offset`; shorter at end of store.
    pub fn read_range(&self, offset: i64, len: usize) -> Result<Vec<u8>, EditError> {
        let offset = checked_offset(offset)?;
        self.read_at(offset, len)
    }

    pub(crate) fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>, EditError> {
        let mut data = vec![0u8; len];
        let n = self.storage.read_at(offset, &mut data)?;
        data.truncate(n);
        Ok(data)
    }

    /// Every committed write is already synced, so saving only clears the
    /// dirty flag.
    pub fn save(&mut self) {
        if self.modified {
            debug!(path = %self.path().display(), "marked clean");
            self.modified = false;
        }
    }

    /// Releases a session-owned store and drops the undo/redo history and
    /// selection that referred to it. No-op for stores opened directly.
    pub fn cleanup(&mut self) -> Result<(), EditError> {
        let Some(owner) = self.owner.take() else {
            return Ok(());
        };
        debug!(path = %self.path().display(), "releasing working copy");
        self.log.clear();
        self.selection = Selection::default();
        owner.release(self.storage.location())
    }

    pub fn close(mut self) -> Result<(), EditError> {
        self.cleanup()
    }
}

impl<S: Storage> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.path())
            .field("size", &self.size)
            .field("modified", &self.modified)
            .field("current_page", &self.cache.current_page())
            .field("selection", &self.selection)
            .field("undo_depth", &self.log.undo_depth())
            .field("redo_depth", &self.log.redo_depth())
            .field("owns_store", &self.owner.is_some())
            .finish()
    }
}
