//! Storage accessors for the backing byte store.
//!
//! [`FileStorage`] keeps no handle open between calls: every read or write
//! opens the file, seeks, does its work and closes it again.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::EditError;

pub trait Storage {
    /// Where the bytes live, for diagnostics and ownership checks.
    fn location(&self) -> &Path;

    fn size(&self) -> Result<u64, EditError>;

    /// Fills `buf` from `offset`, stopping early only at end of store.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize, EditError>;

    /// Writes `data` at `offset` and flushes it to durable storage before
    /// returning the number of bytes written.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<usize, EditError>;
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Binds to an existing file. Fails if the path cannot be stat'ed or is not
    /// a regular file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, EditError> {
        let path = path.into();
        let metadata = std::fs::metadata(&path)
            .map_err(|source| EditError::io("inspecting", &path, 0, 0, source))?;
        if !metadata.is_file() {
            let source = io::Error::new(io::ErrorKind::InvalidInput, "not a regular file");
            return Err(EditError::io("inspecting", &path, 0, 0, source));
        }
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn location(&self) -> &Path {
        &self.path
    }

    fn size(&self) -> Result<u64, EditError> {
        std::fs::metadata(&self.path)
            .map(|metadata| metadata.len())
            .map_err(|source| EditError::io("inspecting", &self.path, 0, 0, source))
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize, EditError> {
        let len = buf.len();
        let mut file = File::open(&self.path)
            .map_err(|source| EditError::io("opening for read", &self.path, offset, len, source))?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|source| EditError::io("seeking", &self.path, offset, len, source))?;

        let mut filled = 0;
        while filled < len {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(source) if source.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(EditError::io("reading", &self.path, offset, len, source));
                }
            }
        }
        Ok(filled)
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<usize, EditError> {
        let len = data.len();
        let mut file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|source| EditError::io("opening for write", &self.path, offset, len, source))?;
        file.seek(SeekFrom::Start(offset))
            .map_err(|source| EditError::io("seeking", &self.path, offset, len, source))?;

        let mut written = 0;
        while written < len {
            match file.write(&data[written..]) {
                Ok(0) => break,
                Ok(n) => written += n,
                Err(source) if source.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(EditError::io("writing", &self.path, offset, len, source));
                }
            }
        }

        file.sync_all()
            .map_err(|source| EditError::io("syncing", &self.path, offset, len, source))?;
        Ok(written)
    }
}

/// A fixed-size store held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    bytes: Vec<u8>,
    label: PathBuf,
}

impl MemoryStorage {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            label: PathBuf::from("<memory>"),
        }
    }

    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0; len])
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

}

impl Storage for MemoryStorage {
    fn location(&self) -> &Path {
        &self.label
    }

    fn size(&self) -> Result<u64, EditError> {
        Ok(self.bytes.len() as u64)
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize, EditError> {
        let Ok(start) = usize::try_from(offset) else {
            return Ok(0);
        };
        if start >= self.bytes.len() {
            return Ok(0);
        }
        let available = &self.bytes[start..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        Ok(n)
    }

    /// Overwrites in place. The buffer never grows: a write reaching past the
    /// current length is refused.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<usize, EditError> {
        let range = usize::try_from(offset)
            .ok()
            .and_then(|start| Some(start..start.checked_add(data.len())?))
            .filter(|range| range.end <= self.bytes.len());
        let Some(range) = range else {
            let source = io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("write past end of {}-byte buffer", self.bytes.len()),
            );
            return Err(EditError::io("writing", &self.label, offset, data.len(), source));
        };
        self.bytes[range].copy_from_slice(data);
        Ok(data.len())
    }
}

/// When a [`FailingStorage`] should refuse a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Pass everything through.
    Never,
    /// Succeed for the first `n` writes, fail every write after that.
    AfterWrites(usize),
    /// Fail the next `n` writes, then pass through.
    NextWrites(usize),
    /// Fail every write that starts at one of these offsets.
    OnOffsets(Vec<u64>),
    /// Write only the first half of every request.
    ShortWrites,
    /// Apply the next `n` writes, then report a sync failure for each.
    SyncFailures(usize),
}

/// Fault-injecting wrapper used to exercise rollback paths.
#[derive(Debug, Clone)]
pub struct FailingStorage<S> {
    inner: S,
    policy: FailurePolicy,
    write_count: usize,
}

impl<S: Storage> FailingStorage<S> {
    pub fn new(inner: S, policy: FailurePolicy) -> Self {
        Self {
            inner,
            policy,
            write_count: 0,
        }
    }

    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of write requests that reached this wrapper.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
        self.write_count = 0;
    }

    fn injected(&self, what: &'static str, offset: u64, len: usize) -> EditError {
        EditError::io(
            what,
            self.inner.location(),
            offset,
            len,
            io::Error::other(format!("injected {what} failure")),
        )
    }
}

impl<S: Storage> Storage for FailingStorage<S> {
    fn location(&self) -> &Path {
        self.inner.location()
    }

    fn size(&self) -> Result<u64, EditError> {
        self.inner.size()
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize, EditError> {
        self.inner.read_at(offset, buf)
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<usize, EditError> {
        let attempt = self.write_count;
        self.write_count += 1;

        let fault = match &mut self.policy {
            FailurePolicy::Never => None,
            FailurePolicy::AfterWrites(limit) => (attempt >= *limit).then_some(Fault::Refuse),
            FailurePolicy::NextWrites(remaining) => consume(remaining).then_some(Fault::Refuse),
            FailurePolicy::OnOffsets(offsets) => offsets.contains(&offset).then_some(Fault::Refuse),
            FailurePolicy::ShortWrites => Some(Fault::Short),
            FailurePolicy::SyncFailures(remaining) => consume(remaining).then_some(Fault::Sync),
        };

        match fault {
            None => self.inner.write_at(offset, data),
            Some(Fault::Refuse) => Err(self.injected("writing", offset, data.len())),
            Some(Fault::Short) => self.inner.write_at(offset, &data[..data.len() / 2]),
            Some(Fault::Sync) => {
                self.inner.write_at(offset, data)?;
                Err(self.injected("syncing", offset, data.len()))
            }
        }
    }
}

enum Fault {
    Refuse,
    Short,
    Sync,
}

fn consume(remaining: &mut usize) -> bool {
    if *remaining == 0 {
        return false;
    }
    *remaining -= 1;
    true
}
