//! Fixed-size page reads and the single cached page a session keeps.

use crate::error::EditError;
use crate::storage::Storage;

/// One window of the store. Shorter than the page size only at end of store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub data: Vec<u8>,
}

pub(crate) fn page_offset(page_num: usize, page_size: usize) -> Result<u64, EditError> {
    page_num
        .checked_mul(page_size)
        .and_then(|offset| u64::try_from(offset).ok())
        .ok_or(EditError::InvalidPage { page: page_num })
}

/// Reads up to `page_size` bytes of page `page_num`. Pages past the end of the
/// store come back empty.
pub fn read_page<S: Storage + ?Sized>(
    storage: &S,
    page_num: usize,
    page_size: usize,
) -> Result<Page, EditError> {
    let offset = page_offset(page_num, page_size)?;
    let mut data = vec![0u8; page_size];
    let n = storage.read_at(offset, &mut data)?;
    data.truncate(n);
    Ok(Page {
        number: page_num,
        data,
    })
}

#[derive(Debug, Clone)]
pub(crate) struct PageCache {
    page_size: usize,
    current_page: usize,
    buffer: Vec<u8>,
}

impl PageCache {
    pub(crate) fn new(page_size: usize) -> Self {
        Self {
            page_size,
            current_page: 0,
            buffer: Vec::new(),
        }
    }

    pub(crate) fn page_size(&self) -> usize {
        self.page_size
    }

    pub(crate) fn current_page(&self) -> usize {
        self.current_page
    }

    pub(crate) fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub(crate) fn replace(&mut self, page: Page) {
        self.current_page = page.number;
        self.buffer = page.data;
    }

    /// Copies the part of a committed write that lands inside the cached page,
    /// clamped to the bytes actually cached.
    pub(crate) fn refresh(&mut self, offset: u64, data: &[u8]) {
        let Some(page_start) = (self.current_page as u64).checked_mul(self.page_size as u64)
        else {
            return;
        };
        let cached_end = page_start + self.buffer.len() as u64;
        let write_end = offset.saturating_add(data.len() as u64);

        let start = offset.max(page_start);
        let end = write_end.min(cached_end);
        if start >= end {
            return;
        }

        let dst = (start - page_start) as usize..(end - page_start) as usize;
        let src = (start - offset) as usize..(end - offset) as usize;
        self.buffer[dst].copy_from_slice(&data[src]);
    }
}
