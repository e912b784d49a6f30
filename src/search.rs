//! Streaming pattern search.
//!
//! The store is read through a fixed-size window and each window is scanned
//! naively. With carry-over enabled the last `pattern.len() - 1` bytes of a
//! window are prepended to the next one, so matches straddling a window
//! boundary are found; without it they are missed.

use std::ops::ControlFlow;

use tracing::debug;

use crate::error::{checked_offset, EditError};
use crate::session::Session;
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub buffer_size: usize,
    pub carry_over: bool,
}

/// Every match start at or after `start`, ascending. Overlapping matches are
/// all reported. An empty pattern matches nothing.
pub fn search<S: Storage + ?Sized>(
    storage: &S,
    pattern: &[u8],
    start: u64,
    options: SearchOptions,
) -> Result<Vec<u64>, EditError> {
    let mut matches = Vec::new();
    scan(storage, pattern, start, options, |offset| {
        matches.push(offset);
        ControlFlow::Continue(())
    })?;
    Ok(matches)
}

/// First match at or after `start`, stopping the scan as soon as it is found.
pub fn find_first<S: Storage + ?Sized>(
    storage: &S,
    pattern: &[u8],
    start: u64,
    options: SearchOptions,
) -> Result<Option<u64>, EditError> {
    let mut found = None;
    scan(storage, pattern, start, options, |offset| {
        found = Some(offset);
        ControlFlow::Break(())
    })?;
    Ok(found)
}

fn scan<S: Storage + ?Sized>(
    storage: &S,
    pattern: &[u8],
    start: u64,
    options: SearchOptions,
    mut on_match: impl FnMut(u64) -> ControlFlow<()>,
) -> Result<(), EditError> {
    if pattern.is_empty() {
        return Ok(());
    }

    let buffer_size = options.buffer_size.max(1);
    let keep = if options.carry_over { pattern.len() - 1 } else { 0 };

    let mut read_buf = vec![0u8; buffer_size];
    let mut window: Vec<u8> = Vec::with_capacity(buffer_size + keep);
    let mut position = start;

    loop {
        let n = storage.read_at(position, &mut read_buf)?;
        if n == 0 {
            break;
        }

        let window_start = position - window.len() as u64;
        window.extend_from_slice(&read_buf[..n]);

        for (index, candidate) in window.windows(pattern.len()).enumerate() {
            if candidate == pattern {
                if let ControlFlow::Break(()) = on_match(window_start + index as u64) {
                    return Ok(());
                }
            }
        }

        position += n as u64;
        let carried = keep.min(window.len());
        window.drain(..window.len() - carried);
    }

    Ok(())
}

impl<S: Storage> Session<S> {
    fn search_options(&self) -> SearchOptions {
        SearchOptions {
            buffer_size: self.config.search_buffer_size,
            carry_over: self.config.search_carry_over,
        }
    }

    pub fn search(&self, pattern: &[u8], start_offset: i64) -> Result<Vec<u64>, EditError> {
        let start = checked_offset(start_offset)?;
        let matches = search(&self.storage, pattern, start, self.search_options())?;
        debug!(start, pattern_len = pattern.len(), matches = matches.len(), "search finished");
        Ok(matches)
    }

    /// First match at or after `start_offset`; `None` when there is none.
    pub fn find_next(&self, pattern: &[u8], start_offset: i64) -> Result<Option<u64>, EditError> {
        let start = checked_offset(start_offset)?;
        find_first(&self.storage, pattern, start, self.search_options())
    }
}
