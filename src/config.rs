//! Engine configuration.

use std::env;

pub const DEFAULT_PAGE_SIZE: usize = 1024;
pub const DEFAULT_WRITE_CHUNK: usize = 4096;
pub const DEFAULT_SEARCH_BUFFER: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Bytes per cached page.
    pub page_size: usize,
    /// Upper bound on a single flushed write in `write_bytes_buffered`.
    pub write_chunk_size: usize,
    /// Read window used by the search engine.
    pub search_buffer_size: usize,
    /// Carry `pattern.len() - 1` bytes between search windows so that matches
    /// straddling a window boundary are found.
    pub search_carry_over: bool,
    /// Make `replace` fail with `StaleData` when the live bytes differ from
    /// the caller's expected old bytes.
    pub verify_replace: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            write_chunk_size: DEFAULT_WRITE_CHUNK,
            search_buffer_size: DEFAULT_SEARCH_BUFFER,
            search_carry_over: true,
            verify_replace: false,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            page_size: env_size("HEXSESSION_PAGE_SIZE").unwrap_or(defaults.page_size),
            write_chunk_size: env_size("HEXSESSION_WRITE_CHUNK")
                .unwrap_or(defaults.write_chunk_size),
            search_buffer_size: env_size("HEXSESSION_SEARCH_BUFFER")
                .unwrap_or(defaults.search_buffer_size),
            search_carry_over: env_flag("HEXSESSION_SEARCH_CARRY_OVER")
                .unwrap_or(defaults.search_carry_over),
            verify_replace: env_flag("HEXSESSION_VERIFY_REPLACE")
                .unwrap_or(defaults.verify_replace),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_write_chunk_size(mut self, write_chunk_size: usize) -> Self {
        self.write_chunk_size = write_chunk_size;
        self
    }

    pub fn with_search_buffer_size(mut self, search_buffer_size: usize) -> Self {
        self.search_buffer_size = search_buffer_size;
        self
    }

    pub fn with_search_carry_over(mut self, enabled: bool) -> Self {
        self.search_carry_over = enabled;
        self
    }

    pub fn with_verify_replace(mut self, enabled: bool) -> Self {
        self.verify_replace = enabled;
        self
    }

    /// Replaces zero sizes with their defaults.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        if self.write_chunk_size == 0 {
            self.write_chunk_size = DEFAULT_WRITE_CHUNK;
        }
        if self.search_buffer_size == 0 {
            self.search_buffer_size = DEFAULT_SEARCH_BUFFER;
        }
        self
    }
}

fn env_flag(key: &str) -> Option<bool> {
    match env::var(key).ok()?.trim() {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

fn env_size(key: &str) -> Option<usize> {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}
