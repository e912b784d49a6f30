#![allow(dead_code)]

use std::path::{Path, PathBuf};

use hexsession::{EngineConfig, Session};
use tempfile::TempDir;

pub fn write_store(bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("store.bin");
    std::fs::write(&path, bytes).expect("store should be written");
    (dir, path)
}

pub fn open_zeroed(len: usize) -> (TempDir, PathBuf, Session) {
    open_zeroed_with(len, EngineConfig::default())
}

pub fn open_zeroed_with(len: usize, config: EngineConfig) -> (TempDir, PathBuf, Session) {
    let (dir, path) = write_store(&vec![0u8; len]);
    let session = Session::open_with_config(&path, config).expect("session should open");
    (dir, path, session)
}

pub fn on_disk(path: &Path) -> Vec<u8> {
    std::fs::read(path).expect("store should be readable")
}
