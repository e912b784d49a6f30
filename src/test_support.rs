//! Helpers shared by unit tests.

use std::env;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Serializes tests that touch the process environment and restores every
/// variable it overrode when dropped.
pub(crate) struct ScopedEnv {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Applies `vars` in order; `None` unsets the variable.
    pub(crate) fn apply(vars: &[(&'static str, Option<&str>)]) -> Self {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        let lock = ENV_LOCK
            .get_or_init(Mutex::default)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let saved = vars
            .iter()
            .map(|&(key, value)| {
                let previous = env::var(key).ok();
                match value {
                    Some(value) => env::set_var(key, value),
                    None => env::remove_var(key),
                }
                (key, previous)
            })
            .collect();

        Self { saved, _lock: lock }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            match previous {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }
}
