use std::env;
use std::path::PathBuf;

pub const SCRATCH_DIR_ENV: &str = "HEXSESSION_SCRATCH_DIR";
const SCRATCH_DIR_NAME: &str = "hexsession";
const FALLBACK_NAME: &str = "data.bin";

/// `$HEXSESSION_SCRATCH_DIR`, or `<system temp>/hexsession`.
#[must_use]
pub fn default_scratch_root() -> PathBuf {
    env::var_os(SCRATCH_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join(SCRATCH_DIR_NAME))
}

/// Reduces a caller-supplied name to a single safe path component.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            ':' | ' ' | '\0' => '-',
            _ if c.is_control() => '-',
            _ => c,
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[must_use]
pub fn working_copy_name(id: &str, name: &str) -> String {
    format!("{}_{}", id, sanitize_name(name))
}
