//! Shared helpers for unit tests.

use std::env;

/// RAII environment variable guard that restores the original value (or
/// removes the variable) when dropped.
///
/// Tests using it must be marked `#[serial_test::serial]` so they do not
/// race on the process environment.
pub struct ScopedEnv {
    key: String,
    original: Option<String>,
}

impl ScopedEnv {
    /// Sets `key` to `value` for the guard's lifetime.
    pub fn set(key: &str, value: &str) -> Self {
        let original = env::var(key).ok();
        unsafe {
            env::set_var(key, value);
        }
        Self {
            key: key.to_string(),
            original,
        }
    }

    /// Removes `key` for the guard's lifetime.
    pub fn unset(key: &str) -> Self {
        let original = env::var(key).ok();
        unsafe {
            env::remove_var(key);
        }
        Self {
            key: key.to_string(),
            original,
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        match &self.original {
            Some(val) => unsafe { env::set_var(&self.key, val) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}
