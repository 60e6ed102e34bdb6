//! Scoped environment-variable manipulation for tests.
//!
//! The process environment is global state, so suites that touch it mark
//! themselves `#[serial]` and go through these guards; the prior value comes
//! back on drop even when an assertion fails mid-test.

use std::env;

/// RAII guard that restores an environment variable's previous state on drop.
#[must_use = "dropping the guard immediately restores the previous value"]
pub struct EnvGuard {
    key: String,
    previous: Option<String>,
}

impl EnvGuard {
    /// Set `key` to `value`, remembering whatever it held before.
    pub fn set(key: &str, value: &str) -> Self {
        let previous = env::var(key).ok();
        env::set_var(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }

    /// Remove `key`, remembering whatever it held before.
    pub fn unset(key: &str) -> Self {
        let previous = env::var(key).ok();
        env::remove_var(key);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => env::set_var(&self.key, value),
            None => env::remove_var(&self.key),
        }
    }
}
