//! Shared environment guards for integration tests.

use std::env;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Guard that sets environment variables and restores them on drop.
pub struct EnvVarGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets each `(key, value)` pair for the guard lifetime.
    pub fn set(changes: &[(&'static str, &str)]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous = changes
            .iter()
            .map(|(key, value)| {
                let old = env::var(key).ok();
                unsafe {
                    // SAFETY: the global mutex serializes environment mutations in tests.
                    env::set_var(key, value);
                }
                (*key, old)
            })
            .collect();

        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(previous) => env::set_var(key, previous),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
