use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, OnceLock};

use crate::constants::KOALA_ANALYZERS_ENV;

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn apply(key: &str, value: Option<&OsString>) {
    #[allow(unused_unsafe)]
    unsafe {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}

/// Runs `f` with `KOALA_ANALYZERS` set to `value`, or unset for `None`.
pub(crate) fn with_analyzers_env<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
    with_env_vars(&[(KOALA_ANALYZERS_ENV, value)], f)
}

/// Runs a closure while holding a global environment lock and applying
/// overrides. Previous values are restored even if the closure panics.
pub(crate) fn with_env_vars<T>(overrides: &[(&str, Option<&str>)], f: impl FnOnce() -> T) -> T {
    let _guard = env_lock()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let backups: Vec<(&str, Option<OsString>)> = overrides
        .iter()
        .map(|(key, _)| (*key, env::var_os(key)))
        .collect();

    for (key, value) in overrides {
        apply(key, value.map(OsString::from).as_ref());
    }

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

    for (key, value) in backups.into_iter().rev() {
        apply(key, value.as_ref());
    }

    match result {
        Ok(result) => result,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}
