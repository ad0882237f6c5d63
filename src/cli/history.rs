//! # History File Management
//!
//! Manages the location of the CLI history file. By default, history is
//! stored in `~/.climdex_history`.
//!
//! ## Configuration
//!
//! The location can be overridden with the `CLIMDEX_HISTORY` environment
//! variable:
//!
//! ```bash
//! export CLIMDEX_HISTORY=/custom/path/history
//! climdex --sample
//! ```
//!
//! Setting `CLIMDEX_HISTORY` to an empty string disables persistence.
//!
//! ## Implementation
//!
//! The path is resolved once at startup and handed to rustyline, which does
//! the actual file I/O.

use std::env;
use std::path::PathBuf;

const DEFAULT_HISTORY_FILE: &str = ".climdex_history";
const HISTORY_ENV_VAR: &str = "CLIMDEX_HISTORY";

pub fn history_path() -> Option<PathBuf> {
    if let Ok(custom_path) = env::var(HISTORY_ENV_VAR) {
        if custom_path.is_empty() {
            return None;
        }
        return Some(PathBuf::from(custom_path));
    }

    home_dir().map(|home| home.join(DEFAULT_HISTORY_FILE))
}

fn home_dir() -> Option<PathBuf> {
    env::var("HOME").ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // The test runner is multi-threaded and these tests share one env var.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn default_history_path_is_in_home() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var(HISTORY_ENV_VAR);

        if let Some(path) = history_path() {
            assert!(path.to_string_lossy().contains(".climdex_history"));
        }
    }

    #[test]
    fn custom_history_path_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var(HISTORY_ENV_VAR, "/custom/path");
        let path = history_path();
        env::remove_var(HISTORY_ENV_VAR);

        assert_eq!(path, Some(PathBuf::from("/custom/path")));
    }

    #[test]
    fn empty_env_disables_history() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var(HISTORY_ENV_VAR, "");
        let path = history_path();
        env::remove_var(HISTORY_ENV_VAR);

        assert_eq!(path, None);
    }
}
