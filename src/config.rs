//! Runtime defaults read from the environment (and a `.env` file, loaded by
//! the binary before this runs).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Comma-separated directories excluded on every run
pub const ENV_EXCLUDE: &str = "BATCH_RENAME_EXCLUDE";
/// Spinner frame interval in milliseconds
pub const ENV_SPINNER_MS: &str = "BATCH_RENAME_SPINNER_MS";
/// Set to 0/false/no to stop writing history files
pub const ENV_HISTORY: &str = "BATCH_RENAME_HISTORY";

pub const DEFAULT_SPINNER_MS: u64 = 100;
const SPINNER_MS_RANGE: (u64, u64) = (10, 1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameConfig {
    pub default_exclusions: Vec<PathBuf>,
    pub spinner_interval: Duration,
    pub write_history: bool,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            default_exclusions: Vec::new(),
            spinner_interval: Duration::from_millis(DEFAULT_SPINNER_MS),
            write_history: true,
        }
    }
}

/// Load configuration from environment variables, falling back to defaults.
pub fn config_from_env() -> RenameConfig {
    let default_exclusions = env::var(ENV_EXCLUDE)
        .map(|v| split_list(&v))
        .unwrap_or_default();

    let spinner_ms = env::var(ENV_SPINNER_MS)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|ms| ms.clamp(SPINNER_MS_RANGE.0, SPINNER_MS_RANGE.1))
        .unwrap_or(DEFAULT_SPINNER_MS);

    let write_history = env::var(ENV_HISTORY)
        .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no"))
        .unwrap_or(true);

    RenameConfig {
        default_exclusions,
        spinner_interval: Duration::from_millis(spinner_ms),
        write_history,
    }
}

/// Split a comma-separated path list, dropping blanks.
pub fn split_list(input: &str) -> Vec<PathBuf> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}
