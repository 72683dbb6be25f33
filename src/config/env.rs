//! Environment overrides for library paths and the default retry policy.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;
use crate::retry::RetryPolicy;

/// Path of the native library.
pub const DLL_PATH_ENV_VAR: &str = "QDPPMS_DLL_PATH";
/// Path (or bare name) of the MultiVu executable.
pub const MULTIVU_PATH_ENV_VAR: &str = "QDPPMS_MULTIVU_PATH";
/// Attempt count for the default retry policy.
pub const TRIES_ENV_VAR: &str = "QDPPMS_RETRY_TRIES";
/// Wait in seconds between attempts for the default retry policy.
pub const WAIT_ENV_VAR: &str = "QDPPMS_RETRY_WAIT";

/// Standard MultiVu installation path.
pub const DEFAULT_MULTIVU_PATH: &str = r"C:\QdPpms\MultiVu\PpmsMvu.exe";

/// Library location relative to the directory holding the executable.
const DEFAULT_DLL_RELATIVE: &str = "MyPPMSDLL/MyPPMSDLL.dll";

/// Read and parse an environment variable.
///
/// Returns `Ok(None)` when the variable is unset or empty.
fn read_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(v) if !v.is_empty() => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvValue { var, value: v }),
        _ => Ok(None),
    }
}

/// Read a variable, warning and falling back to `default` when it is invalid.
fn var_or<T: FromStr + std::fmt::Debug>(var: &'static str, default: T) -> T {
    match read_var(var) {
        Ok(Some(value)) => value,
        Ok(None) => default,
        Err(e) => {
            warn!("{}, using default {:?}", e, default);
            default
        }
    }
}

/// Default retry policy, honoring `QDPPMS_RETRY_TRIES` and `QDPPMS_RETRY_WAIT`.
pub fn retry_policy() -> RetryPolicy {
    let defaults = RetryPolicy::default();
    let tries = var_or(TRIES_ENV_VAR, defaults.tries);
    let wait_secs = var_or(WAIT_ENV_VAR, defaults.wait.as_secs());
    RetryPolicy::new(tries, Duration::from_secs(wait_secs))
}

/// Native library path from `QDPPMS_DLL_PATH`, or the default location next
/// to the running executable.
pub fn dll_path() -> PathBuf {
    match env::var_os(DLL_PATH_ENV_VAR) {
        Some(v) if !v.is_empty() => PathBuf::from(v),
        _ => {
            let base = env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
                .unwrap_or_default();
            base.join(DEFAULT_DLL_RELATIVE)
        }
    }
}

/// MultiVu executable path from `QDPPMS_MULTIVU_PATH`, or the standard
/// installation path.
///
/// A bare executable name is looked up on `PATH`; if it cannot be found it
/// is returned unchanged.
pub fn multivu_path() -> PathBuf {
    match env::var_os(MULTIVU_PATH_ENV_VAR) {
        Some(v) if !v.is_empty() => resolve_executable(PathBuf::from(v)),
        _ => PathBuf::from(DEFAULT_MULTIVU_PATH),
    }
}

fn resolve_executable(path: PathBuf) -> PathBuf {
    if path.components().count() > 1 {
        return path;
    }
    which::which(&path).unwrap_or(path)
}
