//! MultiVu process lookup and launch.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use sysinfo::{ProcessesToUpdate, System};
use tracing::debug;

use crate::config::env;
use crate::error::LaunchError;

use super::Supervisor;

/// Argument MultiVu is started with.
pub const LAUNCH_ARG: &str = "-macro";

/// The MultiVu executable at a fixed installation path.
#[derive(Debug, Clone)]
pub struct MultiVu {
    path: PathBuf,
    process_name: OsString,
}

impl MultiVu {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let process_name = executable_name(&path);
        Self { path, process_name }
    }

    /// MultiVu at the path given by `QDPPMS_MULTIVU_PATH`, or the standard
    /// installation path.
    pub fn from_env() -> Self {
        Self::new(env::multivu_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name matched exactly against the OS process list.
    pub fn process_name(&self) -> &OsStr {
        &self.process_name
    }
}

impl Default for MultiVu {
    fn default() -> Self {
        Self::new(env::DEFAULT_MULTIVU_PATH)
    }
}

impl Supervisor for MultiVu {
    fn is_running(&self) -> bool {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);
        let running = system
            .processes_by_exact_name(&self.process_name)
            .next()
            .is_some();
        debug!(process = ?self.process_name, running, "Checked process list");
        running
    }

    fn launch(&self) -> Result<(), LaunchError> {
        // Dropping the child handle leaves the process running.
        Command::new(&self.path)
            .arg(LAUNCH_ARG)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|source| LaunchError::SpawnFailed {
                path: self.path.clone(),
                source,
            })
    }
}

/// Final path component, splitting on both separators so Windows paths are
/// handled the same on every host.
fn executable_name(path: &Path) -> OsString {
    let text = path.to_string_lossy();
    let name = text.rsplit(['\\', '/']).next().unwrap_or_default();
    OsString::from(name)
}
