//! Supervision of the MultiVu control application.
//!
//! The native library only works while MultiVu is running. When a call
//! fails the retry loop asks a [`Supervisor`] whether the application is
//! up, starts it if not, and waits before the next attempt.

pub mod process;

use std::thread;
use std::time::Duration;

use crate::error::LaunchError;

pub use process::MultiVu;

/// Trait for checking on and starting the control application.
///
/// This abstraction allows mocking the OS process table in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Supervisor {
    /// Whether the control application currently appears in the process list.
    fn is_running(&self) -> bool;

    /// Start the control application without waiting for it to be ready.
    fn launch(&self) -> Result<(), LaunchError>;

    /// Block the calling thread between attempts.
    fn pause(&self, wait: Duration) {
        thread::sleep(wait);
    }
}

impl<S: Supervisor + ?Sized> Supervisor for &S {
    fn is_running(&self) -> bool {
        (**self).is_running()
    }

    fn launch(&self) -> Result<(), LaunchError> {
        (**self).launch()
    }

    fn pause(&self, wait: Duration) {
        (**self).pause(wait)
    }
}
