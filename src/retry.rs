//! Fixed-delay retry with control-application recovery.

use std::fmt::Display;
use std::time::Duration;

use backoff::backoff::{Backoff, Constant};
use tracing::{debug, error, info, warn};

use crate::multivu::Supervisor;

/// Default attempt count per call site.
pub const DEFAULT_TRIES: u32 = 2;
/// Default wait between attempts.
pub const DEFAULT_WAIT_SECS: u64 = 15;

/// A result carrying its own error flag.
///
/// Native calls report failure through a flag in their output rather than
/// by failing outright; the retry loop treats a set flag like an `Err`.
pub trait ErrorFlag {
    fn error_flag(&self) -> bool;
}

impl ErrorFlag for bool {
    fn error_flag(&self) -> bool {
        *self
    }
}

impl<A> ErrorFlag for (bool, A) {
    fn error_flag(&self) -> bool {
        self.0
    }
}

impl<A, B> ErrorFlag for (bool, A, B) {
    fn error_flag(&self) -> bool {
        self.0
    }
}

/// How many times to attempt a call and how long to wait after each failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub tries: u32,
    pub wait: Duration,
}

impl RetryPolicy {
    pub fn new(tries: u32, wait: Duration) -> Self {
        Self { tries, wait }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TRIES, Duration::from_secs(DEFAULT_WAIT_SECS))
    }
}

/// Run `attempt` until it succeeds or `policy.tries` attempts are used up.
///
/// An attempt fails when it returns `Err` or a value whose error flag is
/// set. After every failed attempt, including the last, the supervisor is
/// asked whether the control application is running; it is launched if
/// not, and the loop then pauses for `policy.wait`.
///
/// Returns the first successful value, or `default` once attempts run out.
/// With `tries == 0` the operation is never called.
pub fn retry_with_recovery<T, E, F, S>(
    policy: &RetryPolicy,
    supervisor: &S,
    operation: &str,
    default: T,
    mut attempt: F,
) -> T
where
    T: ErrorFlag,
    E: Display,
    F: FnMut() -> Result<T, E>,
    S: Supervisor + ?Sized,
{
    let mut delay = Constant::new(policy.wait);
    let mut remaining = policy.tries;

    while remaining > 0 {
        match attempt() {
            Ok(value) if !value.error_flag() => return value,
            Ok(_) => debug!(operation, "Error flag set by instrument call"),
            Err(e) => warn!(operation, error = %e, "Exception in instrument call"),
        }

        remaining -= 1;
        recover(supervisor);

        if let Some(wait) = delay.next_backoff() {
            debug!(operation, wait_secs = wait.as_secs_f64(), remaining, "Waiting before retry");
            supervisor.pause(wait);
        }
    }

    warn!(operation, tries = policy.tries, "Ran out of retries, returning default");
    default
}

/// Make sure the control application is running, starting it if needed.
fn recover<S: Supervisor + ?Sized>(supervisor: &S) {
    if supervisor.is_running() {
        debug!("MultiVu already running");
        return;
    }

    info!("MultiVu not running, restarting it now");
    if let Err(e) = supervisor.launch() {
        error!(error = %e, "Could not restart MultiVu");
    }
}
