//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use qdppms::{ConnectionParams, LaunchError, NativeError, PpmsApi, RawReading, Supervisor};

/// A supervisor that records every check, launch and pause.
pub struct RecordingSupervisor {
    running: Cell<bool>,
    launch_starts_process: bool,
    pub checks: Cell<u32>,
    pub launches: Cell<u32>,
    pub pauses: RefCell<Vec<Duration>>,
}

impl RecordingSupervisor {
    /// MultiVu already running.
    pub fn running() -> Self {
        Self::with_state(true, false)
    }

    /// MultiVu absent and every launch silently fails to start it.
    pub fn stopped() -> Self {
        Self::with_state(false, false)
    }

    /// MultiVu absent until the first launch.
    pub fn stopped_until_launched() -> Self {
        Self::with_state(false, true)
    }

    fn with_state(running: bool, launch_starts_process: bool) -> Self {
        Self {
            running: Cell::new(running),
            launch_starts_process,
            checks: Cell::new(0),
            launches: Cell::new(0),
            pauses: RefCell::new(Vec::new()),
        }
    }

    pub fn pause_count(&self) -> usize {
        self.pauses.borrow().len()
    }
}

impl Supervisor for RecordingSupervisor {
    fn is_running(&self) -> bool {
        self.checks.set(self.checks.get() + 1);
        self.running.get()
    }

    fn launch(&self) -> Result<(), LaunchError> {
        self.launches.set(self.launches.get() + 1);
        if self.launch_starts_process {
            self.running.set(true);
        }
        Ok(())
    }

    fn pause(&self, wait: Duration) {
        self.pauses.borrow_mut().push(wait);
    }
}

/// One scripted native-call outcome.
pub enum Step {
    Reading(RawReading),
    Fault,
}

impl Step {
    pub fn ok(value: f64, status_code: i32) -> Self {
        Step::Reading(RawReading::new(value, status_code, false, 0))
    }

    pub fn flagged(error_code: i32) -> Self {
        Step::Reading(RawReading::new(0.0, 0, true, error_code))
    }
}

/// A native library stand-in that replays scripted outcomes.
///
/// Temperature and field calls share one script. Once the script runs out
/// every call reports a fault.
pub struct ScriptedApi {
    steps: RefCell<VecDeque<Step>>,
    pub calls: Cell<u32>,
    pub last_params: RefCell<Option<ConnectionParams>>,
}

impl ScriptedApi {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: RefCell::new(steps.into_iter().collect()),
            calls: Cell::new(0),
            last_params: RefCell::new(None),
        }
    }

    fn next(&self, params: &ConnectionParams) -> Result<RawReading, NativeError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_params.borrow_mut() = Some(params.clone());
        match self.steps.borrow_mut().pop_front() {
            Some(Step::Reading(raw)) => Ok(raw),
            Some(Step::Fault) | None => Err(NativeError::InvalidAddress(params.address.clone())),
        }
    }
}

impl PpmsApi for ScriptedApi {
    fn get_temperature(&self, params: &ConnectionParams) -> Result<RawReading, NativeError> {
        self.next(params)
    }

    fn get_field(&self, params: &ConnectionParams) -> Result<RawReading, NativeError> {
        self.next(params)
    }
}
