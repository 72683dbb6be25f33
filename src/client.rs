//! Temperature and field reads with MultiVu recovery.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{ConnectionParams, InstrumentConnection};
use crate::error::NativeError;
use crate::multivu::Supervisor;
use crate::native::{PpmsApi, RawReading};
use crate::retry::{ErrorFlag, RetryPolicy, retry_with_recovery};
use crate::status::{FieldStatus, StatusCode, TemperatureStatus};

/// Value reported when a read could not be completed.
pub const UNKNOWN_VALUE: f64 = 1e99;

/// One reading: error flag, value, and translated status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement<S> {
    pub error: bool,
    pub value: f64,
    pub status: S,
}

pub type TemperatureReading = Measurement<TemperatureStatus>;
pub type FieldReading = Measurement<FieldStatus>;

impl<S: StatusCode> Measurement<S> {
    /// Translate a raw native reading through the status table.
    pub fn from_raw(raw: RawReading) -> Self {
        Self {
            error: raw.error,
            value: raw.value,
            status: S::from_code(raw.status_code),
        }
    }

    /// The placeholder returned once retries are exhausted.
    pub fn unknown() -> Self {
        Self {
            error: true,
            value: UNKNOWN_VALUE,
            status: S::unknown(),
        }
    }

    /// Whether this is the placeholder rather than an instrument reading.
    pub fn is_sentinel(&self) -> bool {
        self.error && self.value == UNKNOWN_VALUE && self.status == S::unknown()
    }

    /// The `(error, value, label)` triple.
    pub fn as_tuple(&self) -> (bool, f64, &'static str) {
        (self.error, self.value, self.status.label())
    }
}

impl<S> ErrorFlag for Measurement<S> {
    fn error_flag(&self) -> bool {
        self.error
    }
}

/// Serializable view of a [`Measurement`].
#[derive(Debug, Serialize)]
pub struct MeasurementReport {
    pub quantity: &'static str,
    pub unit: &'static str,
    pub error: bool,
    pub value: f64,
    pub status: String,
    pub status_code: i32,
    pub sentinel: bool,
}

impl MeasurementReport {
    pub fn new<S: StatusCode>(
        quantity: &'static str,
        unit: &'static str,
        measurement: &Measurement<S>,
    ) -> Self {
        Self {
            quantity,
            unit,
            error: measurement.error,
            value: measurement.value,
            status: measurement.status.to_string(),
            status_code: measurement.status.code(),
            sentinel: measurement.is_sentinel(),
        }
    }
}

/// Reads temperature and field from one instrument.
pub struct InstrumentClient<A, S> {
    connection: InstrumentConnection,
    api: A,
    supervisor: S,
    temperature_policy: RetryPolicy,
    field_policy: RetryPolicy,
}

impl<A: PpmsApi, S: Supervisor> InstrumentClient<A, S> {
    /// Client using the default retry policy for both reads.
    pub fn new(connection: InstrumentConnection, api: A, supervisor: S) -> Self {
        Self {
            connection,
            api,
            supervisor,
            temperature_policy: RetryPolicy::default(),
            field_policy: RetryPolicy::default(),
        }
    }

    pub fn with_temperature_policy(mut self, policy: RetryPolicy) -> Self {
        self.temperature_policy = policy;
        self
    }

    pub fn with_field_policy(mut self, policy: RetryPolicy) -> Self {
        self.field_policy = policy;
        self
    }

    /// Apply one policy to both reads.
    pub fn with_policy(self, policy: RetryPolicy) -> Self {
        self.with_temperature_policy(policy).with_field_policy(policy)
    }

    pub fn connection(&self) -> &InstrumentConnection {
        &self.connection
    }

    pub fn supervisor(&self) -> &S {
        &self.supervisor
    }

    /// Read the sample temperature in kelvin.
    ///
    /// Returns the unknown sentinel if every attempt fails.
    pub fn get_temperature(&self) -> TemperatureReading {
        self.read("get_temperature", &self.temperature_policy, |api, params| {
            api.get_temperature(params)
        })
    }

    /// Read the magnetic field in oersted.
    ///
    /// Returns the unknown sentinel if every attempt fails.
    pub fn get_field(&self) -> FieldReading {
        self.read("get_field", &self.field_policy, |api, params| api.get_field(params))
    }

    fn read<St, F>(&self, operation: &str, policy: &RetryPolicy, call: F) -> Measurement<St>
    where
        St: StatusCode,
        F: Fn(&A, &ConnectionParams) -> Result<RawReading, NativeError>,
    {
        let Some(params) = self.connection.params() else {
            warn!(operation, "Instrument connection is not initialized");
            return Measurement::unknown();
        };

        let attempt = || -> Result<Measurement<St>, NativeError> {
            let raw = call(&self.api, params)?;
            if raw.error {
                debug!(operation, error_code = raw.error_code, "Native call reported an error");
            }
            Ok(Measurement::from_raw(raw))
        };

        retry_with_recovery(policy, &self.supervisor, operation, Measurement::unknown(), attempt)
    }
}
