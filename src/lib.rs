//! qdppms - Host-side binding to the Quantum Design PPMS native library.
//!
//! # Overview
//!
//! qdppms reads temperature and magnetic field from PPMS, VersaLab, DynaCool
//! and SVSM instruments through the vendor's `MyPPMSDLL` library. Failed
//! reads are retried with a fixed delay, restarting the MultiVu control
//! application between attempts when it is not running. When every attempt
//! fails, the read returns an "unknown" sentinel instead of an error.

pub mod client;
pub mod config;
pub mod error;
pub mod multivu;
pub mod native;
pub mod retry;
pub mod status;

// Re-export commonly used types
pub use client::{FieldReading, InstrumentClient, Measurement, TemperatureReading, UNKNOWN_VALUE};
pub use config::{ConnectionParams, InstrumentConnection, InstrumentType};
pub use error::{ConfigError, LaunchError, NativeError};
pub use multivu::{MultiVu, Supervisor};
pub use native::{PpmsApi, PpmsLibrary, RawReading};
pub use retry::{ErrorFlag, RetryPolicy, retry_with_recovery};
pub use status::{FieldStatus, StatusCode, TemperatureStatus};
