//! Boundary to the vendor's native PPMS library.

pub mod library;

use crate::config::ConnectionParams;
use crate::error::NativeError;

pub use library::PpmsLibrary;

/// Outputs of one native read call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawReading {
    pub value: f64,
    pub status_code: i32,
    /// Error flag raised by the library or by MultiVu.
    pub error: bool,
    pub error_code: i32,
}

impl RawReading {
    pub fn new(value: f64, status_code: i32, error: bool, error_code: i32) -> Self {
        Self {
            value,
            status_code,
            error,
            error_code,
        }
    }
}

/// Trait for the native read calls.
///
/// This abstraction allows replacing the vendor library in tests.
#[cfg_attr(test, mockall::automock)]
pub trait PpmsApi {
    /// `PPMSGetTemp`: temperature in kelvin.
    fn get_temperature(&self, params: &ConnectionParams) -> Result<RawReading, NativeError>;

    /// `PPMSGetField`: field in oersted.
    fn get_field(&self, params: &ConnectionParams) -> Result<RawReading, NativeError>;
}

impl<A: PpmsApi + ?Sized> PpmsApi for &A {
    fn get_temperature(&self, params: &ConnectionParams) -> Result<RawReading, NativeError> {
        (**self).get_temperature(params)
    }

    fn get_field(&self, params: &ConnectionParams) -> Result<RawReading, NativeError> {
        (**self).get_field(params)
    }
}
