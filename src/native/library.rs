//! Dynamic loading of `MyPPMSDLL`.
//!
//! Both exported read calls share one C prototype:
//!
//! ```c
//! void __cdecl PPMSGetTemp(char IPAddress[], LVBoolean Remote,
//!     int32_t InstrumentType, double *Temperature, int32_t *TemperatureStatus,
//!     LVBoolean *Errorstatus, int32_t *Errorcode);
//! ```
//!
//! `LVBoolean` is LabVIEW's one-byte boolean.

use std::ffi::{CString, c_char};
use std::path::{Path, PathBuf};

use libloading::Library;
use tracing::debug;

use crate::config::ConnectionParams;
use crate::error::NativeError;

use super::{PpmsApi, RawReading};

type LvBoolean = u8;

type ReadFn = unsafe extern "C" fn(
    ip_address: *const c_char,
    remote: LvBoolean,
    instrument_type: i32,
    value: *mut f64,
    status: *mut i32,
    error_status: *mut LvBoolean,
    error_code: *mut i32,
);

const GET_TEMP_SYMBOL: &str = "PPMSGetTemp";
const GET_FIELD_SYMBOL: &str = "PPMSGetField";

/// The loaded vendor library with its read entry points resolved.
pub struct PpmsLibrary {
    get_temp: ReadFn,
    get_field: ReadFn,
    path: PathBuf,
    // Keeps the function pointers above valid.
    _library: Library,
}

impl PpmsLibrary {
    /// Load the library at `path` and resolve both read calls.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NativeError> {
        let path = path.as_ref().to_path_buf();

        // SAFETY: loading runs the library's initializers; MyPPMSDLL is the
        // vendor-supplied runtime and has no initialization preconditions.
        let library = unsafe { Library::new(&path) }.map_err(|source| NativeError::LoadFailed {
            path: path.clone(),
            source,
        })?;

        let get_temp = resolve(&library, GET_TEMP_SYMBOL)?;
        let get_field = resolve(&library, GET_FIELD_SYMBOL)?;
        debug!(path = %path.display(), "Loaded native PPMS library");

        Ok(Self {
            get_temp,
            get_field,
            path,
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self, func: ReadFn, params: &ConnectionParams) -> Result<RawReading, NativeError> {
        let address = CString::new(params.address.as_str())
            .map_err(|_| NativeError::InvalidAddress(params.address.clone()))?;

        let mut value = 0.0_f64;
        let mut status = 0_i32;
        let mut error_status: LvBoolean = 0;
        let mut error_code = 0_i32;

        // SAFETY: `func` matches the exported prototype, `address` is
        // NUL-terminated and outlives the call, and every out-pointer refers
        // to a live local of the declared type.
        unsafe {
            func(
                address.as_ptr(),
                LvBoolean::from(params.remote),
                params.instrument.code(),
                &mut value,
                &mut status,
                &mut error_status,
                &mut error_code,
            );
        }

        Ok(RawReading::new(value, status, error_status != 0, error_code))
    }
}

impl PpmsApi for PpmsLibrary {
    fn get_temperature(&self, params: &ConnectionParams) -> Result<RawReading, NativeError> {
        self.read(self.get_temp, params)
    }

    fn get_field(&self, params: &ConnectionParams) -> Result<RawReading, NativeError> {
        self.read(self.get_field, params)
    }
}

fn resolve(library: &Library, symbol: &'static str) -> Result<ReadFn, NativeError> {
    // SAFETY: both symbols are declared with the `ReadFn` prototype.
    unsafe { library.get::<ReadFn>(symbol.as_bytes()) }
        .map(|sym| *sym)
        .map_err(|source| NativeError::MissingSymbol { symbol, source })
}
