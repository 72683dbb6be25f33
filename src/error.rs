//! Error types for qdppms modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from parsing connection lines and environment overrides.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Connection line '{0}' must follow the format remote=False;ip=127.0.0.1;insttype=PPMS"
    )]
    PatternMismatch(String),

    #[error("Unknown instrument type '{0}' (expected PPMS, VersaLab, DynaCool or SVSM)")]
    UnknownInstrumentType(String),

    #[error("Invalid value '{value}' for {var}")]
    InvalidEnvValue { var: &'static str, value: String },
}

/// Errors raised at the native library boundary.
#[derive(Error, Debug)]
pub enum NativeError {
    #[error("Failed to load native library {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Native library does not export {symbol}: {source}")]
    MissingSymbol {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },

    #[error("Instrument address '{0}' contains an interior NUL byte")]
    InvalidAddress(String),
}

/// Errors from supervising the MultiVu control application.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Failed to spawn {path}: {source}")]
    SpawnFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
