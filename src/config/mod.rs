//! Connection-line parsing and environment configuration.
//!
//! A connection line looks like `remote=False;ip=127.0.0.1;insttype=PPMS`.
//! Parsing is strict through [`ConnectionParams::parse`]; building an
//! [`InstrumentConnection`] never fails and falls back to an inert
//! connection when the line is malformed.

pub mod env;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::warn;

use crate::error::ConfigError;

/// Connection line used when none is supplied.
pub const DEFAULT_CONNECTION_LINE: &str = "remote=False;ip=127.0.0.1;insttype=PPMS";

static CONNECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"remote=(?P<rem>True|False);ip=(?P<ip>\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3});insttype=(?P<insttype>PPMS|VersaLab|DynaCool|SVSM)",
    )
    .expect("connection pattern is a valid regex")
});

/// Instrument models sharing the MultiVu control protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrumentType {
    Ppms,
    VersaLab,
    DynaCool,
    Svsm,
}

impl InstrumentType {
    /// All instrument types, in code order.
    pub const ALL: [InstrumentType; 4] = [
        InstrumentType::Ppms,
        InstrumentType::VersaLab,
        InstrumentType::DynaCool,
        InstrumentType::Svsm,
    ];

    /// Integer code passed to the native library.
    pub fn code(self) -> i32 {
        match self {
            InstrumentType::Ppms => 0,
            InstrumentType::VersaLab => 1,
            InstrumentType::DynaCool => 2,
            InstrumentType::Svsm => 3,
        }
    }

    /// Name as it appears in a connection line.
    pub fn as_str(self) -> &'static str {
        match self {
            InstrumentType::Ppms => "PPMS",
            InstrumentType::VersaLab => "VersaLab",
            InstrumentType::DynaCool => "DynaCool",
            InstrumentType::Svsm => "SVSM",
        }
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownInstrumentType(s.to_string()))
    }
}

/// Parameters every native call is made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// IPv4 address of the MultiVu host, kept exactly as written.
    pub address: String,
    /// Route commands through a network-attached MultiVu.
    pub remote: bool,
    pub instrument: InstrumentType,
}

impl ConnectionParams {
    /// Parse a connection line.
    ///
    /// The pattern is searched for anywhere in `line`, so surrounding text
    /// is tolerated.
    pub fn parse(line: &str) -> Result<Self, ConfigError> {
        let caps = CONNECTION_PATTERN
            .captures(line)
            .ok_or_else(|| ConfigError::PatternMismatch(line.to_string()))?;

        Ok(Self {
            address: caps["ip"].to_string(),
            remote: &caps["rem"] == "True",
            instrument: caps["insttype"].parse()?,
        })
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            remote: false,
            instrument: InstrumentType::Ppms,
        }
    }
}

impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remote = if self.remote { "True" } else { "False" };
        write!(
            f,
            "remote={};ip={};insttype={}",
            remote, self.address, self.instrument
        )
    }
}

/// A connection to one instrument, possibly inert.
///
/// An inert connection results from a malformed connection line. Reads made
/// through it return the unknown sentinel without touching the instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentConnection {
    params: Option<ConnectionParams>,
}

impl InstrumentConnection {
    /// Build a connection from a connection line, logging a warning and
    /// returning an inert connection if the line does not match.
    pub fn from_line(line: &str) -> Self {
        match ConnectionParams::parse(line) {
            Ok(params) => Self::new(params),
            Err(e) => {
                warn!(
                    error = %e,
                    expected = DEFAULT_CONNECTION_LINE,
                    "Invalid connection line; instrument left uninitialized"
                );
                Self::inert()
            }
        }
    }

    pub fn new(params: ConnectionParams) -> Self {
        Self {
            params: Some(params),
        }
    }

    pub fn inert() -> Self {
        Self { params: None }
    }

    pub fn params(&self) -> Option<&ConnectionParams> {
        self.params.as_ref()
    }

    pub fn is_inert(&self) -> bool {
        self.params.is_none()
    }
}

impl Default for InstrumentConnection {
    fn default() -> Self {
        Self::new(ConnectionParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_line() {
        let params = ConnectionParams::parse(DEFAULT_CONNECTION_LINE).unwrap();
        assert_eq!(params, ConnectionParams::default());
    }

    #[test]
    fn test_parse_remote_dynacool() {
        let params =
            ConnectionParams::parse("remote=True;ip=192.168.10.42;insttype=DynaCool").unwrap();
        assert_eq!(params.address, "192.168.10.42");
        assert!(params.remote);
        assert_eq!(params.instrument, InstrumentType::DynaCool);
        assert_eq!(params.instrument.code(), 2);
    }

    #[test]
    fn test_parse_tolerates_surrounding_text() {
        let params =
            ConnectionParams::parse("PPMS: remote=False;ip=10.0.0.7;insttype=SVSM # lab 3")
                .unwrap();
        assert_eq!(params.address, "10.0.0.7");
        assert_eq!(params.instrument, InstrumentType::Svsm);
    }

    #[test]
    fn test_parse_rejects_lowercase_bool() {
        let result = ConnectionParams::parse("remote=false;ip=127.0.0.1;insttype=PPMS");
        assert!(matches!(result, Err(ConfigError::PatternMismatch(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_instrument() {
        let result = ConnectionParams::parse("remote=False;ip=127.0.0.1;insttype=MPMS");
        assert!(matches!(result, Err(ConfigError::PatternMismatch(_))));
    }

    #[test]
    fn test_instrument_type_codes() {
        let codes: Vec<i32> = InstrumentType::ALL.iter().map(|t| t.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_instrument_type_from_str() {
        assert_eq!("VersaLab".parse::<InstrumentType>().unwrap(), InstrumentType::VersaLab);
        assert!(matches!(
            "versalab".parse::<InstrumentType>(),
            Err(ConfigError::UnknownInstrumentType(_))
        ));
    }

    #[test]
    fn test_display_matches_line_format() {
        let params = ConnectionParams {
            address: "172.16.0.3".to_string(),
            remote: true,
            instrument: InstrumentType::VersaLab,
        };
        let line = params.to_string();
        assert_eq!(line, "remote=True;ip=172.16.0.3;insttype=VersaLab");
        assert_eq!(ConnectionParams::parse(&line).unwrap(), params);
    }

    #[test]
    fn test_malformed_line_gives_inert_connection() {
        let conn = InstrumentConnection::from_line("ip=127.0.0.1");
        assert!(conn.is_inert());
        assert!(conn.params().is_none());
    }

    #[test]
    fn test_valid_line_gives_live_connection() {
        let conn = InstrumentConnection::from_line(DEFAULT_CONNECTION_LINE);
        assert!(!conn.is_inert());
        assert_eq!(conn.params(), Some(&ConnectionParams::default()));
    }
}
