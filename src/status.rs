//! Vendor status codes for temperature and magnet state.

use std::fmt;

/// Implemented by the status enumerations so measurements can be generic
/// over which table they were translated through.
pub trait StatusCode: Copy + fmt::Debug + fmt::Display + PartialEq {
    /// Translate a raw vendor code.
    fn from_code(code: i32) -> Self;
    /// Raw vendor code.
    fn code(self) -> i32;
    /// Label as documented by the vendor.
    fn label(self) -> &'static str;
    /// Status reported when the instrument could not be read.
    fn unknown() -> Self;
}

macro_rules! status_table {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $code:literal => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            /// A code missing from the vendor table.
            Unrecognized(i32),
        }

        impl $name {
            /// Every documented status, in code order.
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];
        }

        impl StatusCode for $name {
            fn from_code(code: i32) -> Self {
                match code {
                    $($code => $name::$variant,)+
                    other => $name::Unrecognized(other),
                }
            }

            fn code(self) -> i32 {
                match self {
                    $($name::$variant => $code,)+
                    $name::Unrecognized(code) => code,
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unrecognized(_) => "Unrecognized",
                }
            }

            fn unknown() -> Self {
                $name::from_code(0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $name::Unrecognized(code) => write!(f, "Unrecognized({})", code),
                    known => f.write_str(known.label()),
                }
            }
        }
    };
}

status_table! {
    /// Temperature controller status.
    TemperatureStatus {
        Unknown = 0 => "TemperatureUnknown",
        Stable = 1 => "Stable",
        Tracking = 2 => "Tracking",
        Near = 5 => "Near",
        Chasing = 6 => "Chasing",
        Filling = 7 => "Filling",
        Standby = 10 => "Standby",
        Disabled = 13 => "Disabled",
        ImpedanceNotFunction = 14 => "ImpedanceNotFunction",
        TempFailure = 15 => "TempFailure",
    }
}

status_table! {
    /// Magnet (field) status.
    FieldStatus {
        Unknown = 0 => "MagnetUnknown",
        StablePersistent = 1 => "StablePersistent",
        WarmingSwitch = 2 => "WarmingSwitch",
        CoolingSwitch = 3 => "CoolingSwitch",
        StableDriven = 4 => "StableDriven",
        Iterating = 5 => "Iterating",
        Charging = 6 => "Charging",
        Discharging = 7 => "Discharging",
        CurrentError = 8 => "CurrentError",
        MagnetFailure = 15 => "MagnetFailure",
    }
}
