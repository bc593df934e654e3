//! Error types for spinand-core
//!
//! This module provides a no_std compatible error type. Every variant has a
//! stable name and a legacy integer code, for callers that bridge the driver
//! to interfaces which report failures as negative integers.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Session errors
    /// Operation issued before the session was initialized
    NotInitialized,
    /// `initialize()` called on a live session
    AlreadyInitialized,

    // Chip errors
    /// Identification bytes do not match any known device
    UnknownDevice {
        /// Byte found in the manufacturer position of the matched tier
        /// (or the first response byte if no vendor matched)
        manufacturer: u8,
        /// Byte found in the device position
        device: u8,
    },
    /// Device is read-only (reserved)
    ReadOnly,

    // Operation errors
    /// Uncorrectable ECC error reported after loading a page
    BadBlock,
    /// Offset plus length exceeds the page size
    DataTooBig,
    /// Row address lies beyond the last page of the device
    AddressOutOfRange,
    /// Device reported an erase failure
    EraseFailure,
    /// Device reported a program failure
    ProgramFailure,

    // Link errors
    /// The transport reported a failed transfer
    TransportFailure,
    /// The device did not leave the busy state within the poll bound
    Timeout,
}

impl Error {
    /// Legacy integer code for this error (always negative)
    pub const fn code(&self) -> i32 {
        match self {
            Self::NotInitialized => -1,
            Self::AlreadyInitialized => -2,
            Self::UnknownDevice { .. } => -3,
            Self::ReadOnly => -4,
            Self::BadBlock => -5,
            Self::DataTooBig => -6,
            Self::EraseFailure => -7,
            Self::ProgramFailure => -8,
            Self::Timeout => -9,
            Self::AddressOutOfRange => -10,
            Self::TransportFailure => -100,
        }
    }

    /// Stable identifier for this error kind
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NotInitialized",
            Self::AlreadyInitialized => "AlreadyInitialized",
            Self::UnknownDevice { .. } => "UnknownDevice",
            Self::ReadOnly => "ReadOnly",
            Self::BadBlock => "BadBlock",
            Self::DataTooBig => "DataTooBig",
            Self::AddressOutOfRange => "AddressOutOfRange",
            Self::EraseFailure => "EraseFailure",
            Self::ProgramFailure => "ProgramFailure",
            Self::TransportFailure => "TransportFailure",
            Self::Timeout => "Timeout",
        }
    }

    /// Map a legacy integer code back to an error kind
    ///
    /// `UnknownDevice` comes back with zeroed identification bytes since the
    /// code does not carry them. Non-negative and unassigned codes give `None`.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::NotInitialized),
            -2 => Some(Self::AlreadyInitialized),
            -3 => Some(Self::UnknownDevice {
                manufacturer: 0,
                device: 0,
            }),
            -4 => Some(Self::ReadOnly),
            -5 => Some(Self::BadBlock),
            -6 => Some(Self::DataTooBig),
            -7 => Some(Self::EraseFailure),
            -8 => Some(Self::ProgramFailure),
            -9 => Some(Self::Timeout),
            -10 => Some(Self::AddressOutOfRange),
            -100 => Some(Self::TransportFailure),
            _ => None,
        }
    }
}

/// Human-readable name for a legacy integer result
///
/// Non-negative values are byte counts or success and map to `"Ok"`.
pub fn error_name(code: i32) -> &'static str {
    if code >= 0 {
        return "Ok";
    }
    match Error::from_code(code) {
        Some(err) => err.name(),
        None => "UnknownError",
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "NAND session not initialized"),
            Self::AlreadyInitialized => write!(f, "NAND session already initialized"),
            Self::UnknownDevice {
                manufacturer,
                device,
            } => write!(
                f,
                "unsupported NAND device (ID {:02X} {:02X})",
                manufacturer, device
            ),
            Self::ReadOnly => write!(f, "device is read-only"),
            Self::BadBlock => write!(f, "uncorrectable ECC error (bad block)"),
            Self::DataTooBig => write!(f, "data exceeds page bounds"),
            Self::AddressOutOfRange => write!(f, "row address outside the device"),
            Self::EraseFailure => write!(f, "block erase failed"),
            Self::ProgramFailure => write!(f, "page program failed"),
            Self::TransportFailure => write!(f, "SPI transfer failed"),
            Self::Timeout => write!(f, "device busy timeout"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_to_names() {
        assert_eq!(error_name(0), "Ok");
        assert_eq!(error_name(2048), "Ok");
        assert_eq!(error_name(-1), "NotInitialized");
        assert_eq!(error_name(-5), "BadBlock");
        assert_eq!(error_name(-7), "EraseFailure");
        assert_eq!(error_name(-10), "AddressOutOfRange");
        assert_eq!(error_name(-100), "TransportFailure");
        assert_eq!(error_name(-42), "UnknownError");
    }

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            Error::NotInitialized,
            Error::AlreadyInitialized,
            Error::UnknownDevice {
                manufacturer: 0x12,
                device: 0x34,
            },
            Error::ReadOnly,
            Error::BadBlock,
            Error::DataTooBig,
            Error::AddressOutOfRange,
            Error::EraseFailure,
            Error::ProgramFailure,
            Error::TransportFailure,
            Error::Timeout,
        ];
        for (i, a) in all.iter().enumerate() {
            assert!(a.code() < 0);
            assert_eq!(Error::from_code(a.code()).map(|e| e.name()), Some(a.name()));
            for b in &all[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }
}
