// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types surfaced by the core.

use core::fmt;

/// The non-volatile store could not read or write the PIN record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageFault {
    Read,
    Write,
}

impl fmt::Display for StorageFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageFault::Read => f.write_str("PIN record read failed"),
            StorageFault::Write => f.write_str("PIN record write failed"),
        }
    }
}

/// Errors returned from the control loop to the firmware.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Storage(StorageFault),
    /// The serial transport reported a receive or transmit error.
    Transport,
}

impl From<StorageFault> for Error {
    fn from(fault: StorageFault) -> Self {
        Error::Storage(fault)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Storage(fault) => write!(f, "storage: {}", fault),
            Error::Transport => f.write_str("serial transport error"),
        }
    }
}
