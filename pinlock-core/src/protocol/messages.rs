// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Single-byte command protocol spoken over the serial channel.
//!
//! Inbound, every byte is one event: an ASCII digit or one of the command letters below. Anything
//! else is ignored. Outbound, the lock answers each completed transition with exactly one status
//! byte. There is no framing, acknowledgement or retransmission.

// Command bytes
pub const CMD_ENTER: u8 = b'E';
pub const CMD_CANCEL: u8 = b'C';
pub const CMD_NEW_PIN: u8 = b'N';

// Status bytes
pub const STATUS_UNLOCKED: u8 = b'U';
pub const STATUS_REJECTED: u8 = b'L';
pub const STATUS_PIN_SET: u8 = b'S';
pub const STATUS_WRONG_OLD: u8 = b'W';

/// Command letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Submit the entered PIN for authentication
    Enter,
    /// Discard the entry and leave any PIN-change flow
    Cancel,
    /// Start the PIN-change flow
    NewPin,
}

/// A classified inbound byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Input {
    /// ASCII digit, kept as the raw character
    Digit(u8),
    Command(Command),
    Other,
}

/// Status codes sent back to the controlling side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Unlocked,
    Rejected,
    PinSet,
    WrongOldPin,
}

impl Status {
    #[inline]
    pub fn as_byte(self) -> u8 {
        match self {
            Status::Unlocked => STATUS_UNLOCKED,
            Status::Rejected => STATUS_REJECTED,
            Status::PinSet => STATUS_PIN_SET,
            Status::WrongOldPin => STATUS_WRONG_OLD,
        }
    }
}
