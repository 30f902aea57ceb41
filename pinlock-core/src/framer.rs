// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-length digit entry.

use crate::config::PASSWORD_LENGTH;
use crate::credential::Pin;

/// Result of pushing one character into the framer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameState {
    /// Accepted, more digits needed
    Incomplete,
    /// Accepted, the frame now holds a full PIN
    Complete,
    /// Not a digit, or the frame is already full. Nothing changed.
    Rejected,
}

/// Accumulates digits until [`PASSWORD_LENGTH`] have been entered.
#[derive(Clone, Debug, Default)]
pub struct InputFramer {
    buf: [u8; PASSWORD_LENGTH],
    len: usize,
}

impl InputFramer {
    pub const fn new() -> Self {
        Self {
            buf: [0; PASSWORD_LENGTH],
            len: 0,
        }
    }

    pub fn push(&mut self, ch: u8) -> FrameState {
        if !ch.is_ascii_digit() || self.len == PASSWORD_LENGTH {
            return FrameState::Rejected;
        }

        self.buf[self.len] = ch;
        self.len += 1;

        if self.len == PASSWORD_LENGTH {
            FrameState::Complete
        } else {
            FrameState::Incomplete
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Digits entered so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.len == PASSWORD_LENGTH
    }

    /// The entered PIN, once the frame is complete.
    pub fn frame(&self) -> Option<Pin> {
        if self.is_complete() {
            Pin::new(self.buf)
        } else {
            None
        }
    }
}
