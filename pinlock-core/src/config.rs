// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compiled-in lock parameters.

use crate::time::Duration;

/// Digits in a PIN.
pub const PASSWORD_LENGTH: usize = 4;

/// Size of the persisted PIN record: the digits plus a NUL terminator.
pub const RECORD_LEN: usize = PASSWORD_LENGTH + 1;

/// Logical address of the PIN record in non-volatile storage.
pub const PIN_RECORD_ADDR: u32 = 0x00;

/// PIN written on first boot.
pub const DEFAULT_PIN: [u8; PASSWORD_LENGTH] = *b"1234";

/// Consecutive wrong PINs that trigger a lockout.
pub const MAX_ATTEMPTS: u8 = 3;

/// Lockout length in seconds.
pub const LOCKOUT_SECS: u16 = 30;

/// How long transient messages (and the unlock pulse) stay up, in seconds.
pub const MESSAGE_SECS: u32 = 2;

/// Runtime view of the lock parameters. `Config::default()` matches the constants above.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Wrong attempts before lockout (at least 1)
    pub max_attempts: u8,
    /// Lockout countdown in seconds
    pub lockout_secs: u16,
    /// Message / unlock pulse duration
    pub message: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            lockout_secs: LOCKOUT_SECS,
            message: Duration::secs(MESSAGE_SECS),
        }
    }
}

impl Config {
    /// Set the number of wrong attempts allowed before lockout.
    pub fn with_max_attempts(mut self, attempts: u8) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the lockout countdown length.
    pub fn with_lockout_secs(mut self, secs: u16) -> Self {
        self.lockout_secs = secs;
        self
    }

    /// Set how long messages are held on screen.
    pub fn with_message_duration(mut self, message: Duration) -> Self {
        self.message = message;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.lockout_secs, 30);
        assert_eq!(cfg.message.to_millis(), 2_000);
    }

    #[test]
    fn max_attempts_never_zero() {
        assert_eq!(Config::default().with_max_attempts(0).max_attempts, 1);
    }
}
