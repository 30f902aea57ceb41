//! Unlock indicator LED.

use embedded_hal::digital::v2::OutputPin;

use crate::session::LockStatus;

/// Whether the LED is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// LED that is lit while the lock is open. Pin errors are ignored; the LED is best-effort.
pub struct Indicator<PIN: OutputPin> {
    pin: PIN,
    active: ActiveLevel,
    lit: bool,
}

impl<PIN: OutputPin> Indicator<PIN> {
    /// Wrap `pin`, starting dark.
    pub fn new(pin: PIN, active: ActiveLevel) -> Self {
        let mut indicator = Self {
            pin,
            active,
            lit: true,
        };
        indicator.set(false);
        indicator
    }

    pub fn active_high(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn active_low(pin: PIN) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    pub fn set(&mut self, lit: bool) {
        let high = lit == (self.active == ActiveLevel::High);
        if high {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
        self.lit = lit;
    }

    /// Light the LED exactly when `status` is unlocked.
    #[inline]
    pub fn show(&mut self, status: LockStatus) {
        self.set(status == LockStatus::Unlocked);
    }

    #[inline]
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn free(self) -> PIN {
        self.pin
    }
}
