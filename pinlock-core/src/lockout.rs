// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Lockout countdown.
//!
//! The timer knows nothing about wall time: the owner calls [`LockoutTimer::tick`] once per
//! second. The control loop derives those ticks from deadlines, so the rest of the firmware keeps
//! running while input stays suspended.

/// Result of one countdown tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// Seconds still to go
    Remaining(u16),
    /// The countdown just reached zero
    Expired,
}

#[derive(Clone, Debug, Default)]
pub struct LockoutTimer {
    remaining: Option<u16>,
}

impl LockoutTimer {
    pub const fn new() -> Self {
        Self { remaining: None }
    }

    /// Start a countdown of `secs` ticks.
    pub fn enter(&mut self, secs: u16) {
        self.remaining = Some(secs);
    }

    /// Advance by one second. Returns `None` when no countdown is running.
    pub fn tick(&mut self) -> Option<Tick> {
        let left = self.remaining?.saturating_sub(1);
        if left == 0 {
            self.remaining = None;
            Some(Tick::Expired)
        } else {
            self.remaining = Some(left);
            Some(Tick::Remaining(left))
        }
    }

    #[inline]
    pub fn remaining(&self) -> Option<u16> {
        self.remaining
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_does_not_tick() {
        let mut timer = LockoutTimer::new();
        assert!(!timer.is_active());
        assert_eq!(timer.tick(), None);
    }

    #[test]
    fn counts_down_to_expiry_in_exactly_n_ticks() {
        let mut timer = LockoutTimer::new();
        timer.enter(3);
        assert_eq!(timer.remaining(), Some(3));
        assert_eq!(timer.tick(), Some(Tick::Remaining(2)));
        assert_eq!(timer.tick(), Some(Tick::Remaining(1)));
        assert_eq!(timer.tick(), Some(Tick::Expired));
        assert!(!timer.is_active());
        assert_eq!(timer.tick(), None);
    }

    #[test]
    fn zero_length_lockout_expires_on_first_tick() {
        let mut timer = LockoutTimer::new();
        timer.enter(0);
        assert!(timer.is_active());
        assert_eq!(timer.tick(), Some(Tick::Expired));
    }
}
