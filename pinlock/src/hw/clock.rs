// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Millisecond monotonic clock on SysTick.
//!
//! The binary installs the `SysTick` exception handler and calls [`tick`] from it.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::{syst::SystClkSource, SYST};
use pinlock_core::Instant;

static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Advance the clock by one millisecond. Call only from the SysTick handler.
#[inline]
pub fn tick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

pub struct Clock {
    _syst: SYST,
}

impl Clock {
    /// Configure SysTick for a 1 kHz interrupt off the core clock.
    pub fn start(mut syst: SYST, sysclk_hz: u32) -> Self {
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(sysclk_hz / 1_000 - 1);
        syst.clear_current();
        syst.enable_counter();
        syst.enable_interrupt();
        Self { _syst: syst }
    }

    /// Milliseconds since [`Clock::start`]. Wraps after ~49 days.
    #[inline]
    pub fn now(&self) -> Instant {
        Instant::from_ticks(MILLIS.load(Ordering::Relaxed))
    }
}
