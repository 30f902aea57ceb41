//! Millisecond time base shared with the firmware tick counter.

/// A point on the 1 kHz monotonic clock. Wraps after ~49 days; comparisons handle the wrap.
pub type Instant = fugit::TimerInstantU32<1000>;

/// A span on the 1 kHz clock.
pub type Duration = fugit::MillisDurationU32;
