use std::time::Duration;

/// An 8-bit countdown driven by real time.
///
/// Elapsed time is accumulated while the counter is nonzero; every `period` of it removes one
/// from the counter. The part of a delta past the period is carried over, so many small deltas
/// add up to the same cadence as one large one. At most one decrement happens per `tick`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timer {
    value: u8,
    elapsed: Duration,
}

impl Timer {
    pub fn new() -> Self {
        Timer {
            value: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Load a new count; the accumulated time restarts with it.
    pub fn set(&mut self, value: u8) {
        self.value = value;
        self.elapsed = Duration::ZERO;
    }

    /// Returns true if the counter was decremented
    pub fn tick(&mut self, delta: Duration, period: Duration) -> bool {
        if self.value == 0 {
            return false;
        }
        self.elapsed += delta;
        if self.elapsed < period {
            return false;
        }
        self.elapsed -= period;
        self.value -= 1;
        if self.value == 0 {
            self.elapsed = Duration::ZERO;
        }
        true
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Gates instruction execution on real time: fires once for every `cycle_length` accumulated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CycleClock {
    elapsed: Duration,
}

impl CycleClock {
    pub fn new() -> Self {
        CycleClock {
            elapsed: Duration::ZERO,
        }
    }

    pub fn accumulate(&mut self, delta: Duration) {
        self.elapsed += delta;
    }

    /// Consumes one cycle if a whole one has accumulated.
    /// Only the fraction of a cycle carries over; whole cycles beyond the one consumed are dropped.
    pub fn fire(&mut self, cycle_length: Duration) -> bool {
        if self.elapsed < cycle_length {
            return false;
        }
        self.elapsed -= cycle_length;
        if self.elapsed >= cycle_length {
            let nanos = self
                .elapsed
                .as_nanos()
                .checked_rem(cycle_length.as_nanos())
                .unwrap_or(0);
            self.elapsed = Duration::from_nanos(u64::try_from(nanos).unwrap_or(0));
        }
        true
    }
}

impl Default for CycleClock {
    fn default() -> Self {
        Self::new()
    }
}
