use std::time::Duration;

use crate::constants::{CLOCK_SPEED, TIMER_PERIOD_DENOMINATOR, TIMER_PERIOD_NUMERATOR};

/// Interpreter behaviors that differ between historical implementations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quirks {
    /// 8XY6/8XYE shift Vy and store the result in both Vx and Vy.
    /// When unset, Vx is shifted in place.
    pub shift_source_y: bool,
    /// 8XY5 falls back to `Vy - Vx` instead of wrapping when Vx <= Vy.
    pub absolute_difference_subtract: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            shift_source_y: true,
            absolute_difference_subtract: false,
        }
    }
}

/// # Config
/// - `cycle_length` the real time quantum after which one more instruction executes
/// - `quirks` compatibility switches for individual instructions
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub cycle_length: Duration,
    pub quirks: Quirks,
}

impl Config {
    pub fn with_cycle_length(cycle_length: Duration) -> Self {
        Config {
            cycle_length,
            ..Config::default()
        }
    }

    pub fn with_quirks(self, quirks: Quirks) -> Self {
        Config { quirks, ..self }
    }

    /// Real time between two timer decrements: 8.33 instruction cycles.
    pub fn timer_period(&self) -> Duration {
        let nanos =
            self.cycle_length.as_nanos() * TIMER_PERIOD_NUMERATOR / TIMER_PERIOD_DENOMINATOR;
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cycle_length: Duration::from_micros(CLOCK_SPEED),
            quirks: Quirks::default(),
        }
    }
}
