//! Wait-time policies applied between task invocations

use rand::Rng;
use std::time::Duration;

use super::types::LoadError;

/// Delay a simulated user observes after each task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitTime {
    /// Run the next task immediately
    #[default]
    None,
    /// Always wait the same amount of time
    Constant(Duration),
    /// Wait a uniformly random time between the two bounds, in either order
    Between { min: Duration, max: Duration },
}

impl WaitTime {
    pub fn constant(delay: Duration) -> Self {
        WaitTime::Constant(delay)
    }

    /// Uniform wait between `min` and `max`, inclusive
    pub fn between(min: Duration, max: Duration) -> Result<Self, LoadError> {
        if min > max {
            return Err(LoadError::InvalidWaitRange { min, max });
        }
        if min == max {
            return Ok(WaitTime::Constant(min));
        }
        Ok(WaitTime::Between { min, max })
    }

    /// Draw the next delay
    pub fn next_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        match *self {
            WaitTime::None => Duration::ZERO,
            WaitTime::Constant(delay) => delay,
            WaitTime::Between { min, max } => {
                let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
                let lo = lo.as_micros() as u64;
                let hi = hi.as_micros() as u64;
                Duration::from_micros(rng.random_range(lo..=hi))
            }
        }
    }
}
