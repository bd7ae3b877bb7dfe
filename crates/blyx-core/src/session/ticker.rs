//! Handle for the engine's repeating one-second tick.
//!
//! The engine never owns a thread. It flips this handle on and off; the
//! driver loop polls [`Ticker::is_active`] and calls `tick()` once per
//! period. A bumped [`Ticker::generation`] tells the driver a new schedule
//! started and its interval should restart from zero.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    active: bool,
    generation: u64,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            active: false,
            generation: 0,
        }
    }

    /// Schedule the repeating tick. Returns `false` if one is already active.
    pub fn ensure(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.generation += 1;
        true
    }

    /// Cancel the repeating tick. Returns `false` if none was active.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Count of schedules created so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_is_idempotent() {
        let mut ticker = Ticker::default();
        assert!(ticker.ensure());
        assert!(!ticker.ensure());
        assert_eq!(ticker.generation(), 1);
        assert!(ticker.is_active());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut ticker = Ticker::default();
        assert!(!ticker.cancel());
        ticker.ensure();
        assert!(ticker.cancel());
        assert!(!ticker.cancel());
        assert!(!ticker.is_active());
    }

    #[test]
    fn restart_bumps_generation() {
        let mut ticker = Ticker::new(Duration::from_millis(10));
        ticker.ensure();
        ticker.cancel();
        ticker.ensure();
        assert_eq!(ticker.generation(), 2);
        assert_eq!(ticker.period(), Duration::from_millis(10));
    }
}
