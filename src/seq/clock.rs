use crate::error::ConfigError;

/// Metronome that turns a monotonic millisecond timestamp into step ticks.
///
/// Boundaries advance by exactly one interval per tick. When the host stalls
/// for longer than two intervals the next boundary is re-anchored at the
/// stall's timestamp instead of replaying every missed tick in a burst.
#[derive(Clone, Debug)]
pub struct Clock {
    interval_ms: u64,
    last_tick_ms: u64,
    tick_count: u64,
}

impl Clock {
    pub fn new(interval_ms: u64) -> Result<Self, ConfigError> {
        Self::starting_at(interval_ms, 0)
    }

    pub fn starting_at(interval_ms: u64, now_ms: u64) -> Result<Self, ConfigError> {
        if interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(Self {
            interval_ms,
            last_tick_ms: now_ms,
            tick_count: 0,
        })
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn last_tick_ms(&self) -> u64 {
        self.last_tick_ms
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Returns true when at least one full interval has elapsed since the
    /// last boundary. Fires at most once per call.
    pub fn check(&mut self, now_ms: u64) -> bool {
        if now_ms < self.last_tick_ms + self.interval_ms {
            return false;
        }
        self.last_tick_ms += self.interval_ms;
        if now_ms >= self.last_tick_ms + self.interval_ms {
            log::warn!(
                "clock stalled: {} ms behind, re-anchoring at {} ms",
                now_ms - self.last_tick_ms,
                now_ms
            );
            self.last_tick_ms = now_ms;
        }
        self.tick_count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_rejected() {
        assert_eq!(Clock::new(0).unwrap_err(), ConfigError::ZeroInterval);
    }

    #[test]
    fn test_catch_up_scenario() {
        let mut clock = Clock::new(500).unwrap();
        assert!(clock.check(500));
        assert!(!clock.check(999));
        assert!(clock.check(1000));
        assert_eq!(clock.last_tick_ms(), 1000);
        assert!(clock.check(2500));
        assert_eq!(clock.last_tick_ms(), 2500);
        assert!(!clock.check(2500));
        assert_eq!(clock.tick_count(), 3);
    }

    #[test]
    fn test_late_but_not_stalled_keeps_grid() {
        let mut clock = Clock::new(100).unwrap();
        // 150 is late for the 100 boundary but short of the 200 one
        assert!(clock.check(150));
        assert_eq!(clock.last_tick_ms(), 100);
        assert!(clock.check(200));
        assert_eq!(clock.last_tick_ms(), 200);
    }

    #[test]
    fn test_consecutive_ticks_respect_interval() {
        let mut clock = Clock::new(120).unwrap();
        let mut last_true: Option<u64> = None;
        for now in 0..5_000u64 {
            if clock.check(now) {
                if let Some(prev) = last_true {
                    assert!(now - prev >= 120, "ticks at {prev} and {now}");
                }
                last_true = Some(now);
            }
        }
        assert_eq!(clock.tick_count(), 5_000 / 120);
    }

    #[test]
    fn test_one_tick_per_call_after_stall() {
        let mut clock = Clock::starting_at(50, 1_000).unwrap();
        assert!(!clock.check(1_049));
        assert!(clock.check(9_000));
        assert!(!clock.check(9_000));
        assert!(!clock.check(9_049));
        assert!(clock.check(9_050));
    }
}
