//! Wall-clock elapsed-time tracking for the passive income driver.
//!
//! Browser timers fire late when the tab is busy or backgrounded, so the
//! driver never assumes a fixed tick length. `IncomeClock` turns successive
//! `performance.now()` readings into elapsed seconds instead.

pub struct IncomeClock {
    /// Timestamp of the last update (ms), None before the first reading
    last_timestamp: Option<f64>,
    /// Total seconds measured since creation
    pub total_seconds: f64,
}

impl IncomeClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            total_seconds: 0.0,
        }
    }

    /// Start measuring from `now_ms` without reporting any elapsed time.
    pub fn start(&mut self, now_ms: f64) {
        self.last_timestamp = Some(now_ms);
    }

    /// Feed a wall-clock timestamp and return the seconds since the last one.
    ///
    /// The first reading returns 0. A timestamp that goes backwards also
    /// returns 0 and becomes the new reference. Long gaps are not clamped:
    /// a suspended tab is credited in full on the next reading.
    pub fn update(&mut self, now_ms: f64) -> f64 {
        let delta_ms = match self.last_timestamp {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        let seconds = delta_ms / 1000.0;
        self.total_seconds += seconds;
        seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reading_returns_zero() {
        let mut clock = IncomeClock::new();
        assert_eq!(clock.update(1234.0), 0.0);
    }

    #[test]
    fn one_interval_at_100ms() {
        let mut clock = IncomeClock::new();
        clock.update(0.0);
        assert!((clock.update(100.0) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn late_timer_reports_actual_elapsed() {
        let mut clock = IncomeClock::new();
        clock.update(0.0);
        assert!((clock.update(100.0) - 0.1).abs() < 1e-9);
        assert!((clock.update(350.0) - 0.25).abs() < 1e-9);
        assert!((clock.total_seconds - 0.35).abs() < 1e-9);
    }

    #[test]
    fn long_gap_not_clamped() {
        let mut clock = IncomeClock::new();
        clock.update(0.0);
        // Tab backgrounded for a minute
        assert!((clock.update(60_000.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn backwards_timestamp_is_zero() {
        let mut clock = IncomeClock::new();
        clock.update(500.0);
        assert_eq!(clock.update(400.0), 0.0);
        assert!((clock.update(500.0) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn start_sets_reference_without_credit() {
        let mut clock = IncomeClock::new();
        clock.start(1000.0);
        assert!((clock.update(1100.0) - 0.1).abs() < 1e-9);
        assert!((clock.total_seconds - 0.1).abs() < 1e-9);
    }

    #[test]
    fn steady_ticks_sum_to_one_second() {
        let mut clock = IncomeClock::new();
        clock.update(0.0);
        let mut total = 0.0;
        for i in 1..=10 {
            total += clock.update(i as f64 * 100.0);
        }
        assert!((total - 1.0).abs() < 1e-9);
    }
}
