use std::time::{Duration, Instant};

/// Tracks wall-clock time spent in each phase of a tick and reports an
/// overrun when the total exceeds the configured period (P5, §4.2).
///
/// Grounded in the same "measure elapsed time against a budget, mark
/// epochs along the way" idea as this workspace's engine-side epoch
/// interruption config, reinterpreted here as synchronous per-tick
/// measurement (via `Instant`) rather than a background thread incrementing
/// a counter, since the scheduler has no timer thread of its own (§5).
pub struct Watchdog {
    period: Duration,
    enabled: bool,
    start: Option<Instant>,
    last_epoch_at: Option<Instant>,
    epochs: Vec<(&'static str, Duration)>,
}

/// A watchdog overrun report: total elapsed time against the configured
/// period, plus a per-phase breakdown for diagnosing which phase ran long.
#[derive(Debug, Clone)]
pub struct WatchdogReport {
    pub total: Duration,
    pub period: Duration,
    pub epochs: Vec<(&'static str, Duration)>,
}

impl Watchdog {
    pub fn new(period: Duration, enabled: bool) -> Self {
        Self {
            period,
            enabled,
            start: None,
            last_epoch_at: None,
            epochs: Vec::new(),
        }
    }

    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// Start timing a new tick. Called at the top of `run()`.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = Some(now);
        self.last_epoch_at = Some(now);
        self.epochs.clear();
    }

    /// Record the time spent since the previous epoch marker (or since
    /// `reset`) under `name`.
    pub fn add_epoch(&mut self, name: &'static str) {
        if !self.enabled {
            return;
        }
        let now = Instant::now();
        if let Some(last) = self.last_epoch_at {
            self.epochs.push((name, now.duration_since(last)));
        }
        self.last_epoch_at = Some(now);
    }

    /// Finalize the tick, returning a report iff the total elapsed time
    /// exceeded the configured period.
    pub fn finalize(&mut self) -> Option<WatchdogReport> {
        if !self.enabled {
            return None;
        }
        let total = self.start?.elapsed();
        if total > self.period {
            Some(WatchdogReport {
                total,
                period: self.period,
                epochs: self.epochs.clone(),
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn no_report_when_disabled() {
        let mut wd = Watchdog::new(Duration::from_nanos(1), false);
        wd.reset();
        sleep(Duration::from_millis(1));
        assert!(wd.finalize().is_none());
    }

    #[test]
    fn reports_overrun_with_epoch_breakdown() {
        let mut wd = Watchdog::new(Duration::from_millis(1), true);
        wd.reset();
        sleep(Duration::from_millis(5));
        wd.add_epoch("phase-a");
        let report = wd.finalize().expect("expected overrun");
        assert!(report.total > report.period);
        assert_eq!(report.epochs.len(), 1);
        assert_eq!(report.epochs[0].0, "phase-a");
    }

    #[test]
    fn no_report_within_budget() {
        let mut wd = Watchdog::new(Duration::from_secs(10), true);
        wd.reset();
        wd.add_epoch("phase-a");
        assert!(wd.finalize().is_none());
    }
}
