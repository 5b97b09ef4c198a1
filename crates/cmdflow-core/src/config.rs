use std::time::Duration;

use crate::scheduler::Scheduler;

/// Builder for the scheduler's tunables: tick period, watchdog behavior,
/// and initial disabled state. There is no file or CLI parsing here -- that
/// surface is out of scope -- but the in-process configuration object
/// itself is ambient-stack plumbing every host needs, built the same
/// builder-with-defaults way the rest of this workspace configures its
/// runtime pieces.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub(crate) period: Duration,
    pub(crate) watchdog_enabled: bool,
    pub(crate) start_disabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(20),
            watchdog_enabled: true,
            start_disabled: false,
        }
    }
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn watchdog_enabled(mut self, enabled: bool) -> Self {
        self.watchdog_enabled = enabled;
        self
    }

    pub fn start_disabled(mut self, disabled: bool) -> Self {
        self.start_disabled = disabled;
        self
    }

    pub fn build(self) -> Scheduler {
        Scheduler::with_config(self)
    }
}
