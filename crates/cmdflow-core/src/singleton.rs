//! The process-wide scheduler singleton (§9, "Resolved -- singleton vs.
//! per-scope").
//!
//! The source exposes one global scheduler instance; tests still need an
//! isolated one each. A `thread_local!` splits the difference: because test
//! harnesses run each test on its own OS thread, the thread-local singleton
//! gives every test its own instance for free while still presenting one
//! process-wide default to ordinary robot code, which never runs more than
//! one thread against the scheduler anyway (§5: single-threaded
//! cooperative). Grounded in the same thread-local pattern the
//! command-manager reference crate in the example pack uses for its own
//! global queue.
//!
//! Code that wants an explicitly-scoped scheduler instead of the singleton
//! should just hold its own `Scheduler` (via `Scheduler::new()` or
//! `SchedulerConfig::build()`) and call its methods directly; nothing here
//! is required to use the scheduler at all.

use std::cell::RefCell;

use cmdflow_types::{CommandRef, SchedulerError};

use crate::scheduler::Scheduler;

thread_local! {
    static INSTANCE: RefCell<Scheduler> = RefCell::new(Scheduler::new());
}

/// Run `f` against this thread's singleton scheduler.
pub fn with<R>(f: impl FnOnce(&Scheduler) -> R) -> R {
    INSTANCE.with(|cell| f(&cell.borrow()))
}

/// Replace this thread's singleton with a freshly configured scheduler.
/// Intended for test setup and for a host's one-time startup sequence.
pub fn reset(scheduler: Scheduler) {
    INSTANCE.with(|cell| *cell.borrow_mut() = scheduler);
}

pub fn schedule(command: CommandRef) -> Result<(), SchedulerError> {
    with(|scheduler| scheduler.schedule(command))
}

pub fn cancel(command: &CommandRef) {
    with(|scheduler| scheduler.cancel(command, None));
}

pub fn cancel_all() {
    with(|scheduler| scheduler.cancel_all());
}

pub fn is_scheduled(command: &CommandRef) -> bool {
    with(|scheduler| scheduler.is_scheduled(command))
}

pub fn run() {
    with(|scheduler| scheduler.run());
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdflow_types::Command;

    struct Noop;
    impl Command for Noop {}

    #[test]
    fn singleton_schedule_and_cancel_round_trip() {
        reset(Scheduler::new());
        let c = CommandRef::new(Noop);
        schedule(c.clone()).unwrap();
        assert!(is_scheduled(&c));
        cancel(&c);
        assert!(!is_scheduled(&c));
    }
}
