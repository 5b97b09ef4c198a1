//! The derived command-builder algebra (§4.6): every decorator is
//! implemented purely by constructing one of the primitives in this
//! crate, never by bespoke logic of its own.

use std::time::Duration;

use cmdflow_types::{CommandRef, InterruptionBehavior, SchedulerError};

use crate::conditional::Conditional;
use crate::leaf::{NoneCommand, Wait, WaitUntil};
use crate::parallel_all::ParallelAll;
use crate::parallel_deadline::ParallelDeadline;
use crate::parallel_race::ParallelRace;
use crate::proxy::Proxy;
use crate::repeat::Repeat;
use crate::sequential::Sequential;
use crate::wrapper::Wrapper;

/// Fluent decorators over a `CommandRef`, mirroring the source's
/// `Command` default-method algebra. Each method consumes `self` --
/// moving a command into one of these compositions is exactly the act
/// that marks it "composed" (§3), so taking the handle by value here
/// makes re-use of the original handle a compile error rather than a
/// runtime one wherever possible, with `claim_child`'s runtime check as
/// the backstop for handles that were cloned before being consumed.
pub trait CommandBuilderExt: Sized {
    fn with_timeout(self, duration: Duration) -> Result<CommandRef, SchedulerError>;
    fn until(self, condition: impl Fn() -> bool + 'static) -> Result<CommandRef, SchedulerError>;
    fn only_while(self, condition: impl Fn() -> bool + 'static) -> Result<CommandRef, SchedulerError>;
    fn unless(self, condition: impl Fn() -> bool + 'static) -> Result<CommandRef, SchedulerError>;
    fn only_if(self, condition: impl Fn() -> bool + 'static) -> Result<CommandRef, SchedulerError>;
    fn and_then(self, next: CommandRef) -> Result<CommandRef, SchedulerError>;
    fn before_starting(self, previous: CommandRef) -> Result<CommandRef, SchedulerError>;
    fn repeatedly(self) -> Result<CommandRef, SchedulerError>;
    fn as_proxy(self) -> CommandRef;
    fn along_with(self, other: CommandRef) -> Result<CommandRef, SchedulerError>;
    fn race_with(self, other: CommandRef) -> Result<CommandRef, SchedulerError>;
    fn with_deadline(self, deadline: CommandRef) -> Result<CommandRef, SchedulerError>;
    fn deadline_for(self, followers: Vec<CommandRef>) -> Result<CommandRef, SchedulerError>;
    fn finally_do(self, callback: impl FnMut(bool) + 'static) -> Result<CommandRef, SchedulerError>;
    fn handle_interrupt(self, callback: impl FnMut() + 'static) -> Result<CommandRef, SchedulerError>;
    fn with_interrupt_behavior(
        self,
        behavior: InterruptionBehavior,
    ) -> Result<CommandRef, SchedulerError>;
    fn ignoring_disable(self, runs_when_disabled: bool) -> Result<CommandRef, SchedulerError>;
    fn with_name(self, name: impl Into<String>) -> Result<CommandRef, SchedulerError>;
}

impl CommandBuilderExt for CommandRef {
    fn with_timeout(self, duration: Duration) -> Result<CommandRef, SchedulerError> {
        let wait = CommandRef::new(Wait::new(duration));
        Ok(CommandRef::new(ParallelRace::new(vec![self, wait])?))
    }

    fn until(self, condition: impl Fn() -> bool + 'static) -> Result<CommandRef, SchedulerError> {
        let waiter = CommandRef::new(WaitUntil::new(condition));
        Ok(CommandRef::new(ParallelRace::new(vec![self, waiter])?))
    }

    fn only_while(self, condition: impl Fn() -> bool + 'static) -> Result<CommandRef, SchedulerError> {
        let waiter = CommandRef::new(WaitUntil::new(move || !condition()));
        Ok(CommandRef::new(ParallelRace::new(vec![self, waiter])?))
    }

    fn unless(self, condition: impl Fn() -> bool + 'static) -> Result<CommandRef, SchedulerError> {
        let none = CommandRef::new(NoneCommand);
        Ok(CommandRef::new(Conditional::new(none, self, condition)?))
    }

    fn only_if(self, condition: impl Fn() -> bool + 'static) -> Result<CommandRef, SchedulerError> {
        let none = CommandRef::new(NoneCommand);
        Ok(CommandRef::new(Conditional::new(self, none, condition)?))
    }

    fn and_then(self, next: CommandRef) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(Sequential::new(vec![self, next])?))
    }

    fn before_starting(self, previous: CommandRef) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(Sequential::new(vec![previous, self])?))
    }

    fn repeatedly(self) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(Repeat::new(self)?))
    }

    fn as_proxy(self) -> CommandRef {
        CommandRef::new(Proxy::new(self))
    }

    fn along_with(self, other: CommandRef) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(ParallelAll::new(vec![self, other])?))
    }

    fn race_with(self, other: CommandRef) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(ParallelRace::new(vec![self, other])?))
    }

    fn with_deadline(self, deadline: CommandRef) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(ParallelDeadline::new(deadline, vec![self])?))
    }

    fn deadline_for(self, followers: Vec<CommandRef>) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(ParallelDeadline::new(self, followers)?))
    }

    fn finally_do(self, callback: impl FnMut(bool) + 'static) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(Wrapper::new(self)?.on_end(callback)))
    }

    fn handle_interrupt(self, mut callback: impl FnMut() + 'static) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(Wrapper::new(self)?.on_end(move |interrupted| {
            if interrupted {
                callback();
            }
        })))
    }

    fn with_interrupt_behavior(
        self,
        behavior: InterruptionBehavior,
    ) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(Wrapper::new(self)?.override_interruption_behavior(behavior)))
    }

    fn ignoring_disable(self, runs_when_disabled: bool) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(Wrapper::new(self)?.override_runs_when_disabled(runs_when_disabled)))
    }

    fn with_name(self, name: impl Into<String>) -> Result<CommandRef, SchedulerError> {
        Ok(CommandRef::new(Wrapper::new(self)?.named(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdflow_types::Command;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Forever;
    impl Command for Forever {}

    #[test]
    fn with_timeout_finishes_when_the_wait_wins_the_race() {
        let forever = CommandRef::new(Forever);
        let mut timed = forever.with_timeout(Duration::from_millis(1)).unwrap();
        timed.initialize();
        std::thread::sleep(Duration::from_millis(5));
        timed.execute();
        assert!(timed.is_finished());
    }

    #[test]
    fn unless_skips_self_when_condition_is_true() {
        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        struct Marker(Rc<Cell<bool>>);
        impl Command for Marker {
            fn initialize(&mut self) {
                self.0.set(true);
            }
        }
        let cmd = CommandRef::new(Marker(r));
        let mut decorated = cmd.unless(|| true).unwrap();
        decorated.initialize();
        assert!(!ran.get());
    }

    #[test]
    fn only_if_runs_self_when_condition_is_true() {
        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        struct Marker(Rc<Cell<bool>>);
        impl Command for Marker {
            fn initialize(&mut self) {
                self.0.set(true);
            }
        }
        let cmd = CommandRef::new(Marker(r));
        let mut decorated = cmd.only_if(|| true).unwrap();
        decorated.initialize();
        assert!(ran.get());
    }

    #[test]
    fn with_name_overrides_display_name_only() {
        let cmd = CommandRef::new(Forever);
        let renamed = cmd.with_name("Custom").unwrap();
        assert_eq!(renamed.name(), "Custom");
    }
}
