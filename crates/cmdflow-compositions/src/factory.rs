//! The `cmd::` factory module (`Commands.cpp` in the original, per the
//! AMBIENT STACK SUPPLEMENT): free functions building common leaf and
//! composite commands without requiring the caller to name a concrete
//! type. Thin constructors over the primitives in the rest of this
//! crate -- the non-method counterparts of the builder algebra in
//! `builder.rs`.

use std::time::Duration;

use cmdflow_types::{CommandRef, SchedulerError, SubsystemRef};

use crate::conditional::Conditional;
use crate::leaf::{Idle, NoneCommand, Print, RunEnd, RunOnce, RunRepeatedly, StartEnd, StartRun, Wait, WaitUntil};
use crate::parallel_all::ParallelAll;
use crate::parallel_deadline::ParallelDeadline;
use crate::parallel_race::ParallelRace;
use crate::proxy::Proxy;
use crate::repeat::Repeat;
use crate::sequential::Sequential;

pub fn none() -> CommandRef {
    CommandRef::new(NoneCommand)
}

pub fn idle(requirements: Vec<SubsystemRef>) -> CommandRef {
    CommandRef::new(Idle::new(requirements))
}

pub fn run_once(action: impl FnMut() + 'static, requirements: Vec<SubsystemRef>) -> CommandRef {
    CommandRef::new(RunOnce::new(action, requirements))
}

pub fn run(action: impl FnMut() + 'static, requirements: Vec<SubsystemRef>) -> CommandRef {
    CommandRef::new(RunRepeatedly::new(action, requirements))
}

pub fn start_end(
    on_start: impl FnMut() + 'static,
    on_end: impl FnMut() + 'static,
    requirements: Vec<SubsystemRef>,
) -> CommandRef {
    CommandRef::new(StartEnd::new(on_start, on_end, requirements))
}

pub fn run_end(
    on_execute: impl FnMut() + 'static,
    on_end: impl FnMut() + 'static,
    requirements: Vec<SubsystemRef>,
) -> CommandRef {
    CommandRef::new(RunEnd::new(on_execute, on_end, requirements))
}

pub fn start_run(
    on_start: impl FnMut() + 'static,
    on_execute: impl FnMut() + 'static,
    requirements: Vec<SubsystemRef>,
) -> CommandRef {
    CommandRef::new(StartRun::new(on_start, on_execute, requirements))
}

pub fn print(message: impl Into<String>) -> CommandRef {
    CommandRef::new(Print::new(message))
}

pub fn wait(duration: Duration) -> CommandRef {
    CommandRef::new(Wait::new(duration))
}

pub fn wait_until(condition: impl Fn() -> bool + 'static) -> CommandRef {
    CommandRef::new(WaitUntil::new(condition))
}

pub fn either(
    on_true: CommandRef,
    on_false: CommandRef,
    selector: impl Fn() -> bool + 'static,
) -> Result<CommandRef, SchedulerError> {
    Ok(CommandRef::new(Conditional::new(on_true, on_false, selector)?))
}

pub fn defer(requirements: Vec<SubsystemRef>, supplier: impl Fn() -> CommandRef + 'static) -> CommandRef {
    CommandRef::new(crate::deferred::Deferred::new(requirements, supplier))
}

pub fn deferred_proxy(supplier: impl Fn() -> CommandRef + 'static) -> CommandRef {
    CommandRef::new(Proxy::deferred(supplier))
}

pub fn sequence(commands: Vec<CommandRef>) -> Result<CommandRef, SchedulerError> {
    Ok(CommandRef::new(Sequential::new(commands)?))
}

pub fn repeating_sequence(commands: Vec<CommandRef>) -> Result<CommandRef, SchedulerError> {
    let sequence = CommandRef::new(Sequential::new(commands)?);
    Ok(CommandRef::new(Repeat::new(sequence)?))
}

pub fn parallel(commands: Vec<CommandRef>) -> Result<CommandRef, SchedulerError> {
    Ok(CommandRef::new(ParallelAll::new(commands)?))
}

pub fn race(commands: Vec<CommandRef>) -> Result<CommandRef, SchedulerError> {
    Ok(CommandRef::new(ParallelRace::new(commands)?))
}

pub fn deadline(deadline_command: CommandRef, others: Vec<CommandRef>) -> Result<CommandRef, SchedulerError> {
    Ok(CommandRef::new(ParallelDeadline::new(deadline_command, others)?))
}
