//! Leaf commands with no children of their own (§4.5: "Wait / WaitUntil
//! (leaf commands)"; §AMBIENT STACK SUPPLEMENT: the rest of the `cmd::`
//! factory's free functions). These exist so the builder decorators and
//! the factory module in `factory.rs` have concrete, reusable commands to
//! construct rather than requiring every caller to hand-write one.

use std::time::{Duration, Instant};

use cmdflow_types::{Command, SubsystemRef};

/// Does nothing and finishes on its very first poll. The `on_true`/
/// `on_false` slot a `Conditional` leaves empty.
pub struct NoneCommand;

impl Command for NoneCommand {
    fn name(&self) -> &str {
        "None"
    }

    fn is_finished(&mut self) -> bool {
        true
    }
}

/// Holds `requirements` and never finishes on its own; used to reserve a
/// subsystem without doing anything, e.g. as a subsystem's own
/// placeholder default command.
pub struct Idle {
    requirements: Vec<SubsystemRef>,
}

impl Idle {
    pub fn new(requirements: Vec<SubsystemRef>) -> Self {
        Self { requirements }
    }
}

impl Command for Idle {
    fn name(&self) -> &str {
        "Idle"
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        self.requirements.clone()
    }
}

/// Finishes once `duration` has elapsed since `initialize` (§4.5).
pub struct Wait {
    duration: Duration,
    start: Option<Instant>,
}

impl Wait {
    pub fn new(duration: Duration) -> Self {
        Self { duration, start: None }
    }
}

impl Command for Wait {
    fn name(&self) -> &str {
        "Wait"
    }

    fn initialize(&mut self) {
        self.start = Some(Instant::now());
    }

    fn is_finished(&mut self) -> bool {
        self.start.is_some_and(|start| start.elapsed() >= self.duration)
    }
}

/// Finishes the first tick `condition()` returns true (§4.5).
pub struct WaitUntil {
    condition: Box<dyn Fn() -> bool>,
}

impl WaitUntil {
    pub fn new(condition: impl Fn() -> bool + 'static) -> Self {
        Self { condition: Box::new(condition) }
    }
}

impl Command for WaitUntil {
    fn name(&self) -> &str {
        "WaitUntil"
    }

    fn is_finished(&mut self) -> bool {
        (self.condition)()
    }
}

/// Runs `action` once at `initialize` and is finished from the first poll
/// onward (`cmd::run_once` in the factory module).
pub struct RunOnce {
    action: Box<dyn FnMut()>,
    requirements: Vec<SubsystemRef>,
    done: bool,
}

impl RunOnce {
    pub fn new(action: impl FnMut() + 'static, requirements: Vec<SubsystemRef>) -> Self {
        Self { action: Box::new(action), requirements, done: false }
    }
}

impl Command for RunOnce {
    fn name(&self) -> &str {
        "RunOnce"
    }

    fn initialize(&mut self) {
        self.done = false;
        (self.action)();
    }

    fn is_finished(&mut self) -> bool {
        true
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        self.requirements.clone()
    }
}

/// Runs `action` every tick and never finishes on its own (`cmd::run`);
/// typically composed with `until`/`with_timeout`.
pub struct RunRepeatedly {
    action: Box<dyn FnMut()>,
    requirements: Vec<SubsystemRef>,
}

impl RunRepeatedly {
    pub fn new(action: impl FnMut() + 'static, requirements: Vec<SubsystemRef>) -> Self {
        Self { action: Box::new(action), requirements }
    }
}

impl Command for RunRepeatedly {
    fn name(&self) -> &str {
        "Run"
    }

    fn execute(&mut self) {
        (self.action)();
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        self.requirements.clone()
    }
}

/// Runs `on_start` at `initialize` and `on_end` at `end`; never finishes
/// on its own (`cmd::start_end`).
pub struct StartEnd {
    on_start: Box<dyn FnMut()>,
    on_end: Box<dyn FnMut()>,
    requirements: Vec<SubsystemRef>,
}

impl StartEnd {
    pub fn new(
        on_start: impl FnMut() + 'static,
        on_end: impl FnMut() + 'static,
        requirements: Vec<SubsystemRef>,
    ) -> Self {
        Self { on_start: Box::new(on_start), on_end: Box::new(on_end), requirements }
    }
}

impl Command for StartEnd {
    fn name(&self) -> &str {
        "StartEnd"
    }

    fn initialize(&mut self) {
        (self.on_start)();
    }

    fn end(&mut self, _interrupted: bool) {
        (self.on_end)();
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        self.requirements.clone()
    }
}

/// Runs `on_execute` every tick and `on_end` at `end`; never finishes on
/// its own (`cmd::run_end`).
pub struct RunEnd {
    on_execute: Box<dyn FnMut()>,
    on_end: Box<dyn FnMut()>,
    requirements: Vec<SubsystemRef>,
}

impl RunEnd {
    pub fn new(
        on_execute: impl FnMut() + 'static,
        on_end: impl FnMut() + 'static,
        requirements: Vec<SubsystemRef>,
    ) -> Self {
        Self { on_execute: Box::new(on_execute), on_end: Box::new(on_end), requirements }
    }
}

impl Command for RunEnd {
    fn name(&self) -> &str {
        "RunEnd"
    }

    fn execute(&mut self) {
        (self.on_execute)();
    }

    fn end(&mut self, _interrupted: bool) {
        (self.on_end)();
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        self.requirements.clone()
    }
}

/// Runs `on_start` at `initialize` and `on_execute` every tick; never
/// finishes on its own (`cmd::start_run`).
pub struct StartRun {
    on_start: Box<dyn FnMut()>,
    on_execute: Box<dyn FnMut()>,
    requirements: Vec<SubsystemRef>,
}

impl StartRun {
    pub fn new(
        on_start: impl FnMut() + 'static,
        on_execute: impl FnMut() + 'static,
        requirements: Vec<SubsystemRef>,
    ) -> Self {
        Self { on_start: Box::new(on_start), on_execute: Box::new(on_execute), requirements }
    }
}

impl Command for StartRun {
    fn name(&self) -> &str {
        "StartRun"
    }

    fn initialize(&mut self) {
        (self.on_start)();
    }

    fn execute(&mut self) {
        (self.on_execute)();
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        self.requirements.clone()
    }
}

/// Logs `message` via `tracing` once at `initialize` and finishes
/// immediately (`cmd::print`). The source prints to the driver-station
/// console; this crate has no console of its own, so it goes through the
/// same `tracing` pipeline every other scheduler event does.
pub struct Print {
    message: String,
}

impl Print {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl Command for Print {
    fn name(&self) -> &str {
        "Print"
    }

    fn initialize(&mut self) {
        tracing::info!(message = %self.message, "command print");
    }

    fn is_finished(&mut self) -> bool {
        true
    }
}
