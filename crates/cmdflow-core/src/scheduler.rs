//! The scheduler: the coordinator maintaining the scheduled set S, the
//! requirement map R, the subsystem registry U, the event loops, and the
//! four lifecycle hook lists (§3).
//!
//! Every field is independently interior-mutable (`RefCell`/`Cell`) rather
//! than the whole struct living behind one outer lock, so `Scheduler`
//! methods take `&self` and remain callable from inside a command's own
//! `execute`/`end`/hook -- the documented reentrancy contract (§5).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use cmdflow_types::{
    CommandRef, ConfigurationWarning, InterruptionBehavior, SchedulerError, SubsystemRef,
};

use crate::config::SchedulerConfig;
use crate::event_loop::EventLoop;
use crate::hooks::Hooks;
use crate::robot_state::{AlwaysEnabled, RobotState};
use crate::telemetry::TelemetrySink;
use crate::watchdog::Watchdog;

pub struct Scheduler {
    scheduled: RefCell<Vec<CommandRef>>,
    requirements: RefCell<HashMap<SubsystemRef, CommandRef>>,
    subsystems: RefCell<Vec<SubsystemRef>>,
    default_commands: RefCell<HashMap<SubsystemRef, CommandRef>>,
    hooks: Hooks,
    disabled: Cell<bool>,
    in_run: Cell<bool>,
    simulation: Cell<bool>,
    watchdog: RefCell<Watchdog>,
    robot_state: RefCell<Box<dyn RobotState>>,
    default_loop: EventLoop,
    active_loop: RefCell<EventLoop>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        let default_loop = EventLoop::new();
        Scheduler {
            scheduled: RefCell::new(Vec::new()),
            requirements: RefCell::new(HashMap::new()),
            subsystems: RefCell::new(Vec::new()),
            default_commands: RefCell::new(HashMap::new()),
            hooks: Hooks::default(),
            disabled: Cell::new(config.start_disabled),
            in_run: Cell::new(false),
            simulation: Cell::new(false),
            watchdog: RefCell::new(Watchdog::new(config.period, config.watchdog_enabled)),
            robot_state: RefCell::new(Box::new(AlwaysEnabled)),
            active_loop: RefCell::new(default_loop.clone()),
            default_loop,
        }
    }

    // ---- scheduling -----------------------------------------------------

    /// Insert `command` into the scheduled set, arbitrating against any
    /// conflicting requirement owners (§4.3). Idempotent: scheduling an
    /// already-scheduled command is a silent no-op.
    pub fn schedule(&self, command: CommandRef) -> Result<(), SchedulerError> {
        if let Some(site) = cmdflow_types::composition_site(&command) {
            return Err(SchedulerError::ScheduledWhileComposed {
                name: command.name(),
                site: site.to_string(),
            });
        }
        if self.is_scheduled(&command) {
            return Ok(());
        }
        if self.disabled.get() {
            return Ok(());
        }
        if self.robot_state.borrow().is_disabled() && !command.runs_when_disabled() {
            return Ok(());
        }

        let requires = command.requirements();
        let mut conflicts: Vec<CommandRef> = Vec::new();
        {
            let requirements = self.requirements.borrow();
            for subsystem in &requires {
                if let Some(owner) = requirements.get(subsystem) {
                    if !conflicts.contains(owner) {
                        conflicts.push(owner.clone());
                    }
                }
            }
        }

        if conflicts
            .iter()
            .any(|c| c.interruption_behavior() == InterruptionBehavior::CancelIncoming)
        {
            tracing::debug!(command = %command.name(), "schedule refused: conflicting CancelIncoming owner");
            return Ok(());
        }

        for conflict in &conflicts {
            self.cancel(conflict, Some(&command));
        }

        self.scheduled.borrow_mut().push(command.clone());
        {
            let mut requirements = self.requirements.borrow_mut();
            for subsystem in requires {
                requirements.insert(subsystem, command.clone());
            }
        }

        command.initialize();
        self.hooks.fire_initialize(&command);
        tracing::debug!(command = %command.name(), "scheduled");
        Ok(())
    }

    /// Remove `command` from the scheduled set and invoke `end(true)`.
    /// Idempotent: cancelling a command that is not scheduled is a no-op
    /// and fires no hooks (L2, §8).
    pub fn cancel(&self, command: &CommandRef, interruptor: Option<&CommandRef>) {
        let was_present = {
            let mut scheduled = self.scheduled.borrow_mut();
            let before = scheduled.len();
            scheduled.retain(|c| c != command);
            scheduled.len() != before
        };
        if !was_present {
            return;
        }
        self.requirements.borrow_mut().retain(|_, owner| *owner != *command);
        command.end(true);
        self.hooks.fire_interrupt(command, interruptor);
        tracing::debug!(command = %command.name(), "cancelled");
    }

    pub fn cancel_all(&self) {
        let snapshot = self.scheduled.borrow().clone();
        for command in &snapshot {
            self.cancel(command, None);
        }
    }

    fn finish(&self, command: &CommandRef) {
        self.scheduled.borrow_mut().retain(|c| c != command);
        self.requirements.borrow_mut().retain(|_, owner| *owner != *command);
        command.end(false);
        self.hooks.fire_finish(command);
        tracing::debug!(command = %command.name(), "finished");
    }

    pub fn is_scheduled(&self, command: &CommandRef) -> bool {
        self.scheduled.borrow().contains(command)
    }

    pub fn requiring(&self, subsystem: &SubsystemRef) -> Option<CommandRef> {
        self.requirements.borrow().get(subsystem).cloned()
    }

    // ---- subsystem registry ----------------------------------------------

    pub fn register_subsystem(&self, subsystem: SubsystemRef) {
        if self.subsystems.borrow().contains(&subsystem) {
            let warning = ConfigurationWarning::SubsystemAlreadyRegistered {
                name: subsystem.name(),
            };
            tracing::warn!(%warning);
            return;
        }
        self.subsystems.borrow_mut().push(subsystem);
    }

    pub fn unregister_subsystem(&self, subsystem: &SubsystemRef) {
        self.subsystems.borrow_mut().retain(|s| s != subsystem);
        self.default_commands.borrow_mut().remove(subsystem);
    }

    pub fn unregister_all_subsystems(&self) {
        self.subsystems.borrow_mut().clear();
        self.default_commands.borrow_mut().clear();
    }

    pub fn set_default_command(
        &self,
        subsystem: SubsystemRef,
        command: CommandRef,
    ) -> Result<(), SchedulerError> {
        if !command.requirements().contains(&subsystem) {
            return Err(SchedulerError::DefaultCommandMissingRequirement {
                subsystem: subsystem.name(),
            });
        }
        if command.interruption_behavior() == InterruptionBehavior::CancelIncoming {
            let warning = ConfigurationWarning::DefaultCommandCancelIncoming {
                subsystem: subsystem.name(),
            };
            tracing::warn!(%warning);
        }
        self.default_commands.borrow_mut().insert(subsystem, command);
        Ok(())
    }

    pub fn get_default_command(&self, subsystem: &SubsystemRef) -> Option<CommandRef> {
        self.default_commands.borrow().get(subsystem).cloned()
    }

    pub fn remove_default_command(&self, subsystem: &SubsystemRef) {
        self.default_commands.borrow_mut().remove(subsystem);
    }

    // ---- hooks -------------------------------------------------------------

    pub fn on_command_initialize(&self, hook: impl FnMut(&CommandRef) + 'static) {
        self.hooks.on_initialize(hook);
    }

    pub fn on_command_execute(&self, hook: impl FnMut(&CommandRef) + 'static) {
        self.hooks.on_execute(hook);
    }

    pub fn on_command_interrupt(&self, hook: impl FnMut(&CommandRef, Option<&CommandRef>) + 'static) {
        self.hooks.on_interrupt(hook);
    }

    pub fn on_command_finish(&self, hook: impl FnMut(&CommandRef) + 'static) {
        self.hooks.on_finish(hook);
    }

    // ---- lifecycle / configuration ------------------------------------------

    pub fn enable(&self) {
        self.disabled.set(false);
    }

    pub fn disable(&self) {
        self.disabled.set(true);
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    pub fn set_period(&self, period: Duration) {
        self.watchdog.borrow_mut().set_period(period);
    }

    pub fn set_robot_state(&self, robot_state: impl RobotState + 'static) {
        *self.robot_state.borrow_mut() = Box::new(robot_state);
    }

    pub fn set_simulation(&self, enabled: bool) {
        self.simulation.set(enabled);
    }

    pub fn set_active_button_loop(&self, event_loop: EventLoop) {
        *self.active_loop.borrow_mut() = event_loop;
    }

    pub fn get_active_button_loop(&self) -> EventLoop {
        self.active_loop.borrow().clone()
    }

    pub fn get_default_button_loop(&self) -> EventLoop {
        self.default_loop.clone()
    }

    // ---- diagnostics accessors ------------------------------------------

    pub fn scheduled_snapshot(&self) -> Vec<CommandRef> {
        self.scheduled.borrow().clone()
    }

    pub fn requirements_snapshot(&self) -> Vec<(SubsystemRef, CommandRef)> {
        self.requirements
            .borrow()
            .iter()
            .map(|(r, c)| (r.clone(), c.clone()))
            .collect()
    }

    // ---- tick --------------------------------------------------------------

    /// Drive one tick: §4.2's P1-P5. A no-op while disabled. Calling `run`
    /// reentrantly (from inside a command hook) is not supported; the
    /// nested call is logged and ignored rather than corrupting the P3
    /// snapshot iterator (§5).
    pub fn run(&self) {
        if self.disabled.get() {
            return;
        }
        if self.in_run.get() {
            tracing::warn!("nested run() call ignored");
            return;
        }
        self.in_run.set(true);
        self.watchdog.borrow_mut().reset();

        // P1: subsystem periodic pass.
        for subsystem in self.subsystems.borrow().iter() {
            subsystem.periodic();
            if self.simulation.get() {
                subsystem.simulation_periodic();
            }
        }
        self.watchdog.borrow_mut().add_epoch("subsystem periodic");

        // P2: trigger poll, snapshotting the active loop pointer so a
        // binding that retargets it mid-tick does not affect this poll.
        let active_loop = self.active_loop.borrow().clone();
        active_loop.poll();
        self.watchdog.borrow_mut().add_epoch("trigger poll");

        // P3: command execution pass over a snapshot of S.
        let snapshot = self.scheduled.borrow().clone();
        let disabled_robot = self.robot_state.borrow().is_disabled();
        for command in &snapshot {
            if !self.is_scheduled(command) {
                continue;
            }
            if disabled_robot && !command.runs_when_disabled() {
                self.cancel(command, None);
                continue;
            }
            command.execute();
            self.hooks.fire_execute(command);
            if command.is_finished() {
                self.finish(command);
            }
        }
        self.watchdog.borrow_mut().add_epoch("command execution");

        // P4: default-command reactivation.
        let vacant: Vec<SubsystemRef> = self
            .subsystems
            .borrow()
            .iter()
            .filter(|s| !self.requirements.borrow().contains_key(*s))
            .cloned()
            .collect();
        for subsystem in vacant {
            if let Some(default) = self.default_commands.borrow().get(&subsystem).cloned() {
                let _ = self.schedule(default);
            }
        }
        self.watchdog.borrow_mut().add_epoch("default command reactivation");

        // P5: watchdog finalize.
        if let Some(report) = self.watchdog.borrow_mut().finalize() {
            tracing::warn!(
                total_ms = report.total.as_secs_f64() * 1000.0,
                period_ms = report.period.as_secs_f64() * 1000.0,
                epochs = ?report.epochs,
                "scheduler loop overran its period"
            );
        }

        self.in_run.set(false);
    }

    /// Publish the scheduler-level telemetry contract (§6): the roster of
    /// scheduled command names, their identities, and a writable `Cancel`
    /// array. Per-command sub-properties (composed flag, interruption
    /// behavior, ...) need a nested sink the flat `TelemetrySink` contract
    /// doesn't model, and are left to the host's own Sendable-style
    /// wiring, consistent with the sink staying a thin adapter rather than
    /// a second scheduling feature (§1 non-goals).
    pub fn publish(self: &Rc<Self>, sink: &mut dyn TelemetrySink) {
        let names: Vec<String> = self.scheduled.borrow().iter().map(|c| c.name()).collect();
        sink.add_string_array_property("Names", Box::new(move || names.clone()));

        let ids: Vec<i64> = self
            .scheduled
            .borrow()
            .iter()
            .map(|c| c.id() as i64)
            .collect();
        sink.add_integer_array_property(
            "Ids",
            Box::new(move || ids.clone()),
            Box::new(|_| {}),
        );

        let scheduler = self.clone();
        sink.add_integer_array_property(
            "Cancel",
            Box::new(|| Vec::new()),
            Box::new(move |ids| {
                for id in ids {
                    scheduler.cancel_by_id(id as usize);
                }
            }),
        );
    }

    fn cancel_by_id(&self, id: usize) {
        let target = self.scheduled.borrow().iter().find(|c| c.id() == id).cloned();
        if let Some(command) = target {
            self.cancel(&command, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdflow_types::Command;
    use std::cell::RefCell as StdRefCell;
    use std::rc::Rc as StdRc;

    #[derive(Default)]
    struct Counts {
        initialize: u32,
        execute: u32,
        end: u32,
        finished_calls: u32,
    }

    struct Mock {
        name: &'static str,
        requires: Vec<SubsystemRef>,
        behavior: InterruptionBehavior,
        finished: StdRc<Cell<bool>>,
        counts: StdRc<StdRefCell<Counts>>,
    }

    impl Mock {
        fn new(name: &'static str) -> (Self, StdRc<Cell<bool>>, StdRc<StdRefCell<Counts>>) {
            let finished = StdRc::new(Cell::new(false));
            let counts = StdRc::new(StdRefCell::new(Counts::default()));
            (
                Mock {
                    name,
                    requires: Vec::new(),
                    behavior: InterruptionBehavior::CancelSelf,
                    finished: finished.clone(),
                    counts: counts.clone(),
                },
                finished,
                counts,
            )
        }

        fn requiring(mut self, subsystem: SubsystemRef) -> Self {
            self.requires.push(subsystem);
            self
        }

        fn with_behavior(mut self, behavior: InterruptionBehavior) -> Self {
            self.behavior = behavior;
            self
        }
    }

    impl Command for Mock {
        fn name(&self) -> &str {
            self.name
        }

        fn initialize(&mut self) {
            self.counts.borrow_mut().initialize += 1;
        }

        fn execute(&mut self) {
            self.counts.borrow_mut().execute += 1;
        }

        fn is_finished(&mut self) -> bool {
            if self.finished.get() {
                self.counts.borrow_mut().finished_calls += 1;
            }
            self.finished.get()
        }

        fn end(&mut self, _interrupted: bool) {
            self.counts.borrow_mut().end += 1;
        }

        fn requirements(&self) -> Vec<SubsystemRef> {
            self.requires.clone()
        }

        fn interruption_behavior(&self) -> InterruptionBehavior {
            self.behavior
        }
    }

    struct PlainSubsystem(&'static str);
    impl cmdflow_types::Subsystem for PlainSubsystem {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn scenario_1_cancel_self_preempts_cancel_self() {
        let scheduler = Scheduler::new();
        let a = SubsystemRef::new(PlainSubsystem("A"));

        let (m1, _f1, c1) = Mock::new("c1");
        let c1cmd = CommandRef::new(m1.requiring(a.clone()));
        scheduler.schedule(c1cmd.clone()).unwrap();
        scheduler.run();

        let (m2, _f2, c2) = Mock::new("c2");
        let c2cmd = CommandRef::new(m2.requiring(a.clone()));
        scheduler.schedule(c2cmd.clone()).unwrap();

        assert_eq!(c1.borrow().end, 1);
        assert!(!scheduler.is_scheduled(&c1cmd));
        assert!(scheduler.is_scheduled(&c2cmd));
        assert_eq!(scheduler.requiring(&a), Some(c2cmd));
        assert_eq!(c2.borrow().initialize, 1);
    }

    #[test]
    fn scenario_2_cancel_incoming_refuses_preemption() {
        let scheduler = Scheduler::new();
        let a = SubsystemRef::new(PlainSubsystem("A"));

        let (m1, _f1, c1) = Mock::new("c1");
        let c1cmd = CommandRef::new(
            m1.requiring(a.clone())
                .with_behavior(InterruptionBehavior::CancelIncoming),
        );
        scheduler.schedule(c1cmd.clone()).unwrap();
        scheduler.run();

        let (m2, _f2, c2) = Mock::new("c2");
        let c2cmd = CommandRef::new(m2.requiring(a.clone()));
        scheduler.schedule(c2cmd.clone()).unwrap();

        assert!(!scheduler.is_scheduled(&c2cmd));
        assert!(scheduler.is_scheduled(&c1cmd));
        assert_eq!(c2.borrow().initialize, 0);
        assert_eq!(c1.borrow().end, 0);
    }

    #[test]
    fn l1_schedule_then_cancel_is_idempotent_and_ends_once() {
        let scheduler = Scheduler::new();
        let (m, _f, counts) = Mock::new("c");
        let c = CommandRef::new(m);
        scheduler.schedule(c.clone()).unwrap();
        scheduler.cancel(&c, None);

        assert!(!scheduler.is_scheduled(&c));
        assert_eq!(counts.borrow().end, 1);
    }

    #[test]
    fn l2_cancel_when_unscheduled_is_a_no_op() {
        let scheduler = Scheduler::new();
        let (m, _f, counts) = Mock::new("c");
        let c = CommandRef::new(m);
        scheduler.cancel(&c, None);
        assert_eq!(counts.borrow().end, 0);
    }

    #[test]
    fn l3_double_schedule_initializes_once() {
        let scheduler = Scheduler::new();
        let (m, _f, counts) = Mock::new("c");
        let c = CommandRef::new(m);
        scheduler.schedule(c.clone()).unwrap();
        scheduler.schedule(c.clone()).unwrap();
        assert_eq!(counts.borrow().initialize, 1);
    }

    #[test]
    fn l4_disabled_schedule_never_runs_hooks() {
        let scheduler = Scheduler::new();
        scheduler.disable();
        let (m, _f, counts) = Mock::new("c");
        let c = CommandRef::new(m);
        scheduler.schedule(c.clone()).unwrap();
        scheduler.run();
        scheduler.enable();

        assert!(!scheduler.is_scheduled(&c));
        assert_eq!(counts.borrow().initialize, 0);
        assert_eq!(counts.borrow().execute, 0);
    }

    #[test]
    fn default_command_reactivates_subsystem_after_self_cancellation() {
        let scheduler = Scheduler::new();
        let a = SubsystemRef::new(PlainSubsystem("A"));

        let (md, _fd, default_counts) = Mock::new("default");
        let default_cmd = CommandRef::new(md.requiring(a.clone()));
        scheduler
            .set_default_command(a.clone(), default_cmd.clone())
            .unwrap();
        scheduler.register_subsystem(a.clone());

        let (ms, fs, _cs) = Mock::new("self-cancel");
        let s = CommandRef::new(ms.requiring(a.clone()));
        scheduler.schedule(s.clone()).unwrap();

        fs.set(true);
        scheduler.run();
        scheduler.run();

        assert!(!scheduler.is_scheduled(&s));
        assert!(scheduler.is_scheduled(&default_cmd));
        assert_eq!(default_counts.borrow().initialize, 1);
    }

    #[test]
    fn scenario_4_cancel_chain_terminates_and_ends_each_command_once() {
        struct Chain {
            name: &'static str,
            next: StdRefCell<Option<CommandRef>>,
            scheduler: StdRc<Scheduler>,
            ends: StdRc<StdRefCell<Vec<&'static str>>>,
        }

        impl Command for Chain {
            fn name(&self) -> &str {
                self.name
            }
            fn end(&mut self, _interrupted: bool) {
                self.ends.borrow_mut().push(self.name);
                let next = self.next.borrow().clone();
                if let Some(next) = next {
                    self.scheduler.cancel(&next, None);
                }
            }
        }

        let scheduler = StdRc::new(Scheduler::new());
        let ends = StdRc::new(StdRefCell::new(Vec::new()));

        let d = CommandRef::new(Chain {
            name: "d",
            next: StdRefCell::new(None),
            scheduler: scheduler.clone(),
            ends: ends.clone(),
        });
        let c = CommandRef::new(Chain {
            name: "c",
            next: StdRefCell::new(Some(d.clone())),
            scheduler: scheduler.clone(),
            ends: ends.clone(),
        });
        let b = CommandRef::new(Chain {
            name: "b",
            next: StdRefCell::new(Some(c.clone())),
            scheduler: scheduler.clone(),
            ends: ends.clone(),
        });
        let a = CommandRef::new(Chain {
            name: "a",
            next: StdRefCell::new(Some(b.clone())),
            scheduler: scheduler.clone(),
            ends: ends.clone(),
        });

        for cmd in [&a, &b, &c, &d] {
            scheduler.schedule(cmd.clone()).unwrap();
        }

        scheduler.cancel(&a, None);

        assert_eq!(*ends.borrow(), vec!["a", "b", "c", "d"]);
        for cmd in [&a, &b, &c, &d] {
            assert!(!scheduler.is_scheduled(cmd));
        }
    }

    #[test]
    fn boundary_cancel_all_during_p3_triggers_default_reschedule_next_tick() {
        let scheduler = Scheduler::new();
        let a = SubsystemRef::new(PlainSubsystem("A"));

        let (md, _fd, _cd) = Mock::new("default");
        let default_cmd = CommandRef::new(md.requiring(a.clone()));
        scheduler
            .set_default_command(a.clone(), default_cmd.clone())
            .unwrap();
        scheduler.register_subsystem(a.clone());

        let (mb, _fb, _cb) = Mock::new("busy");
        let busy = CommandRef::new(mb.requiring(a.clone()));
        scheduler.schedule(busy.clone()).unwrap();

        scheduler.cancel_all();
        assert!(scheduler.requiring(&a).is_none());

        scheduler.run();
        assert!(scheduler.is_scheduled(&default_cmd));
    }
}
