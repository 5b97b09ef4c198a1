use std::cell::Cell;
use std::rc::Rc;

use cmdflow_types::CommandRef;

use crate::event_loop::EventLoop;
use crate::singleton;

/// Which value a binding's `previous` state starts at (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialState {
    /// Sample the condition once at binding time. The default: a binding
    /// installed while the condition is already true does not immediately
    /// fire `on_true`.
    #[default]
    Condition,
    /// Always start as if the condition were false, regardless of its
    /// value at binding time.
    False,
}

/// An edge-detecting boolean sampler bound to scheduling side effects
/// during the event-loop phase (§3, §4.7).
///
/// Bindings installed by the combinators below act against the
/// process-wide singleton scheduler (`singleton::schedule`/`cancel`),
/// mirroring the way the reference command-manager crate's own trigger
/// bindings reach into a thread-local queue rather than carrying an
/// explicit scheduler handle through every closure.
#[derive(Clone)]
pub struct Trigger {
    condition: Rc<dyn Fn() -> bool>,
    event_loop: EventLoop,
    initial_state: InitialState,
}

enum EdgeAction {
    Schedule(CommandRef),
    Cancel(CommandRef),
    Toggle(CommandRef),
    None,
}

fn try_schedule(c: &CommandRef) {
    if let Err(err) = singleton::schedule(c.clone()) {
        tracing::error!(error = %err, command = %c.name(), "trigger failed to schedule command");
    }
}

fn apply_edge_action(action: &EdgeAction) {
    match action {
        EdgeAction::Schedule(c) => try_schedule(c),
        EdgeAction::Cancel(c) => singleton::cancel(c),
        EdgeAction::Toggle(c) => {
            if singleton::is_scheduled(c) {
                singleton::cancel(c);
            } else {
                try_schedule(c);
            }
        }
        EdgeAction::None => {}
    }
}

impl Trigger {
    pub fn new(event_loop: EventLoop, condition: impl Fn() -> bool + 'static) -> Self {
        Self {
            condition: Rc::new(condition),
            event_loop,
            initial_state: InitialState::Condition,
        }
    }

    pub fn with_initial_state(mut self, initial_state: InitialState) -> Self {
        self.initial_state = initial_state;
        self
    }

    fn sample(&self) -> bool {
        (self.condition)()
    }

    fn initial_previous(&self) -> bool {
        match self.initial_state {
            InitialState::Condition => self.sample(),
            InitialState::False => false,
        }
    }

    /// Boolean combinators, producing a new trigger on the same loop.
    pub fn and(&self, other: &Trigger) -> Trigger {
        let a = self.condition.clone();
        let b = other.condition.clone();
        Trigger::new(self.event_loop.clone(), move || a() && b())
    }

    pub fn or(&self, other: &Trigger) -> Trigger {
        let a = self.condition.clone();
        let b = other.condition.clone();
        Trigger::new(self.event_loop.clone(), move || a() || b())
    }

    pub fn not(&self) -> Trigger {
        let a = self.condition.clone();
        Trigger::new(self.event_loop.clone(), move || !a())
    }

    /// A trigger whose reported value requires `stable_for_ticks` of polls
    /// in agreement before flipping. Debouncing is tick-counted rather than
    /// duration-based: the scheduler has no timer primitive of its own
    /// (§1 non-goals), so a tick-counted debounce is the idiomatic
    /// replacement for the source's duration-based one, consistent with
    /// ticks being this crate's only notion of elapsed time. `rising_only`
    /// restricts debouncing to the false-to-true direction, letting the
    /// true-to-false direction flip immediately.
    pub fn debounce(&self, stable_for_ticks: u32, rising_only: bool) -> Trigger {
        let condition = self.condition.clone();
        let streak = Rc::new(Cell::new(0u32));
        let output = Rc::new(Cell::new((condition)()));
        Trigger::new(self.event_loop.clone(), move || {
            let current = condition();
            let out = output.get();
            if current == out {
                streak.set(0);
                return out;
            }
            if rising_only && !current {
                output.set(current);
                streak.set(0);
                return current;
            }
            streak.set(streak.get() + 1);
            if streak.get() >= stable_for_ticks {
                output.set(current);
                streak.set(0);
            }
            output.get()
        })
    }

    fn bind_edge(&self, rising: EdgeAction, falling: EdgeAction) {
        let condition = self.condition.clone();
        let previous = Cell::new(self.initial_previous());
        self.event_loop.bind(move || {
            let current = condition();
            let prev = previous.get();
            if !prev && current {
                apply_edge_action(&rising);
            } else if prev && !current {
                apply_edge_action(&falling);
            }
            previous.set(current);
        });
    }

    /// Schedule `command` on the rising edge (previous=false, current=true).
    pub fn on_true(&self, command: CommandRef) {
        self.bind_edge(EdgeAction::Schedule(command), EdgeAction::None);
    }

    /// Schedule `command` on the falling edge (previous=true, current=false).
    pub fn on_false(&self, command: CommandRef) {
        self.bind_edge(EdgeAction::None, EdgeAction::Schedule(command));
    }

    /// Schedule `command` on either edge (previous != current).
    pub fn on_change(&self, command: CommandRef) {
        self.bind_edge(
            EdgeAction::Schedule(command.clone()),
            EdgeAction::Schedule(command),
        );
    }

    /// Schedule on rising edge, cancel on falling edge.
    pub fn while_true(&self, command: CommandRef) {
        self.bind_edge(
            EdgeAction::Schedule(command.clone()),
            EdgeAction::Cancel(command),
        );
    }

    /// Cancel on rising edge, schedule on falling edge.
    pub fn while_false(&self, command: CommandRef) {
        self.bind_edge(
            EdgeAction::Cancel(command.clone()),
            EdgeAction::Schedule(command),
        );
    }

    /// On rising edge: cancel if scheduled, else schedule.
    pub fn toggle_on_true(&self, command: CommandRef) {
        self.bind_edge(EdgeAction::Toggle(command), EdgeAction::None);
    }

    /// On falling edge: cancel if scheduled, else schedule.
    pub fn toggle_on_false(&self, command: CommandRef) {
        self.bind_edge(EdgeAction::None, EdgeAction::Toggle(command));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdflow_types::Command;
    use std::cell::Cell;

    struct Noop;
    impl Command for Noop {}

    /// Scenario 6 (§8): `while_true` schedules on the rising edge and
    /// cancels on the falling edge, executing every tick in between.
    #[test]
    fn scenario_6_while_true_schedules_then_cancels() {
        crate::singleton::reset(crate::scheduler::Scheduler::new());
        let condition = Rc::new(Cell::new(false));
        let c = condition.clone();

        let loop_ = EventLoop::new();
        let trigger = Trigger::new(loop_.clone(), move || c.get());
        let k = CommandRef::new(Noop);
        trigger.while_true(k.clone());

        condition.set(false);
        loop_.poll();
        assert!(!singleton::is_scheduled(&k));

        condition.set(true);
        loop_.poll();
        assert!(singleton::is_scheduled(&k), "rising edge schedules");

        loop_.poll();
        assert!(singleton::is_scheduled(&k), "still true: stays scheduled");

        condition.set(false);
        loop_.poll();
        assert!(!singleton::is_scheduled(&k), "falling edge cancels");
    }

    #[test]
    fn default_initial_state_suppresses_immediate_on_true_fire() {
        crate::singleton::reset(crate::scheduler::Scheduler::new());
        let loop_ = EventLoop::new();
        let trigger = Trigger::new(loop_.clone(), || true);
        let k = CommandRef::new(Noop);
        trigger.on_true(k.clone());

        loop_.poll();
        assert!(
            !singleton::is_scheduled(&k),
            "already-true condition at bind time must not fire on_true on first poll"
        );
    }

    #[test]
    fn initial_state_false_forces_a_fire_on_first_poll_if_already_true() {
        crate::singleton::reset(crate::scheduler::Scheduler::new());
        let loop_ = EventLoop::new();
        let trigger = Trigger::new(loop_.clone(), || true).with_initial_state(InitialState::False);
        let k = CommandRef::new(Noop);
        trigger.on_true(k.clone());

        loop_.poll();
        assert!(singleton::is_scheduled(&k));
    }

    #[test]
    fn toggle_on_true_flips_each_rising_edge() {
        crate::singleton::reset(crate::scheduler::Scheduler::new());
        let condition = Rc::new(Cell::new(false));
        let c = condition.clone();

        let loop_ = EventLoop::new();
        let trigger = Trigger::new(loop_.clone(), move || c.get());
        let k = CommandRef::new(Noop);
        trigger.toggle_on_true(k.clone());

        condition.set(true);
        loop_.poll();
        assert!(singleton::is_scheduled(&k), "first rising edge schedules");

        condition.set(false);
        loop_.poll();
        condition.set(true);
        loop_.poll();
        assert!(!singleton::is_scheduled(&k), "second rising edge cancels");
    }

    #[test]
    fn and_or_not_combine_conditions() {
        let a = Rc::new(Cell::new(false));
        let b = Rc::new(Cell::new(false));
        let loop_ = EventLoop::new();
        let ta = Trigger::new(loop_.clone(), {
            let a = a.clone();
            move || a.get()
        });
        let tb = Trigger::new(loop_.clone(), {
            let b = b.clone();
            move || b.get()
        });

        let and = ta.and(&tb);
        let or = ta.or(&tb);
        let not = ta.not();

        a.set(true);
        b.set(false);
        assert!(!and.sample());
        assert!(or.sample());
        assert!(!not.sample());

        b.set(true);
        assert!(and.sample());
    }

    #[test]
    fn debounce_requires_stable_ticks_before_flipping() {
        let raw = Rc::new(Cell::new(false));
        let loop_ = EventLoop::new();
        let base = Trigger::new(loop_.clone(), {
            let raw = raw.clone();
            move || raw.get()
        });
        let debounced = base.debounce(3, false);

        assert!(!debounced.sample());
        raw.set(true);
        assert!(!debounced.sample(), "tick 1 of 3");
        assert!(!debounced.sample(), "tick 2 of 3");
        assert!(debounced.sample(), "tick 3 of 3 flips output");
    }
}
