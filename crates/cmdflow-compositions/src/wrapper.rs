use cmdflow_types::{Command, CommandRef, InterruptionBehavior, SchedulerError, SubsystemRef};

use crate::support::claim_child;

/// Delegates every hook to its inner command but carries its own name and
/// may override individual policy queries (§4.5). Backs the
/// `with_name`/`with_interrupt_behavior`/`ignoring_disable`/`finally_do`/
/// `handle_interrupt` builder decorators in `builder.rs` -- each of those
/// constructs one `Wrapper` around the handle it decorates.
pub struct Wrapper {
    name: String,
    inner: CommandRef,
    interruption_override: Option<InterruptionBehavior>,
    runs_when_disabled_override: Option<bool>,
    end_callbacks: Vec<Box<dyn FnMut(bool)>>,
}

impl Wrapper {
    pub fn new(inner: CommandRef) -> Result<Self, SchedulerError> {
        claim_child(&inner)?;
        let name = inner.name();
        Ok(Self {
            name,
            inner,
            interruption_override: None,
            runs_when_disabled_override: None,
            end_callbacks: Vec::new(),
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn override_interruption_behavior(mut self, behavior: InterruptionBehavior) -> Self {
        self.interruption_override = Some(behavior);
        self
    }

    pub fn override_runs_when_disabled(mut self, value: bool) -> Self {
        self.runs_when_disabled_override = Some(value);
        self
    }

    /// Append a callback invoked from `end`, alongside the inner
    /// command's own `end`. Backs both `finally_do` (called on every end)
    /// and `handle_interrupt` (the caller filters on `interrupted`).
    pub fn on_end(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.end_callbacks.push(Box::new(callback));
        self
    }
}

impl Command for Wrapper {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) {
        self.inner.initialize();
    }

    fn execute(&mut self) {
        self.inner.execute();
    }

    fn is_finished(&mut self) -> bool {
        self.inner.is_finished()
    }

    fn end(&mut self, interrupted: bool) {
        self.inner.end(interrupted);
        for callback in self.end_callbacks.iter_mut() {
            callback(interrupted);
        }
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        self.inner.requirements()
    }

    fn runs_when_disabled(&self) -> bool {
        self.runs_when_disabled_override.unwrap_or_else(|| self.inner.runs_when_disabled())
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.interruption_override.unwrap_or_else(|| self.inner.interruption_behavior())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Noop;
    impl Command for Noop {
        fn name(&self) -> &str {
            "Noop"
        }
    }

    #[test]
    fn overrides_name_and_policy_without_touching_inner() {
        let inner = CommandRef::new(Noop);
        let wrapper = Wrapper::new(inner)
            .unwrap()
            .named("Renamed")
            .override_interruption_behavior(InterruptionBehavior::CancelIncoming)
            .override_runs_when_disabled(true);
        let wrapped = CommandRef::new(wrapper);

        assert_eq!(wrapped.name(), "Renamed");
        assert_eq!(wrapped.interruption_behavior(), InterruptionBehavior::CancelIncoming);
        assert!(wrapped.runs_when_disabled());
    }

    #[test]
    fn end_callbacks_run_after_inner_end_with_interrupted_flag() {
        let inner = CommandRef::new(Noop);
        let seen = Rc::new(Cell::new(None));
        let s = seen.clone();
        let wrapper = Wrapper::new(inner).unwrap().on_end(move |interrupted| s.set(Some(interrupted)));
        let wrapped = CommandRef::new(wrapper);
        wrapped.end(true);
        assert_eq!(seen.get(), Some(true));
    }

    #[test]
    fn wrapping_an_already_composed_command_is_rejected() {
        let inner = CommandRef::new(Noop);
        let _first = Wrapper::new(inner.clone()).unwrap();
        assert!(Wrapper::new(inner).is_err());
    }
}
