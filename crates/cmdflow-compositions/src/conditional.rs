use std::cell::Cell;

use cmdflow_types::{Command, CommandRef, InterruptionBehavior, SchedulerError, SubsystemRef};

use crate::support::claim_child;

/// Picks one of two children at `initialize` time via a nullary selector
/// and forwards every hook to that child for the rest of the scheduling
/// (`ConditionalCommand`/`Either` in the source, §4.5 -- added to this
/// spec's primitive list since `unless`/`only_if` cannot be expressed
/// without it).
///
/// Both children's requirements are reserved even though only one runs,
/// since the selector's outcome is not known until `initialize`.
pub struct Conditional {
    name: String,
    on_true: CommandRef,
    on_false: CommandRef,
    selector: Box<dyn Fn() -> bool>,
    chosen: Cell<Option<bool>>,
}

impl Conditional {
    pub fn new(
        on_true: CommandRef,
        on_false: CommandRef,
        selector: impl Fn() -> bool + 'static,
    ) -> Result<Self, SchedulerError> {
        claim_child(&on_true)?;
        claim_child(&on_false)?;
        Ok(Self {
            name: "Conditional".to_string(),
            on_true,
            on_false,
            selector: Box::new(selector),
            chosen: Cell::new(None),
        })
    }

    fn selected(&self) -> CommandRef {
        if self.chosen.get().unwrap_or(true) {
            self.on_true.clone()
        } else {
            self.on_false.clone()
        }
    }
}

impl Command for Conditional {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) {
        let choice = (self.selector)();
        self.chosen.set(Some(choice));
        self.selected().initialize();
    }

    fn execute(&mut self) {
        self.selected().execute();
    }

    fn is_finished(&mut self) -> bool {
        self.selected().is_finished()
    }

    fn end(&mut self, interrupted: bool) {
        self.selected().end(interrupted);
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        let mut reqs = self.on_true.requirements();
        for r in self.on_false.requirements() {
            if !reqs.contains(&r) {
                reqs.push(r);
            }
        }
        reqs
    }

    fn runs_when_disabled(&self) -> bool {
        self.on_true.runs_when_disabled() && self.on_false.runs_when_disabled()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        if self.on_true.interruption_behavior() == InterruptionBehavior::CancelSelf
            || self.on_false.interruption_behavior() == InterruptionBehavior::CancelSelf
        {
            InterruptionBehavior::CancelSelf
        } else {
            InterruptionBehavior::CancelIncoming
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;
    use std::rc::Rc;

    struct Marker {
        label: &'static str,
        log: Rc<std::cell::RefCell<Vec<&'static str>>>,
    }

    impl Command for Marker {
        fn initialize(&mut self) {
            self.log.borrow_mut().push(self.label);
        }
    }

    #[test]
    fn selector_sampled_once_at_initialize_picks_branch_for_whole_scheduling() {
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));
        let on_true = CommandRef::new(Marker { label: "true", log: log.clone() });
        let on_false = CommandRef::new(Marker { label: "false", log: log.clone() });
        let flag = Rc::new(StdCell::new(true));
        let f = flag.clone();

        let mut cond = Conditional::new(on_true, on_false, move || f.get()).unwrap();
        cond.initialize();
        flag.set(false);
        cond.execute();

        assert_eq!(*log.borrow(), vec!["true"]);
    }
}
