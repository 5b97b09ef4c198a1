use std::cell::RefCell;

use cmdflow_types::{Command, CommandRef, InterruptionBehavior, SubsystemRef, mark_composed};

/// Builds a new command from a supplier at `initialize` time and forwards
/// every hook to it thereafter (§4.5). The supplier runs once per
/// scheduling, not once per tick.
///
/// Requirements must be known at schedule time -- before the supplier has
/// ever run -- so, like the source's `DeferredCommand`, they are declared
/// explicitly at construction rather than derived from the eventual
/// inner command.
pub struct Deferred {
    name: String,
    supplier: Box<dyn Fn() -> CommandRef>,
    requirements: Vec<SubsystemRef>,
    current: RefCell<Option<CommandRef>>,
}

impl Deferred {
    pub fn new(requirements: Vec<SubsystemRef>, supplier: impl Fn() -> CommandRef + 'static) -> Self {
        Self {
            name: "Deferred".to_string(),
            supplier: Box::new(supplier),
            requirements,
            current: RefCell::new(None),
        }
    }
}

impl Command for Deferred {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) {
        let supplied = (self.supplier)();
        if let Err(site) = mark_composed(&supplied) {
            tracing::error!(
                command = %supplied.name(),
                site = %site,
                "deferred supplier returned a command already composed elsewhere"
            );
        }
        supplied.initialize();
        *self.current.borrow_mut() = Some(supplied);
    }

    fn execute(&mut self) {
        if let Some(current) = self.current.borrow().as_ref() {
            current.execute();
        }
    }

    fn is_finished(&mut self) -> bool {
        match self.current.borrow().as_ref() {
            Some(current) => current.is_finished(),
            None => false,
        }
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(current) = self.current.borrow_mut().take() {
            current.end(interrupted);
        }
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        self.requirements.clone()
    }

    fn runs_when_disabled(&self) -> bool {
        false
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        InterruptionBehavior::CancelSelf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Tracked {
        inits: Rc<Cell<u32>>,
        finished: Rc<Cell<bool>>,
    }

    impl Command for Tracked {
        fn initialize(&mut self) {
            self.inits.set(self.inits.get() + 1);
        }

        fn is_finished(&mut self) -> bool {
            self.finished.get()
        }
    }

    #[test]
    fn supplier_invoked_once_per_scheduling_not_per_tick() {
        let inits = Rc::new(Cell::new(0));
        let finished = Rc::new(Cell::new(false));
        let supplier_calls = Rc::new(Cell::new(0));

        let i = inits.clone();
        let f = finished.clone();
        let calls = supplier_calls.clone();
        let mut deferred = Deferred::new(Vec::new(), move || {
            calls.set(calls.get() + 1);
            CommandRef::new(Tracked { inits: i.clone(), finished: f.clone() })
        });

        deferred.initialize();
        deferred.execute();
        deferred.execute();

        assert_eq!(supplier_calls.get(), 1);
        assert_eq!(inits.get(), 1);
        assert!(!deferred.is_finished());

        finished.set(true);
        assert!(deferred.is_finished());
    }
}
