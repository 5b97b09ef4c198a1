use cmdflow_types::{Command, CommandRef, InterruptionBehavior, SchedulerError, SubsystemRef};

use crate::support::claim_child;

/// Re-initializes its child every time the child finishes, forever.
/// `is_finished` always reports false; only an outer cancellation ends a
/// `Repeat` (§4.5).
pub struct Repeat {
    name: String,
    child: CommandRef,
    ended_this_cycle: bool,
}

impl Repeat {
    pub fn new(child: CommandRef) -> Result<Self, SchedulerError> {
        claim_child(&child)?;
        Ok(Self {
            name: "Repeat".to_string(),
            child,
            ended_this_cycle: false,
        })
    }
}

impl Command for Repeat {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) {
        self.ended_this_cycle = false;
        self.child.initialize();
    }

    fn execute(&mut self) {
        if self.ended_this_cycle {
            self.child.initialize();
            self.ended_this_cycle = false;
        }
        self.child.execute();
        if self.child.is_finished() {
            self.child.end(false);
            self.ended_this_cycle = true;
        }
    }

    fn is_finished(&mut self) -> bool {
        false
    }

    fn end(&mut self, interrupted: bool) {
        if !self.ended_this_cycle {
            self.child.end(interrupted);
        }
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        self.child.requirements()
    }

    fn runs_when_disabled(&self) -> bool {
        self.child.runs_when_disabled()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.child.interruption_behavior()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FlipFlop {
        finished: Rc<Cell<bool>>,
        inits: Rc<Cell<u32>>,
    }
    impl Command for FlipFlop {
        fn initialize(&mut self) {
            self.inits.set(self.inits.get() + 1);
            self.finished.set(false);
        }
        fn is_finished(&mut self) -> bool {
            self.finished.get()
        }
    }

    #[test]
    fn repeat_never_reports_finished_and_reinitializes_on_each_child_finish() {
        let finished = Rc::new(Cell::new(false));
        let inits = Rc::new(Cell::new(0));
        let child = CommandRef::new(FlipFlop { finished: finished.clone(), inits: inits.clone() });

        let mut repeat = Repeat::new(child).unwrap();
        repeat.initialize();
        assert_eq!(inits.get(), 1);

        finished.set(true);
        repeat.execute();
        assert!(!repeat.is_finished());

        repeat.execute();
        assert_eq!(inits.get(), 2);
    }
}
