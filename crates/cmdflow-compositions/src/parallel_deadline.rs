use cmdflow_types::{Command, CommandRef, InterruptionBehavior, SchedulerError, SubsystemRef};

use crate::support::claim_child;

/// One child is the deadline; the rest run alongside it but are cut short
/// the instant the deadline finishes (§4.5).
pub struct ParallelDeadline {
    name: String,
    deadline: CommandRef,
    deadline_ended: bool,
    others: Vec<CommandRef>,
    others_ended: Vec<bool>,
}

impl ParallelDeadline {
    pub fn new(deadline: CommandRef, others: Vec<CommandRef>) -> Result<Self, SchedulerError> {
        claim_child(&deadline)?;
        for child in &others {
            claim_child(child)?;
        }
        let others_ended = vec![false; others.len()];
        Ok(Self {
            name: "ParallelDeadline".to_string(),
            deadline,
            deadline_ended: false,
            others,
            others_ended,
        })
    }
}

impl Command for ParallelDeadline {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) {
        self.deadline_ended = false;
        self.others_ended = vec![false; self.others.len()];
        self.deadline.initialize();
        for child in &self.others {
            child.initialize();
        }
    }

    fn execute(&mut self) {
        if !self.deadline_ended {
            self.deadline.execute();
            if self.deadline.is_finished() {
                self.deadline.end(false);
                self.deadline_ended = true;
            }
        }
        for (i, child) in self.others.iter().enumerate() {
            if self.others_ended[i] {
                continue;
            }
            child.execute();
            if child.is_finished() {
                child.end(false);
                self.others_ended[i] = true;
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        self.deadline_ended
    }

    fn end(&mut self, interrupted: bool) {
        if !self.deadline_ended {
            self.deadline.end(interrupted);
            self.deadline_ended = true;
        }
        for (i, child) in self.others.iter().enumerate() {
            if !self.others_ended[i] {
                child.end(true);
                self.others_ended[i] = true;
            }
        }
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        let mut reqs = self.deadline.requirements();
        for child in &self.others {
            for r in child.requirements() {
                if !reqs.contains(&r) {
                    reqs.push(r);
                }
            }
        }
        reqs
    }

    fn runs_when_disabled(&self) -> bool {
        self.deadline.runs_when_disabled() && self.others.iter().all(|c| c.runs_when_disabled())
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        let any_cancel_self = self.deadline.interruption_behavior() == InterruptionBehavior::CancelSelf
            || self
                .others
                .iter()
                .any(|c| c.interruption_behavior() == InterruptionBehavior::CancelSelf);
        if any_cancel_self {
            InterruptionBehavior::CancelSelf
        } else {
            InterruptionBehavior::CancelIncoming
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Flag {
        finished: Rc<Cell<bool>>,
        ends: Rc<Cell<u32>>,
    }

    impl Command for Flag {
        fn is_finished(&mut self) -> bool {
            self.finished.get()
        }
        fn end(&mut self, _interrupted: bool) {
            self.ends.set(self.ends.get() + 1);
        }
    }

    #[test]
    fn finishes_when_the_deadline_child_finishes_and_cuts_others_short() {
        let deadline_finished = Rc::new(Cell::new(false));
        let deadline_ends = Rc::new(Cell::new(0));
        let other_finished = Rc::new(Cell::new(false));
        let other_ends = Rc::new(Cell::new(0));

        let deadline = CommandRef::new(Flag {
            finished: deadline_finished.clone(),
            ends: deadline_ends.clone(),
        });
        let other = CommandRef::new(Flag {
            finished: other_finished,
            ends: other_ends.clone(),
        });

        let mut pd = ParallelDeadline::new(deadline, vec![other]).unwrap();
        pd.initialize();
        pd.execute();
        assert!(!pd.is_finished());
        assert_eq!(other_ends.get(), 0);

        deadline_finished.set(true);
        pd.execute();
        assert!(pd.is_finished());
        assert_eq!(deadline_ends.get(), 1);
        assert_eq!(other_ends.get(), 1, "still-running follower is cut short when deadline finishes");
    }

    #[test]
    fn a_follower_finishing_early_does_not_end_the_composite() {
        let deadline_finished = Rc::new(Cell::new(false));
        let follower_finished = Rc::new(Cell::new(true));
        let follower_ends = Rc::new(Cell::new(0));

        let deadline = CommandRef::new(Flag {
            finished: deadline_finished,
            ends: Rc::new(Cell::new(0)),
        });
        let follower = CommandRef::new(Flag {
            finished: follower_finished,
            ends: follower_ends.clone(),
        });

        let mut pd = ParallelDeadline::new(deadline, vec![follower]).unwrap();
        pd.initialize();
        pd.execute();
        assert!(!pd.is_finished());
        assert_eq!(follower_ends.get(), 1, "follower ends on its own once finished");

        pd.execute();
        assert_eq!(follower_ends.get(), 1, "already-ended follower is not ended again");
    }
}
