use cmdflow_types::{Command, CommandRef, InterruptionBehavior, SchedulerError, SubsystemRef};

use crate::support::claim_child;

/// Runs every child concurrently; finishes the instant any one child
/// finishes. The other children -- whether still running because the race
/// was won, or because the composite itself was interrupted -- always
/// receive `end(true)` (§4.5): they were cut short either way, never
/// finished on their own.
pub struct ParallelRace {
    name: String,
    children: Vec<CommandRef>,
    ended: Vec<bool>,
    finished: bool,
}

impl ParallelRace {
    pub fn new(children: Vec<CommandRef>) -> Result<Self, SchedulerError> {
        for child in &children {
            claim_child(child)?;
        }
        let ended = vec![false; children.len()];
        let finished = children.is_empty();
        Ok(Self {
            name: "ParallelRace".to_string(),
            children,
            ended,
            finished,
        })
    }
}

impl Command for ParallelRace {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) {
        self.ended = vec![false; self.children.len()];
        self.finished = self.children.is_empty();
        for child in &self.children {
            child.initialize();
        }
    }

    fn execute(&mut self) {
        for (i, child) in self.children.iter().enumerate() {
            if self.ended[i] {
                continue;
            }
            child.execute();
            if child.is_finished() {
                child.end(false);
                self.ended[i] = true;
                self.finished = true;
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        self.finished
    }

    fn end(&mut self, _interrupted: bool) {
        for (i, child) in self.children.iter().enumerate() {
            if !self.ended[i] {
                child.end(true);
                self.ended[i] = true;
            }
        }
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        let mut reqs = Vec::new();
        for child in &self.children {
            for r in child.requirements() {
                if !reqs.contains(&r) {
                    reqs.push(r);
                }
            }
        }
        reqs
    }

    fn runs_when_disabled(&self) -> bool {
        self.children.iter().all(|c| c.runs_when_disabled())
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        if self
            .children
            .iter()
            .any(|c| c.interruption_behavior() == InterruptionBehavior::CancelSelf)
        {
            InterruptionBehavior::CancelSelf
        } else {
            InterruptionBehavior::CancelIncoming
        }
    }
}
