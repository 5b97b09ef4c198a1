use cmdflow_types::{Command, CommandRef, InterruptionBehavior, SchedulerError, SubsystemRef};

use crate::support::claim_child;

/// Runs every child concurrently; finishes once all children have finished
/// (§4.5). On interruption, every still-running child is interrupted too.
pub struct ParallelAll {
    name: String,
    children: Vec<CommandRef>,
    running: Vec<bool>,
}

impl ParallelAll {
    pub fn new(children: Vec<CommandRef>) -> Result<Self, SchedulerError> {
        for child in &children {
            claim_child(child)?;
        }
        let running = vec![true; children.len()];
        Ok(Self {
            name: "ParallelAll".to_string(),
            children,
            running,
        })
    }
}

impl Command for ParallelAll {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) {
        self.running = vec![true; self.children.len()];
        for child in &self.children {
            child.initialize();
        }
    }

    fn execute(&mut self) {
        for (i, child) in self.children.iter().enumerate() {
            if !self.running[i] {
                continue;
            }
            child.execute();
            if child.is_finished() {
                child.end(false);
                self.running[i] = false;
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        self.running.iter().all(|running| !running)
    }

    fn end(&mut self, interrupted: bool) {
        for (i, child) in self.children.iter().enumerate() {
            if self.running[i] {
                child.end(interrupted);
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
