use cmdflow_types::{Command, CommandRef, InterruptionBehavior, SchedulerError, SubsystemRef};

use crate::support::claim_child;

/// Runs its children one after another (§4.5). A zero-child `Sequential`
/// reports finished on its very first poll.
pub struct Sequential {
    name: String,
    children: Vec<CommandRef>,
    cursor: usize,
    started: bool,
}

impl Sequential {
    pub fn new(children: Vec<CommandRef>) -> Result<Self, SchedulerError> {
        for child in &children {
            claim_child(child)?;
        }
        Ok(Self {
            name: "Sequential".to_string(),
            children,
            cursor: 0,
            started: false,
        })
    }

    /// Append more children. A programmer error while the sequence is
    /// currently running (§4.5, §7).
    pub fn add_commands(
        &mut self,
        more: impl IntoIterator<Item = CommandRef>,
    ) -> Result<(), SchedulerError> {
        if self.started {
            return Err(SchedulerError::AddCommandsWhileRunning);
        }
        let more: Vec<CommandRef> = more.into_iter().collect();
        for child in &more {
            claim_child(child)?;
        }
        self.children.extend(more);
        Ok(())
    }
}

impl Command for Sequential {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) {
        self.cursor = 0;
        self.started = true;
        if let Some(first) = self.children.first() {
            first.initialize();
        }
    }

    fn execute(&mut self) {
        if self.cursor >= self.children.len() {
            return;
        }
        let current = self.children[self.cursor].clone();
        current.execute();
        if current.is_finished() {
            current.end(false);
            self.cursor += 1;
            if let Some(next) = self.children.get(self.cursor) {
                next.initialize();
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        self.cursor >= self.children.len()
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(current) = self.children.get(self.cursor) {
            current.end(interrupted);
        }
        self.started = false;
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
