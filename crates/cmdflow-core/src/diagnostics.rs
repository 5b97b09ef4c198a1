//! Batch invariant scanning (§8: "Diagnostics (ambient stack supplement)").
//!
//! `schedule`/`cancel`/`run` already maintain P1-P4 incrementally and can
//! never observe a live violation between calls. `validate` is additive
//! tooling for tests and host-side health checks: a point-in-time O(n) scan
//! that would also catch a violation introduced by a future bug in the
//! incremental path, mirroring this workspace's split between an O(1)
//! incremental step (`derive_next_status`) and an O(n) batch fold
//! (`derive_status`) elsewhere in the stack.

use cmdflow_types::{CommandRef, SubsystemRef, is_composed};
use thiserror::Error;

use crate::scheduler::Scheduler;

#[derive(Debug, Error, Clone)]
pub enum SchedulerViolation {
    #[error(
        "subsystem '{subsystem}' is owned by '{owner}' in R, but '{owner}' does not declare it as a requirement (P1)"
    )]
    RequirementOwnerMismatch { subsystem: String, owner: String },

    #[error("subsystem '{subsystem}' is owned by '{owner}' in R, but '{owner}' is not in S (P2)")]
    DanglingRequirementOwner { subsystem: String, owner: String },

    #[error(
        "commands '{first}' and '{second}' are both scheduled and share requirement '{subsystem}' (P3)"
    )]
    OverlappingRequirements {
        first: String,
        second: String,
        subsystem: String,
    },

    #[error("command '{name}' is composed but appears directly in the scheduled set (P4)")]
    ComposedCommandScheduledDirectly { name: String },
}

/// Scan `scheduler`'s current state for violations of P1-P4 (§8). An empty
/// result means the scheduler is consistent at the moment of the call.
pub fn validate(scheduler: &Scheduler) -> Vec<SchedulerViolation> {
    let mut violations = Vec::new();

    let scheduled = scheduler.scheduled_snapshot();
    let requirements = scheduler.requirements_snapshot();

    // P1: every requirement of every scheduled command is owned by it in R.
    for command in &scheduled {
        for subsystem in command.requirements() {
            match scheduler.requiring(&subsystem) {
                Some(owner) if owner == *command => {}
                Some(owner) => violations.push(SchedulerViolation::RequirementOwnerMismatch {
                    subsystem: subsystem.name(),
                    owner: owner.name(),
                }),
                None => violations.push(SchedulerViolation::RequirementOwnerMismatch {
                    subsystem: subsystem.name(),
                    owner: command.name(),
                }),
            }
        }
    }

    // P2: every (subsystem, owner) pair in R names a command actually in S,
    // and that command really does require that subsystem.
    for (subsystem, owner) in &requirements {
        if !scheduled.contains(owner) {
            violations.push(SchedulerViolation::DanglingRequirementOwner {
                subsystem: subsystem.name(),
                owner: owner.name(),
            });
            continue;
        }
        if !owner.requirements().contains(subsystem) {
            violations.push(SchedulerViolation::RequirementOwnerMismatch {
                subsystem: subsystem.name(),
                owner: owner.name(),
            });
        }
    }

    // P3: no two distinct scheduled commands share a requirement.
    for (i, a) in scheduled.iter().enumerate() {
        for b in &scheduled[i + 1..] {
            let a_reqs: Vec<SubsystemRef> = a.requirements();
            for subsystem in b.requirements() {
                if a_reqs.contains(&subsystem) {
                    violations.push(SchedulerViolation::OverlappingRequirements {
                        first: a.name(),
                        second: b.name(),
                        subsystem: subsystem.name(),
                    });
                }
            }
        }
    }

    // P4: a composed command never appears directly in S.
    for command in &scheduled {
        if is_composed(command) {
            violations.push(SchedulerViolation::ComposedCommandScheduledDirectly {
                name: command.name(),
            });
        }
    }

    violations
}
