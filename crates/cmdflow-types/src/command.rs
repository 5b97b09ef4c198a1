use crate::identity::SubsystemRef;
use crate::interruption::InterruptionBehavior;

/// The unit of scheduled work (§3, §4.1).
///
/// A command exposes five lifecycle hooks, driven exclusively by the
/// scheduler or by whichever composition owns it, plus three static
/// policy queries consulted at scheduling and arbitration time.
///
/// All methods carry defaults so a minimal command need only override
/// `execute` and `is_finished`; `requirements` defaults to empty (no
/// arbitration, never displaces another command).
pub trait Command {
    /// Display name, shown in telemetry (§6). Mutable in spirit -- the
    /// `with_name` builder decorator produces a wrapper that overrides
    /// this rather than mutating the wrapped command in place.
    fn name(&self) -> &str {
        "Command"
    }

    /// Called exactly once when the command enters the scheduled set.
    fn initialize(&mut self) {}

    /// Called once per tick while the command is scheduled and not yet
    /// finished.
    fn execute(&mut self) {}

    /// Polled once per tick immediately after `execute`. Implementations
    /// take `&mut self` since most need a cached flag rather than a truly
    /// pure predicate.
    fn is_finished(&mut self) -> bool {
        false
    }

    /// Called exactly once when the command leaves the scheduled set,
    /// `interrupted = false` iff the removal followed `is_finished`
    /// returning true on the normal polling path.
    fn end(&mut self, interrupted: bool) {
        let _ = interrupted;
    }

    /// Subsystems this command requires exclusive ownership of. Fixed for
    /// the lifetime of a single scheduling (I5).
    fn requirements(&self) -> Vec<SubsystemRef> {
        Vec::new()
    }

    /// Whether the scheduler should let this command keep running while
    /// the robot is disabled.
    fn runs_when_disabled(&self) -> bool {
        false
    }

    /// Arbitration policy when a newly scheduled command's requirements
    /// intersect this command's.
    fn interruption_behavior(&self) -> InterruptionBehavior {
        InterruptionBehavior::CancelSelf
    }
}
