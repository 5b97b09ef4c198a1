/// An identity representing an exclusive hardware resource (§3).
///
/// The default-command slot is not carried on this trait: it lives in the
/// scheduler's subsystem registry (U), keyed by `SubsystemRef`, so that
/// assigning or swapping a default command never requires mutable access
/// to the subsystem implementation itself.
pub trait Subsystem {
    fn name(&self) -> &str {
        "Subsystem"
    }

    /// Invoked once per tick, in registration order, ahead of any command
    /// execution (P1, §4.2).
    fn periodic(&mut self) {}

    /// Invoked alongside `periodic` when the host is running in
    /// simulation mode. The scheduler does not know what "simulation mode"
    /// means; hosts that never simulate simply never call this.
    fn simulation_periodic(&mut self) {}
}
