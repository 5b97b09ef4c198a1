/// The read-only robot-state signal the scheduler polls during P3 (§6).
///
/// Not the scheduler's concern how this is derived -- a real host wires it
/// to whatever driver-station or simulation state it has; this crate
/// supplies only the contract and a trivial always-enabled default so a
/// freshly constructed `Scheduler` is usable without wiring one up.
pub trait RobotState {
    fn is_disabled(&self) -> bool;
}

pub struct AlwaysEnabled;

impl RobotState for AlwaysEnabled {
    fn is_disabled(&self) -> bool {
        false
    }
}
