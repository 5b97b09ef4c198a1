/// Arbitration policy a command declares for itself (§4.1).
///
/// Consulted only when a newly scheduled command's requirements intersect
/// this command's requirements (§4.3). A command never consults its own
/// behavior against itself -- arbitration always compares the *incoming*
/// command against each *already-scheduled* conflicting owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptionBehavior {
    /// Yield to a newly scheduled conflicting command: this command is
    /// cancelled and the incoming one proceeds.
    CancelSelf,
    /// Refuse the newly scheduled conflicting command: this command keeps
    /// running and the incoming `schedule` call is silently dropped.
    CancelIncoming,
}

impl Default for InterruptionBehavior {
    fn default() -> Self {
        InterruptionBehavior::CancelSelf
    }
}

impl InterruptionBehavior {
    pub fn is_cancel_self(self) -> bool {
        matches!(self, InterruptionBehavior::CancelSelf)
    }

    pub fn is_cancel_incoming(self) -> bool {
        matches!(self, InterruptionBehavior::CancelIncoming)
    }
}

impl std::fmt::Display for InterruptionBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterruptionBehavior::CancelSelf => write!(f, "CancelSelf"),
            InterruptionBehavior::CancelIncoming => write!(f, "CancelIncoming"),
        }
    }
}
