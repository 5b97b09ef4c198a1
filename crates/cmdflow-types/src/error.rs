use thiserror::Error;

/// Errors surfaced to the caller of `schedule`, `add_commands`, or
/// `set_default_command` (§7). Every variant indicates a programmer error
/// in how commands were composed or scheduled, never a runtime condition --
/// raising one of these always leaves the scheduler's state unchanged.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(
        "command '{name}' is already composed (first composed at {site}); it cannot be scheduled directly"
    )]
    ScheduledWhileComposed { name: String, site: String },

    #[error(
        "command '{name}' is already composed (first composed at {site}); it cannot be added to a second composition"
    )]
    RecomposedCommand { name: String, site: String },

    #[error("command '{name}' is currently scheduled; it cannot be added to a composition")]
    ComposedWhileScheduled { name: String },

    #[error("cannot add commands to a composition while it is running")]
    AddCommandsWhileRunning,

    #[error(
        "default command for subsystem '{subsystem}' does not declare that subsystem as a requirement"
    )]
    DefaultCommandMissingRequirement { subsystem: String },
}

/// Non-fatal configuration problems (§7). These are logged via `tracing`
/// and swallowed -- the call that triggered them still succeeds.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationWarning {
    #[error("subsystem '{name}' was already registered; ignoring duplicate registration")]
    SubsystemAlreadyRegistered { name: String },

    #[error(
        "default command for subsystem '{subsystem}' has CancelIncoming interruption behavior, making it un-preemptible"
    )]
    DefaultCommandCancelIncoming { subsystem: String },
}
