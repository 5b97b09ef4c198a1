//! The scheduler: the singleton coordinator that maintains the scheduled
//! set, the requirement map, the subsystem registry, and the event loop,
//! and drives the tick (§4.2-§4.4).
//!
//! This crate depends only on `cmdflow-types` for the `Command`/`Subsystem`
//! vocabulary; the composition primitives and builder algebra live one
//! layer up, in `cmdflow-compositions`, since they are themselves ordinary
//! `Command` implementations built out of what this crate exposes.

pub mod config;
pub mod diagnostics;
pub mod event_loop;
pub mod hooks;
pub mod robot_state;
pub mod scheduler;
pub mod singleton;
pub mod telemetry;
pub mod trigger;
pub mod watchdog;

pub use cmdflow_types::{
    Command, CommandRef, ConfigurationWarning, InterruptionBehavior, SchedulerError, Subsystem,
    SubsystemRef,
};
pub use config::SchedulerConfig;
pub use diagnostics::{SchedulerViolation, validate};
pub use event_loop::EventLoop;
pub use robot_state::{AlwaysEnabled, RobotState};
pub use scheduler::Scheduler;
pub use telemetry::{RecordingSink, TelemetrySink};
pub use trigger::{InitialState, Trigger};
pub use watchdog::{Watchdog, WatchdogReport};
