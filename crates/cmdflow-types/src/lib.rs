//! Core data-model types shared by the scheduler and the composition
//! primitives: the `Command`/`Subsystem` capability traits, the identity
//! wrappers that give them stable reference-equality, the composed-flag
//! side table that backs invariant I3, and the error taxonomy.
//!
//! This crate intentionally has no scheduling logic of its own -- it is the
//! vocabulary the rest of the workspace is built from, the same role a
//! plain types crate plays beneath a crate that does the actual algorithm
//! work.

pub mod command;
pub mod composition;
pub mod error;
pub mod identity;
pub mod interruption;
pub mod subsystem;

pub use command::Command;
pub use composition::{CompositionSite, composition_site, is_composed, mark_composed};
pub use error::{ConfigurationWarning, SchedulerError};
pub use identity::{CommandRef, SubsystemRef};
pub use interruption::InterruptionBehavior;
pub use subsystem::Subsystem;
