//! The composition primitives and derived builder algebra (§4.5, §4.6):
//! Sequential, ParallelAll, ParallelRace, ParallelDeadline, Repeat,
//! Conditional, Deferred, Proxy, and Wrapper, each itself a `Command`,
//! plus the fluent decorator trait and the `cmd::` factory module built
//! out of them.
//!
//! None of these drive their children through the outer scheduler --
//! they call the children's hooks directly from their own hooks -- with
//! the deliberate exception of `Proxy`, whose whole point is to do the
//! opposite (§2, §4.5).

mod builder;
mod conditional;
mod deferred;
mod leaf;
mod parallel_all;
mod parallel_deadline;
mod parallel_race;
mod proxy;
mod repeat;
mod sequential;
mod support;
mod wrapper;

pub mod cmd {
    //! Free-function counterparts of the builder algebra (§4.6 /
    //! AMBIENT STACK SUPPLEMENT), for callers that don't start from an
    //! existing command handle.
    pub use crate::factory::*;
}

mod factory;

pub use builder::CommandBuilderExt;
pub use conditional::Conditional;
pub use deferred::Deferred;
pub use leaf::{Idle, NoneCommand, Print, RunEnd, RunOnce, RunRepeatedly, StartEnd, StartRun, Wait, WaitUntil};
pub use parallel_all::ParallelAll;
pub use parallel_deadline::ParallelDeadline;
pub use parallel_race::ParallelRace;
pub use proxy::Proxy;
pub use repeat::Repeat;
pub use sequential::Sequential;
pub use wrapper::Wrapper;
