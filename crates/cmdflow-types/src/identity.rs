use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::command::Command;
use crate::interruption::InterruptionBehavior;
use crate::subsystem::Subsystem;

/// Shared, interior-mutable handle to a command.
///
/// Two `CommandRef`s are "the same command" iff they point at the same
/// allocation -- this is the Rust stand-in for the source's raw-pointer
/// identity (§3: "a stable reference value; two commands are the same iff
/// they share identity"). Cloning a `CommandRef` shares the underlying
/// command rather than duplicating it.
///
/// This is also the single ownership type compositions use to hold their
/// children. A composition that takes a `CommandRef` by value and never
/// clones it again holds the sole outstanding reference, which is the
/// practical equivalent of the source's move-only child ownership without
/// requiring a second, non-identity-bearing handle type.
#[derive(Clone)]
pub struct CommandRef(Rc<RefCell<dyn Command>>);

impl CommandRef {
    pub fn new(command: impl Command + 'static) -> Self {
        CommandRef(Rc::new(RefCell::new(command)))
    }

    pub fn from_rc(inner: Rc<RefCell<dyn Command>>) -> Self {
        CommandRef(inner)
    }

    pub fn name(&self) -> String {
        self.0.borrow().name().to_string()
    }

    pub fn requirements(&self) -> Vec<SubsystemRef> {
        self.0.borrow().requirements()
    }

    pub fn runs_when_disabled(&self) -> bool {
        self.0.borrow().runs_when_disabled()
    }

    pub fn interruption_behavior(&self) -> InterruptionBehavior {
        self.0.borrow().interruption_behavior()
    }

    pub fn initialize(&self) {
        self.0.borrow_mut().initialize();
    }

    pub fn execute(&self) {
        self.0.borrow_mut().execute();
    }

    pub fn is_finished(&self) -> bool {
        self.0.borrow_mut().is_finished()
    }

    pub fn end(&self, interrupted: bool) {
        self.0.borrow_mut().end(interrupted);
    }

    /// Identity as a raw address, stable for the life of the allocation.
    /// Used for telemetry's integer-identity arrays (§6) and to hash/compare
    /// by reference rather than content.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for CommandRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for CommandRef {}

impl Hash for CommandRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl std::fmt::Debug for CommandRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRef")
            .field("name", &self.name())
            .field("id", &self.id())
            .finish()
    }
}

/// Shared, interior-mutable handle to a subsystem. See `CommandRef` for the
/// identity rationale; the same reasoning applies here (§3: "Identity: a
/// stable reference; serves as the key in the requirement map").
#[derive(Clone)]
pub struct SubsystemRef(Rc<RefCell<dyn Subsystem>>);

impl SubsystemRef {
    pub fn new(subsystem: impl Subsystem + 'static) -> Self {
        SubsystemRef(Rc::new(RefCell::new(subsystem)))
    }

    pub fn from_rc(inner: Rc<RefCell<dyn Subsystem>>) -> Self {
        SubsystemRef(inner)
    }

    pub fn name(&self) -> String {
        self.0.borrow().name().to_string()
    }

    pub fn periodic(&self) {
        self.0.borrow_mut().periodic();
    }

    pub fn simulation_periodic(&self) {
        self.0.borrow_mut().simulation_periodic();
    }

    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for SubsystemRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SubsystemRef {}

impl Hash for SubsystemRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl std::fmt::Debug for SubsystemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubsystemRef")
            .field("name", &self.name())
            .field("id", &self.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;
    impl Command for Noop {}

    #[test]
    fn clones_share_identity() {
        let a = CommandRef::new(Noop);
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn distinct_commands_have_distinct_identity() {
        let a = CommandRef::new(Noop);
        let b = CommandRef::new(Noop);
        assert_ne!(a, b);
    }
}
