//! Composed-flag tracking (I3: "no command is simultaneously composed and
//! a member of S unless it was scheduled through its composition").
//!
//! Rust's trait objects can't retrofit a shared base-class field onto
//! arbitrary `Command` implementations, so the composed flag and its
//! diagnostic site live in an external side table keyed by `CommandRef`
//! identity, consulted by `schedule`/`add_commands` and populated by
//! composition constructors. This mirrors the auxiliary-state pattern used
//! to track derived, cross-cutting facts about entries elsewhere in this
//! workspace rather than embedding them in the entries themselves.

use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::Location;

use crate::identity::CommandRef;

/// Where a command was first placed into a composition, captured via
/// `#[track_caller]` rather than the source's stack-trace walk.
#[derive(Debug, Clone, Copy)]
pub struct CompositionSite(&'static Location<'static>);

impl std::fmt::Display for CompositionSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

thread_local! {
    static COMPOSED: RefCell<HashMap<CommandRef, CompositionSite>> = RefCell::new(HashMap::new());
}

/// Mark `command` as composed, recording the caller's location as the
/// composition site (§7: diagnostics must include the site where the
/// command was first composed). Returns the existing site when the
/// command was already composed, so callers can refuse re-composition
/// without losing the original site.
#[track_caller]
pub fn mark_composed(command: &CommandRef) -> Result<CompositionSite, CompositionSite> {
    let site = CompositionSite(Location::caller());
    COMPOSED.with(|composed| {
        let mut composed = composed.borrow_mut();
        if let Some(existing) = composed.get(command) {
            return Err(*existing);
        }
        composed.insert(command.clone(), site);
        Ok(site)
    })
}

/// The site a command was first composed at, if any.
pub fn composition_site(command: &CommandRef) -> Option<CompositionSite> {
    COMPOSED.with(|composed| composed.borrow().get(command).copied())
}

pub fn is_composed(command: &CommandRef) -> bool {
    composition_site(command).is_some()
}

/// Test utility: forget a command's composed flag so mock commands can be
/// reused across independent test cases without the side table leaking
/// state between them. Not part of the scheduling contract.
pub fn clear_composed(command: &CommandRef) {
    COMPOSED.with(|composed| {
        composed.borrow_mut().remove(command);
    });
}
