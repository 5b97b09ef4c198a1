//! Shared child-acceptance check for every composition constructor (§4.5:
//! "marking every child composed at construction time and refusing to
//! accept any child that is already composed or already scheduled").

use cmdflow_core::singleton;
use cmdflow_types::{CommandRef, SchedulerError, mark_composed};

pub(crate) fn claim_child(child: &CommandRef) -> Result<(), SchedulerError> {
    if singleton::is_scheduled(child) {
        return Err(SchedulerError::ComposedWhileScheduled { name: child.name() });
    }
    mark_composed(child).map(|_| ()).map_err(|site| SchedulerError::RecomposedCommand {
        name: child.name(),
        site: site.to_string(),
    })
}
