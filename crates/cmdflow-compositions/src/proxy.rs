use std::cell::RefCell;

use cmdflow_core::singleton;
use cmdflow_types::{Command, CommandRef, InterruptionBehavior, SubsystemRef};

/// The one composition primitive that does *not* drive its child's hooks
/// directly: `initialize` hands the inner command to the outer scheduler
/// (the thread-local singleton, §9) and thereafter `is_finished` just
/// watches whether that scheduler still considers it scheduled (§4.5,
/// §2: "except Proxy/Schedule, which explicitly do" schedule through the
/// outer scheduler).
///
/// Requirements are deliberately empty: the real arbitration happens when
/// the inner command is scheduled, not when the `Proxy` itself is.
///
/// `end(interrupted=false)` intentionally leaves the inner command alone
/// -- it has already finished on its own by the time a normal `is_finished`
/// poll reports true. `end(interrupted=true)` cancels it. This matches the
/// source's behavior and is correct for races, but can orphan an inner
/// command if a `Proxy` wrapping a long-lived task is itself interrupted
/// from outside a race (§9, open question) -- preserved here rather than
/// "fixed", per that open question's resolution.
pub struct Proxy {
    name: String,
    source: Source,
    current: RefCell<Option<CommandRef>>,
}

enum Source {
    Fixed(CommandRef),
    Supplier(Box<dyn Fn() -> CommandRef>),
}

impl Proxy {
    /// Proxy a fixed, already-constructed command.
    pub fn new(command: CommandRef) -> Self {
        Self {
            name: "Proxy".to_string(),
            source: Source::Fixed(command),
            current: RefCell::new(None),
        }
    }

    /// Proxy a command built fresh by `supplier` each scheduling (the
    /// deferred-supplier variant, §4.5/§9).
    pub fn deferred(supplier: impl Fn() -> CommandRef + 'static) -> Self {
        Self {
            name: "Proxy".to_string(),
            source: Source::Supplier(Box::new(supplier)),
            current: RefCell::new(None),
        }
    }

    fn resolve(&self) -> CommandRef {
        match &self.source {
            Source::Fixed(command) => command.clone(),
            Source::Supplier(supplier) => supplier(),
        }
    }
}

impl Command for Proxy {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) {
        let command = self.resolve();
        if let Err(err) = singleton::schedule(command.clone()) {
            tracing::error!(error = %err, "proxy failed to schedule its inner command");
        }
        *self.current.borrow_mut() = Some(command);
    }

    fn execute(&mut self) {}

    fn is_finished(&mut self) -> bool {
        match self.current.borrow().as_ref() {
            Some(command) => !singleton::is_scheduled(command),
            None => true,
        }
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(command) = self.current.borrow_mut().take() {
            if interrupted {
                singleton::cancel(&command);
            }
        }
    }

    fn requirements(&self) -> Vec<SubsystemRef> {
        Vec::new()
    }

    fn runs_when_disabled(&self) -> bool {
        match self.current.borrow().as_ref() {
            Some(command) => command.runs_when_disabled(),
            None => true,
        }
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        InterruptionBehavior::CancelIncoming
    }
}
