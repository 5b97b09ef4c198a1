use std::cell::RefCell;

use cmdflow_types::CommandRef;

type InitializeHook = Box<dyn FnMut(&CommandRef)>;
type ExecuteHook = Box<dyn FnMut(&CommandRef)>;
type InterruptHook = Box<dyn FnMut(&CommandRef, Option<&CommandRef>)>;
type FinishHook = Box<dyn FnMut(&CommandRef)>;

/// The four lifecycle hook lists (§3, §9: "a simple append-only list of
/// closures for each of the four hook kinds; no unregister API").
#[derive(Default)]
pub struct Hooks {
    on_initialize: RefCell<Vec<InitializeHook>>,
    on_execute: RefCell<Vec<ExecuteHook>>,
    on_interrupt: RefCell<Vec<InterruptHook>>,
    on_finish: RefCell<Vec<FinishHook>>,
}

impl Hooks {
    pub fn on_initialize(&self, hook: impl FnMut(&CommandRef) + 'static) {
        self.on_initialize.borrow_mut().push(Box::new(hook));
    }

    pub fn on_execute(&self, hook: impl FnMut(&CommandRef) + 'static) {
        self.on_execute.borrow_mut().push(Box::new(hook));
    }

    pub fn on_interrupt(&self, hook: impl FnMut(&CommandRef, Option<&CommandRef>) + 'static) {
        self.on_interrupt.borrow_mut().push(Box::new(hook));
    }

    pub fn on_finish(&self, hook: impl FnMut(&CommandRef) + 'static) {
        self.on_finish.borrow_mut().push(Box::new(hook));
    }

    pub fn fire_initialize(&self, command: &CommandRef) {
        let mut active = std::mem::take(&mut *self.on_initialize.borrow_mut());
        for hook in active.iter_mut() {
            run_isolated(|| hook(command));
        }
        let mut current = self.on_initialize.borrow_mut();
        let appended = std::mem::take(&mut *current);
        active.extend(appended);
        *current = active;
    }

    pub fn fire_execute(&self, command: &CommandRef) {
        let mut active = std::mem::take(&mut *self.on_execute.borrow_mut());
        for hook in active.iter_mut() {
            run_isolated(|| hook(command));
        }
        let mut current = self.on_execute.borrow_mut();
        let appended = std::mem::take(&mut *current);
        active.extend(appended);
        *current = active;
    }

    pub fn fire_interrupt(&self, command: &CommandRef, interruptor: Option<&CommandRef>) {
        let mut active = std::mem::take(&mut *self.on_interrupt.borrow_mut());
        for hook in active.iter_mut() {
            run_isolated(|| hook(command, interruptor));
        }
        let mut current = self.on_interrupt.borrow_mut();
        let appended = std::mem::take(&mut *current);
        active.extend(appended);
        *current = active;
    }

    pub fn fire_finish(&self, command: &CommandRef) {
        let mut active = std::mem::take(&mut *self.on_finish.borrow_mut());
        for hook in active.iter_mut() {
            run_isolated(|| hook(command));
        }
        let mut current = self.on_finish.borrow_mut();
        let appended = std::mem::take(&mut *current);
        active.extend(appended);
        *current = active;
    }
}

fn run_isolated(f: impl FnOnce()) {
    if let Err(payload) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<non-string panic payload>".to_string());
        tracing::error!(panic = %message, "scheduler hook panicked; remaining hooks still run");
    }
}
