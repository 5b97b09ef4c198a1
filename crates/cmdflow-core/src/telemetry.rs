//! The telemetry sink contract (§6): a sendable interface the scheduler
//! publishes its scheduled-command roster and per-command properties to.
//! This crate only defines the trait and a recording test double; wiring
//! it to an actual dashboard protocol is a host concern, explicitly out of
//! scope (§1).

/// A dashboard-agnostic sink accepting getter/setter-backed properties.
///
/// Modeled after the source's `SendableBuilder`: string/boolean/integer-
/// array properties, each optionally backed by a setter closure for the
/// properties a dashboard can write back (e.g. the scheduler's `Cancel`
/// array, or a single command's `running` flag).
pub trait TelemetrySink {
    fn add_string_property(&mut self, key: &str, getter: Box<dyn Fn() -> String>);

    /// Read-only string-array property, e.g. the scheduler's roster of
    /// scheduled command names (§6). No setter: the source's Sendable
    /// protocol does not expose a writable string array either.
    fn add_string_array_property(&mut self, key: &str, getter: Box<dyn Fn() -> Vec<String>>);

    fn add_boolean_property(
        &mut self,
        key: &str,
        getter: Box<dyn Fn() -> bool>,
        setter: Box<dyn FnMut(bool)>,
    );

    fn add_integer_array_property(
        &mut self,
        key: &str,
        getter: Box<dyn Fn() -> Vec<i64>>,
        setter: Box<dyn FnMut(Vec<i64>)>,
    );
}

/// A `TelemetrySink` that just records which properties were registered
/// and lets a test invoke their getters/setters directly. Used by this
/// crate's own tests and available to hosts that want to unit test their
/// `Scheduler::publish` wiring without a real dashboard.
#[derive(Default)]
pub struct RecordingSink {
    strings: Vec<(String, Box<dyn Fn() -> String>)>,
    string_arrays: Vec<(String, Box<dyn Fn() -> Vec<String>>)>,
    booleans: Vec<(String, Box<dyn Fn() -> bool>, Box<dyn FnMut(bool)>)>,
    integer_arrays: Vec<(String, Box<dyn Fn() -> Vec<i64>>, Box<dyn FnMut(Vec<i64>)>)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn string_keys(&self) -> Vec<String> {
        self.strings.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn boolean_keys(&self) -> Vec<String> {
        self.booleans.iter().map(|(k, _, _)| k.clone()).collect()
    }

    pub fn integer_array_keys(&self) -> Vec<String> {
        self.integer_arrays.iter().map(|(k, _, _)| k.clone()).collect()
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.strings.iter().find(|(k, _)| k == key).map(|(_, g)| g())
    }

    pub fn string_array_keys(&self) -> Vec<String> {
        self.string_arrays.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn get_string_array(&self, key: &str) -> Option<Vec<String>> {
        self.string_arrays.iter().find(|(k, _)| k == key).map(|(_, g)| g())
    }

    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        self.booleans.iter().find(|(k, _, _)| k == key).map(|(_, g, _)| g())
    }

    pub fn set_boolean(&mut self, key: &str, value: bool) {
        if let Some((_, _, s)) = self.booleans.iter_mut().find(|(k, _, _)| k == key) {
            s(value);
        }
    }

    pub fn get_integer_array(&self, key: &str) -> Option<Vec<i64>> {
        self.integer_arrays.iter().find(|(k, _, _)| k == key).map(|(_, g, _)| g())
    }

    pub fn set_integer_array(&mut self, key: &str, value: Vec<i64>) {
        if let Some((_, _, s)) = self.integer_arrays.iter_mut().find(|(k, _, _)| k == key) {
            s(value);
        }
    }
}

impl TelemetrySink for RecordingSink {
    fn add_string_property(&mut self, key: &str, getter: Box<dyn Fn() -> String>) {
        self.strings.push((key.to_string(), getter));
    }

    fn add_string_array_property(&mut self, key: &str, getter: Box<dyn Fn() -> Vec<String>>) {
        self.string_arrays.push((key.to_string(), getter));
    }

    fn add_boolean_property(
        &mut self,
        key: &str,
        getter: Box<dyn Fn() -> bool>,
        setter: Box<dyn FnMut(bool)>,
    ) {
        self.booleans.push((key.to_string(), getter, setter));
    }

    fn add_integer_array_property(
        &mut self,
        key: &str,
        getter: Box<dyn Fn() -> Vec<i64>>,
        setter: Box<dyn FnMut(Vec<i64>)>,
    ) {
        self.integer_arrays.push((key.to_string(), getter, setter));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_round_trips_properties() {
        let mut sink = RecordingSink::new();
        sink.add_string_property("Name", Box::new(|| "hello".to_string()));
        assert_eq!(sink.get_string("Name"), Some("hello".to_string()));

        let flag = std::rc::Rc::new(std::cell::Cell::new(false));
        let read = flag.clone();
        let write = flag.clone();
        sink.add_boolean_property(
            "Running",
            Box::new(move || read.get()),
            Box::new(move |v| write.set(v)),
        );
        assert_eq!(sink.get_boolean("Running"), Some(false));
        sink.set_boolean("Running", true);
        assert_eq!(sink.get_boolean("Running"), Some(true));
    }
}
