use std::collections::HashMap;

use crate::value::Value;

/// Per-execution variable bindings. Lives only for the duration of one
/// `process` call and is dropped on completion or failure.
///
/// Lookups resolve `transformed` before `extracted`, so a transform may
/// intentionally shadow an extracted variable of the same name.
#[derive(Default, Debug)]
pub struct Scope {
    extracted: HashMap<String, Value>,
    transformed: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_extracted(&mut self, name: impl Into<String>, value: Value) {
        self.extracted.insert(name.into(), value);
    }

    pub fn insert_transformed(&mut self, name: impl Into<String>, value: Value) {
        self.transformed.insert(name.into(), value);
    }

    /// `transformed[name] ?? extracted[name]`.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.transformed
            .get(name)
            .or_else(|| self.extracted.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transformed.contains_key(name) || self.extracted.contains_key(name)
    }
}
