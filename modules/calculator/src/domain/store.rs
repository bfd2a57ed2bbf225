//! Process-wide variable store.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::Value;

/// Identifier -> last assigned value, shared by every connection.
///
/// Each `get` and `set` takes the lock for that single call only, so arithmetic
/// from different connections is never serialized behind it.
#[derive(Debug, Default)]
pub struct VariableStore {
    vars: Mutex<HashMap<String, Value>>,
}

impl VariableStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `name`, or `None` if it was never assigned.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.vars.lock().get(name).copied()
    }

    /// Insert or overwrite `name`.
    pub fn set(&self, name: &str, value: Value) {
        self.vars.lock().insert(name.to_owned(), value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.lock().is_empty()
    }
}
