//! Cache key derivation

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Key identifying one memoized call
///
/// A key is the operation name, its positional arguments in call order and
/// its keyword arguments ordered by name, so two calls that only differ in
/// keyword order render to the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    operation: &'static str,
    args: Vec<Value>,
    kwargs: BTreeMap<String, Value>,
}

impl CacheKey {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    /// Append a positional argument
    pub fn arg<T: Serialize>(mut self, value: T) -> Self {
        self.args.push(to_value(value));
        self
    }

    /// Set a keyword argument
    pub fn kwarg<T: Serialize>(mut self, name: &str, value: T) -> Self {
        self.kwargs.insert(name.to_string(), to_value(value));
        self
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Serialized form used as the map key
    pub fn render(&self) -> String {
        let args = serde_json::to_string(&self.args).unwrap_or_default();
        let kwargs = serde_json::to_string(&self.kwargs).unwrap_or_default();
        format!("{}{}{}", self.operation, args, kwargs)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn to_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
