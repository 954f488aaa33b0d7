//! JSON Value Extension
//!
//! Accessors for the nested response shapes the adapters read.

use serde_json::Value;

/// Extension trait for `serde_json::Value`
pub trait JsonExt {
    /// String at `key`, if present
    fn opt_str(&self, key: &str) -> Option<&str>;

    /// Array at `key`, if present
    fn opt_array(&self, key: &str) -> Option<&Vec<Value>>;

    /// Whether `key` holds a non-empty array
    fn has_items(&self, key: &str) -> bool;
}

impl JsonExt for Value {
    fn opt_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn opt_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    fn has_items(&self, key: &str) -> bool {
        self.opt_array(key).is_some_and(|items| !items.is_empty())
    }
}
