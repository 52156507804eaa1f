//! Launch parameters and app results

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome an app reports to the app that launched it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppResult {
    Ok,
    Cancelled,
    Error,
}

/// String-keyed map of JSON values.
///
/// Used for launch parameters and for result payloads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle {
    entries: Map<String, Value>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_string(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), Value::from(value));
    }

    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.entries.insert(key.to_string(), Value::from(value));
    }

    pub fn put_i64(&mut self, key: &str, value: i64) {
        self.entries.insert(key.to_string(), Value::from(value));
    }

    /// Store any serializable value. Fails if `value` cannot be represented as JSON.
    pub fn put<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.entries.get(key).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.entries.get(key).and_then(Value::as_i64)
    }

    /// Read a value back as `T`; `None` if missing or of another shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
