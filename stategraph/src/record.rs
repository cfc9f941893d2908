//! Record: the shared partial state threaded through one run.
//!
//! A `Record` maps field names to JSON values; any field may be absent. Nodes read
//! an immutable snapshot and return a [`Patch`] (itself a partial `Record`) that the
//! engine merges back according to the graph's merge rules.

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Partial record returned by a node, merged into the current record by the engine.
pub type Patch = Record;

/// Field name → value map. Ordered by field name so merges and output are deterministic.
///
/// Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert): `Record::new().with("a", 1).with("b", "x")`.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Sets `field`, returning the previous value if there was one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields.get_mut(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    /// Converts into a JSON object value.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields.into_iter().collect())
    }
}

/// Error when converting a non-object JSON value into a [`Record`].
#[derive(Debug, thiserror::Error)]
#[error("record must be a JSON object, got {0}")]
pub struct NotAnObject(pub &'static str);

impl TryFrom<Value> for Record {
    type Error = NotAnObject;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(map.into_iter().collect()),
            Value::Null => Err(NotAnObject("null")),
            Value::Bool(_) => Err(NotAnObject("bool")),
            Value::Number(_) => Err(NotAnObject("number")),
            Value::String(_) => Err(NotAnObject("string")),
            Value::Array(_) => Err(NotAnObject("array")),
        }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
