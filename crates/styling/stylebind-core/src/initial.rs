//! Initial (static) style and class values of an element.

use serde::{Deserialize, Serialize};

use crate::value::Value;

static NULL_VALUE: Value = Value::Null;

/// Ordered `(name, value)` table of initial values.
///
/// Entries refer to rows by index; a missing index reads as `Null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialStylingValues {
    rows: Vec<(String, Value)>,
}

impl InitialStylingValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn index_of(&self, prop: &str) -> Option<usize> {
        self.rows.iter().position(|(name, _)| name == prop)
    }

    /// Appends a row without checking for duplicates and returns its index.
    pub fn push(&mut self, prop: impl Into<String>, value: Value) -> usize {
        self.rows.push((prop.into(), value));
        self.rows.len() - 1
    }

    /// Value at `index`, or `Null` when there is none.
    pub fn value_at(&self, index: Option<usize>) -> &Value {
        index
            .and_then(|i| self.rows.get(i))
            .map_or(&NULL_VALUE, |(_, v)| v)
    }

    pub fn get(&self, prop: &str) -> Option<&Value> {
        self.rows.iter().find(|(name, _)| name == prop).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.rows.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Writes `value` for `prop`. Appends when the name is new; otherwise only
    /// fills a row that is still unset (`Null` or `false`) and keeps an existing value.
    pub fn patch(&mut self, prop: &str, value: Value) {
        match self.rows.iter_mut().find(|(name, _)| name == prop) {
            Some((_, current)) => {
                if matches!(current, Value::Null | Value::Bool(false)) {
                    *current = value;
                }
            }
            None => {
                self.rows.push((prop.to_string(), value));
            }
        }
    }
}
