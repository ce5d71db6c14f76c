//! Binding values and the comparison rules the update and render passes share.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::flags::EntryFlags;
use crate::player::BoundPlayerFactory;

/// A single style or class value as written by a binding.
///
/// Classes read it as a toggle (truthy = present), styles as a CSS value
/// (`Null` = absent).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Text(String),
    Number(f64),
}

impl Value {
    /// Convenience constructor for text values.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness: `Null`, `false`, empty text, zero and NaN are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Text(s) => !s.is_empty(),
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
        }
    }

    /// String form used when handing a style value to a renderer or sanitizer.
    pub fn to_css_string(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Bool(true) => Cow::Borrowed("true"),
            Value::Bool(false) => Cow::Borrowed("false"),
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            Value::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Classes written through a map binding: a whitespace separated name list
/// (every name on), or a name to toggle map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ClassesValue {
    #[default]
    Null,
    Names(String),
    Map(IndexMap<String, Value>),
}

/// Styles written through a map binding.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum StylesValue {
    #[default]
    Null,
    Map(IndexMap<String, Value>),
}

impl ClassesValue {
    pub fn names(s: impl Into<String>) -> Self {
        ClassesValue::Names(s.into())
    }

    pub fn map<K, V, I>(items: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        ClassesValue::Map(
            items
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Maps compare in key order: a reordered map is a new input.
fn same_map(a: &IndexMap<String, Value>, b: &IndexMap<String, Value>) -> bool {
    a.len() == b.len() && a.iter().eq(b.iter())
}

impl ClassesValue {
    /// Whether `other` is the same input as `self`, key order included.
    pub(crate) fn same_input(&self, other: &Self) -> bool {
        match (self, other) {
            (ClassesValue::Map(a), ClassesValue::Map(b)) => same_map(a, b),
            _ => self == other,
        }
    }
}

impl StylesValue {
    /// Whether `other` is the same input as `self`, key order included.
    pub(crate) fn same_input(&self, other: &Self) -> bool {
        match (self, other) {
            (StylesValue::Map(a), StylesValue::Map(b)) => same_map(a, b),
            _ => self == other,
        }
    }

    pub fn map<K, V, I>(items: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        StylesValue::Map(
            items
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub(crate) fn props(&self) -> impl Iterator<Item = &str> {
        let map = match self {
            StylesValue::Map(m) => Some(m),
            StylesValue::Null => None,
        };
        map.into_iter().flat_map(|m| m.keys().map(String::as_str))
    }

    pub(crate) fn get(&self, prop: &str) -> Value {
        match self {
            StylesValue::Map(m) => m.get(prop).cloned().unwrap_or_default(),
            StylesValue::Null => Value::Null,
        }
    }
}

/// Input to a map binding update.
#[derive(Clone, Debug)]
pub enum MapInput<T> {
    /// The binding did not change this tick.
    NoChange,
    Value(T),
    /// The value is routed through a player built by the bound factory.
    Bound(BoundPlayerFactory<T>),
}

impl<T> From<T> for MapInput<T> {
    fn from(v: T) -> Self {
        MapInput::Value(v)
    }
}

/// Input to a single property binding update.
#[derive(Clone, Debug)]
pub enum PropInput {
    Value(Value),
    Bound(BoundPlayerFactory<Value>),
}

macro_rules! prop_input_from {
    ($($t:ty),*) => {
        $(impl From<$t> for PropInput {
            fn from(v: $t) -> Self {
                PropInput::Value(v.into())
            }
        })*
    };
}

prop_input_from!(Value, bool, f64, &str, String);

impl From<BoundPlayerFactory<Value>> for PropInput {
    fn from(b: BoundPlayerFactory<Value>) -> Self {
        PropInput::Bound(b)
    }
}

/// Classes treat any truthy value as present; styles treat anything but `Null` as present.
#[inline]
pub fn value_exists(value: &Value, is_class: bool) -> bool {
    if is_class {
        value.is_truthy()
    } else {
        !value.is_null()
    }
}

/// Sanitizable style entries compare by their string form when both sides are set,
/// so a number and its text rendering count as equal. Everything else compares by value.
pub fn has_value_changed(flags: EntryFlags, a: &Value, b: &Value) -> bool {
    let has_values = a.is_truthy() && b.is_truthy();
    if !flags.is_class() && flags.needs_sanitization() && has_values {
        return a.to_css_string() != b.to_css_string();
    }
    a != b
}

/// Ownership rule between directives writing the same single entry.
///
/// A truthy value may only be replaced by a truthy value from a directive of
/// equal or higher priority (lower index), and only cleared by its own owner.
pub fn allow_value_change(
    current: &Value,
    new: &Value,
    current_owner: usize,
    new_owner: usize,
) -> bool {
    if current.is_truthy() {
        if new.is_truthy() {
            return new_owner <= current_owner;
        }
        return current_owner == new_owner;
    }
    true
}
