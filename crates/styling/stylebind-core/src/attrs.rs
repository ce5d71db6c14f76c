//! Static attribute arrays and how styling reads them.
//!
//! An element's static attributes are a flat list where marker items switch the
//! meaning of the items that follow: after `Classes` every item is a class name,
//! after `Styles` items come in `(property, value)` pairs. `SelectOnly` ends the
//! styling-relevant part of the list.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrMarker {
    NamespaceUri,
    Classes,
    Styles,
    SelectOnly,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticAttr {
    Marker(AttrMarker),
    Text(String),
}

impl StaticAttr {
    pub fn text(s: impl Into<String>) -> Self {
        StaticAttr::Text(s.into())
    }
}

impl From<AttrMarker> for StaticAttr {
    fn from(m: AttrMarker) -> Self {
        StaticAttr::Marker(m)
    }
}

impl From<&str> for StaticAttr {
    fn from(s: &str) -> Self {
        StaticAttr::Text(s.to_string())
    }
}

/// A styling item read out of a static attribute list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaticStyling<'a> {
    Class(&'a str),
    Style(&'a str, &'a str),
}

/// Walks `attrs` and yields the class names and style pairs it declares.
pub fn static_styling(attrs: &[StaticAttr]) -> Vec<StaticStyling<'_>> {
    let mut out = Vec::new();
    let mut mode: Option<AttrMarker> = None;
    let mut i = 0;
    while i < attrs.len() {
        match &attrs[i] {
            StaticAttr::Marker(AttrMarker::SelectOnly) => break,
            StaticAttr::Marker(marker) => mode = Some(*marker),
            StaticAttr::Text(name) => match mode {
                Some(AttrMarker::Classes) => out.push(StaticStyling::Class(name)),
                Some(AttrMarker::Styles) => {
                    // pair is (name, value); a marker in value position means a malformed pair
                    if let Some(StaticAttr::Text(value)) = attrs.get(i + 1) {
                        out.push(StaticStyling::Style(name, value));
                        i += 1;
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    out
}
