//! Child and attribute value unions
//!
//! Closed sum types for everything that may appear inside an element or as
//! an attribute value. The serializer, parser and validator all dispatch on
//! these exhaustively, so a new kind fails to compile until handled
//! everywhere.

use crate::Element;

/// A value that may appear inside an element
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    /// Nested element
    Element(Element),
    /// Pre-escaped markup, emitted verbatim
    Safe(String),
    /// Plain text, escaped on emission
    Text(String),
    /// Raw bytes, decoded as UTF-8 at render time
    Bytes(Vec<u8>),
    /// JSON mapping, rendered as its JSON serialization
    Json(serde_json::Map<String, serde_json::Value>),
    /// Nested sequence, flattened into the parent on insertion
    Fragment(Vec<Child>),
}

impl Child {
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }

    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Safe(s) => Some(s),
            _ => None,
        }
    }
}

/// An attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Suppresses the attribute entirely
    Absent,
    /// `true` emits the bare attribute name; `false` suppresses it
    Bool(bool),
    /// Quoted text, escaped on emission; empty text is suppressed
    Text(String),
    /// Quoted but emitted without escaping
    Safe(String),
    /// `key:value; key:value` join, e.g. a style map
    Map(Vec<(String, String)>),
    /// Space-joined token list, e.g. a class list
    List(Vec<String>),
}

/// Expand nested fragments into one linear child sequence.
///
/// Depth-first, order preserving. Strings and byte strings are atomic and
/// never split.
pub fn flatten<I>(children: I) -> Vec<Child>
where
    I: IntoIterator<Item = Child>,
{
    let mut out = Vec::new();
    for child in children {
        match child {
            Child::Fragment(items) => out.extend(flatten(items)),
            other => out.push(other),
        }
    }
    out
}

impl From<Element> for Child {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for Child {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Child {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self::Json(map)
    }
}

impl From<Vec<Child>> for Child {
    fn from(children: Vec<Child>) -> Self {
        Self::Fragment(children)
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Self::Fragment(Vec::new()),
        }
    }
}

impl From<bool> for Child {
    fn from(value: bool) -> Self {
        Self::Text(value.to_string())
    }
}

macro_rules! child_from_number {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for Child {
            fn from(value: $ty) -> Self {
                Self::Text(value.to_string())
            }
        }
    )*};
}

child_from_number!(i16, i32, i64, i128, isize, u16, u32, u64, u128, usize, f32, f64);

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for AttrValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<(String, String)>> for AttrValue {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::Map(pairs)
    }
}

impl From<Vec<(&str, &str)>> for AttrValue {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Self::Absent,
        }
    }
}

macro_rules! attr_from_number {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for AttrValue {
            fn from(value: $ty) -> Self {
                Self::Text(value.to_string())
            }
        }
    )*};
}

attr_from_number!(i16, i32, i64, i128, isize, u16, u32, u64, u128, usize, f32, f64);
