//! Defines the [`Value`] and [`Header`] types. A post's front matter is an
//! open-ended map, so header fields are modeled as a map from string to a
//! small tagged union rather than as a fixed struct. Consumers read the known
//! keys (`tags`, `published`) through explicit accessors with documented
//! defaults.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A single front-matter value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Sequence(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the underlying string, or `None` for non-string values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the underlying boolean, or `None` for non-boolean values.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the underlying sequence, or `None` for non-sequence values.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the underlying date, or `None` for non-date values.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    /// Deserializes a [`Value`] from any self-describing format. Strings in
    /// `%Y-%m-%d` form are promoted to [`Value::Date`], since YAML has no
    /// native date scalar that `serde` surfaces.
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Integer(i64),
            Float(f64),
            String(String),
            Sequence(Vec<Value>),
            Map(BTreeMap<String, Value>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Value::Bool(b),
            Raw::Integer(i) => Value::Integer(i),
            Raw::Float(f) => Value::Float(f),
            Raw::String(s) => match NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
                Ok(date) => Value::Date(date),
                Err(_) => Value::String(s),
            },
            Raw::Sequence(s) => Value::Sequence(s),
            Raw::Map(m) => Value::Map(m),
        })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Integer(i)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Value {
        Value::Date(d)
    }
}

/// An open map of front-matter fields. Also the shape of negotiated content:
/// the router merges post fields, listing fields, and shared content into a
/// single [`Header`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Header(BTreeMap<String, Value>);

impl Header {
    pub fn new() -> Header {
        Header::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> btree_map::Iter<String, Value> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges `other` into `self`. On key collision the incoming value wins,
    /// matching how the original handler layered shared content over the
    /// negotiated result.
    pub fn merge(&mut self, other: Header) {
        self.0.extend(other.0)
    }

    /// The post's tags, in the order they were written. Defaults to the
    /// empty sequence when the `tags` field is absent or not a sequence;
    /// non-string elements are skipped.
    pub fn tags(&self) -> Vec<&str> {
        match self.get("tags").and_then(Value::as_sequence) {
            Some(seq) => seq.iter().filter_map(Value::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// Whether the post is published. Defaults to `false` when the
    /// `published` field is absent or not a boolean.
    pub fn published(&self) -> bool {
        self.get("published").and_then(Value::as_bool).unwrap_or(false)
    }
}

impl From<Header> for Value {
    fn from(header: Header) -> Value {
        Value::Map(header.0)
    }
}

impl std::iter::FromIterator<(String, Value)> for Header {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Header {
        Header(iter.into_iter().collect())
    }
}
