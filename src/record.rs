//! The record dictionary produced by the mapper.
//!
//! A [`RecordDictionary`] is a flat, insertion-ordered mapping from field name
//! to a [`FieldValue`]. It serializes straight to the JSON document a search
//! engine expects:
//!
//! ```json
//! {
//!   "titlePrincipal": "Walden",
//!   "creator": ["Thoreau, Henry David"],
//!   "subject": {"topic": ["Nature"]}
//! }
//! ```
//!
//! Fields are only ever added with a value; there are no null or empty
//! placeholders. Sequence-valued fields never hold the same string twice.

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;

use crate::error::Result;

/// Value of a single field in a [`RecordDictionary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single string (`titlePrincipal`, `dateIssued`, `handle`, ...)
    Text(String),
    /// An ordered sequence of distinct strings (`creator`, `language`, ...)
    List(Vec<String>),
    /// Sub-field name to ordered sequence of distinct strings (`subject`)
    Nested(IndexMap<String, Vec<String>>),
}

impl FieldValue {
    /// The value as a single string, if it is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The value as a sequence, if it is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// The value as a nested mapping, if it is one.
    #[must_use]
    pub fn as_nested(&self) -> Option<&IndexMap<String, Vec<String>>> {
        match self {
            FieldValue::Nested(map) => Some(map),
            _ => None,
        }
    }
}

/// Flat field-name-to-value mapping for one MODS record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordDictionary {
    fields: IndexMap<String, FieldValue>,
}

impl RecordDictionary {
    /// Create an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the dictionary holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether a field is present.
    #[must_use]
    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Get a field's value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Get a single-string field.
    #[must_use]
    pub fn get_text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Get a sequence-valued field.
    #[must_use]
    pub fn get_list(&self, field: &str) -> Option<&[String]> {
        self.get(field).and_then(FieldValue::as_list)
    }

    /// Get a nested field's sub-field sequence, e.g. `("subject", "topic")`.
    #[must_use]
    pub fn get_nested(&self, field: &str, sub_field: &str) -> Option<&[String]> {
        self.get(field)
            .and_then(FieldValue::as_nested)
            .and_then(|map| map.get(sub_field))
            .map(Vec::as_slice)
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterate over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Set a single-string field, replacing any previous value.
    pub fn set_text(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields
            .insert(field.into(), FieldValue::Text(value.into()));
    }

    /// Append a value to a sequence field unless it is already there.
    ///
    /// A field that does not exist yet, or that holds a non-sequence value, is
    /// replaced by a one-element sequence.
    pub fn push_unique(&mut self, field: &str, value: &str) {
        match self.fields.get_mut(field) {
            Some(FieldValue::List(values)) => push_distinct(values, value),
            _ => {
                self.fields
                    .insert(field.to_string(), FieldValue::List(vec![value.to_string()]));
            },
        }
    }

    /// Set a nested field. Empty mappings are not stored.
    pub fn set_nested(&mut self, field: impl Into<String>, value: IndexMap<String, Vec<String>>) {
        if !value.is_empty() {
            self.fields.insert(field.into(), FieldValue::Nested(value));
        }
    }

    /// Merge another dictionary into this one, in order.
    ///
    /// Last writer wins: a key already present is overwritten by `other`'s
    /// value and keeps its original position. Each collision is logged.
    pub fn merge(&mut self, other: RecordDictionary) {
        for (field, value) in other.fields {
            if let Some(previous) = self.fields.insert(field.clone(), value) {
                warn!("field '{field}' overwritten during merge (previous value {previous:?})");
            }
        }
    }

    /// Consume the dictionary, returning the underlying ordered map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, FieldValue> {
        self.fields
    }

    /// Serialize to a compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to an indented JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Convert to a `serde_json::Value` object.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Append `value` to `values` unless an equal string is already present.
pub(crate) fn push_distinct(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}
