// src/extractors/record.rs
#![allow(dead_code)]
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::utils::error::FieldError;

/// A value stored in a [`Record`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Record(Record),
    List(Vec<Record>),
}

/// Field name to value mapping that keeps insertion order.
/// Setting an existing field replaces it in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        let pos = self.fields.iter().position(|(name, _)| name == field)?;
        Some(self.fields.remove(pos).1)
    }

    /// Text value of `field`, if it holds text.
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.get(field)? {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn record(&self, field: &str) -> Option<&Record> {
        match self.get(field)? {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn list(&self, field: &str) -> Option<&[Record]> {
        match self.get(field)? {
            Value::List(list) => Some(list.as_slice()),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A field-level failure and where it happened.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    pub scope: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: FieldError,
}

fn serialize_display<S: Serializer>(error: &FieldError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Collects field-level failures instead of letting them escape a section.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, scope: &str, error: FieldError) {
        tracing::debug!("{}: {}", scope, error);
        self.entries.push(Diagnostic {
            scope: scope.to_string(),
            error,
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter().map(|d| &d.error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
