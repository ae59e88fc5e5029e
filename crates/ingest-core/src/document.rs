//! The unit of storage: named fields plus one identifier.

use crate::error::StoreError;
use serde_json::{Map, Value};

/// A mutable document, built up field by field before it is inserted.
///
/// Values are JSON values so that JSON input can be carried through verbatim;
/// delimited input only ever sets strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    id: Option<String>,
    fields: Map<String, Value>,
}

impl Document {
    /// Create a document with no identifier and no fields.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a document whose fields are the entries of `map`.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            id: None,
            fields: map,
        }
    }

    pub fn set_id_string(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The identifier, or [`StoreError::MissingId`] when it was never set.
    pub fn require_id(&self) -> Result<&str, StoreError> {
        self.id().ok_or(StoreError::MissingId)
    }

    pub fn set_string(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), Value::String(value.into()));
    }

    pub fn set_value(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.fields.is_empty()
    }

    /// Remove the identifier and every field binding.
    ///
    /// After this call the document is indistinguishable from
    /// [`Document::empty`], so a reused document never carries fields from a
    /// previous record.
    pub fn clean(&mut self) {
        self.id = None;
        self.fields.clear();
    }
}
